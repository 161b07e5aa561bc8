//! Stream GPIO input levels as comma-separated lines at a fixed period.
//!
//! pinstream configures a fixed table of GPIO lines as pulled-up inputs, then
//! reads them forever in table order and writes one `0`/`1` line per sweep to
//! stdout for a downstream process.
//!
//! # Crate Structure
//!
//! - [`access`]: Pin-access boundary (GPIO character device, simulated pins)
//! - [`line`]: Channel table and the comma-separated line format
//! - [`poll`]: The fixed-period poll loop

/// Re-export pin-access types.
pub mod access {
    pub use pinstream_access::*;
}

/// Re-export line format types.
pub mod line {
    pub use pinstream_line::*;
}

/// Re-export poll loop types.
pub mod poll {
    pub use pinstream_poll::*;
}
