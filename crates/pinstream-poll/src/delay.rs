use std::time::Duration;

/// Suspends the poll loop between sweeps.
pub trait Delay {
    fn pause(&mut self, period: Duration);
}

/// Blocks the calling thread for the full period.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Delay for ThreadSleep {
    fn pause(&mut self, period: Duration) {
        std::thread::sleep(period);
    }
}

impl<F: FnMut(Duration)> Delay for F {
    fn pause(&mut self, period: Duration) {
        self(period)
    }
}
