//! The channel table.
//!
//! An ordered, fixed list of monitored pins. Position in the table is the
//! column position on the wire, so reordering it breaks every consumer.

use std::fmt;
use std::str::FromStr;

use pinstream_access::Channel;

use crate::error::LineError;

/// Channels monitored when no table is configured, in report order.
pub const DEFAULT_CHANNELS: [u32; 9] = [0, 2, 3, 7, 12, 13, 14, 15, 16];

/// Ordered sequence of monitored channels.
///
/// Duplicates are not rejected. An empty table is valid and produces bare
/// newlines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTable {
    channels: Vec<Channel>,
}

impl ChannelTable {
    /// Build a table from channel identifiers, preserving order.
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Self {
        Self {
            channels: ids.into_iter().map(Channel).collect(),
        }
    }

    /// A table with no channels.
    pub fn empty() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channel reported in column `index`.
    pub fn get(&self, index: usize) -> Option<Channel> {
        self.channels.get(index).copied()
    }

    /// Channels in column order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Channel> + '_ {
        self.channels.iter().copied()
    }

    pub fn as_slice(&self) -> &[Channel] {
        &self.channels
    }
}

impl Default for ChannelTable {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNELS)
    }
}

impl<'a> IntoIterator for &'a ChannelTable {
    type Item = &'a Channel;
    type IntoIter = std::slice::Iter<'a, Channel>;

    fn into_iter(self) -> Self::IntoIter {
        self.channels.iter()
    }
}

impl FromStr for ChannelTable {
    type Err = LineError;

    /// Parse a comma-separated list such as `0,2,3`. The empty string is the
    /// empty table.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(Self::empty());
        }

        input
            .split(',')
            .map(|item| {
                let item = item.trim();
                item.parse::<u32>()
                    .map(Channel)
                    .map_err(|_| LineError::InvalidChannel(item.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|channels| Self { channels })
    }
}

impl fmt::Display for ChannelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, channel) in self.channels.iter().enumerate() {
            if index > 0 {
                f.write_str(",")?;
            }
            write!(f, "{channel}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_documented_channels() {
        let table = ChannelTable::default();
        assert_eq!(table.len(), 9);
        assert_eq!(table.to_string(), "0,2,3,7,12,13,14,15,16");
        assert_eq!(table.get(0), Some(Channel(0)));
        assert_eq!(table.get(8), Some(Channel(16)));
        assert_eq!(table.get(9), None);
    }

    #[test]
    fn parse_preserves_order_and_duplicates() {
        let table: ChannelTable = "16, 3,3,0".parse().unwrap();
        let ids: Vec<u32> = table.iter().map(Channel::id).collect();
        assert_eq!(ids, vec![16, 3, 3, 0]);
    }

    #[test]
    fn parse_empty_is_empty_table() {
        let table: ChannelTable = "".parse().unwrap();
        assert!(table.is_empty());
        assert_eq!(table.to_string(), "");
    }

    #[test]
    fn parse_rejects_bad_entries() {
        assert!(matches!(
            "0,,2".parse::<ChannelTable>(),
            Err(LineError::InvalidChannel(_))
        ));
        assert!(matches!(
            "0,-1".parse::<ChannelTable>(),
            Err(LineError::InvalidChannel(token)) if token == "-1"
        ));
    }
}
