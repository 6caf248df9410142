use std::str::FromStr;

use crate::error::RangeError;
use crate::feed::Episode;

/// A closed interval of episode numbers selected for processing.
///
/// `first > last` is representable and simply matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeRange {
    pub first: i64,
    pub last: i64,
}

impl EpisodeRange {
    /// Whether the given episode number falls inside the range
    pub fn contains(&self, number: u32) -> bool {
        let n = i64::from(number);
        self.first <= n && n <= self.last
    }
}

impl FromStr for EpisodeRange {
    type Err = RangeError;

    /// Parse either a single episode number (`n`) or a range (`n-m`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RangeError::Invalid {
            input: s.to_string(),
        };

        let parts: Vec<&str> = s.split('-').collect();
        match parts.as_slice() {
            [single] => {
                let n = single.parse().map_err(|_| invalid())?;
                Ok(Self { first: n, last: n })
            }
            [from, to] => {
                let first = from.parse().map_err(|_| invalid())?;
                let last = to.parse().map_err(|_| invalid())?;
                Ok(Self { first, last })
            }
            _ => Err(invalid()),
        }
    }
}

/// Filter episodes by range membership, preserving feed order.
///
/// Episodes without a number never match.
pub fn select_episodes<'a>(episodes: &'a [Episode], range: EpisodeRange) -> Vec<&'a Episode> {
    episodes
        .iter()
        .filter(|ep| ep.number.is_some_and(|n| range.contains(n)))
        .collect()
}
