//! Iterator modes for range reads
//!
//! An iterator mode selects the comparison semantics of a select request.
//! Discriminants are the protocol codes.

use super::error::DatabaseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported iterator modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum IteratorType {
    /// Key equals
    #[default]
    Eq = 0,
    /// Key equals, reverse order
    Req = 1,
    /// All tuples
    All = 2,
    /// Key less than
    Lt = 3,
    /// Key less than or equal
    Le = 4,
    /// Key greater than or equal
    Ge = 5,
    /// Key greater than
    Gt = 6,
    /// All bits of the key are set (bitset indexes)
    BitsAllSet = 7,
    /// Any bit of the key is set (bitset indexes)
    BitsAnySet = 8,
    /// No bit of the key is set (bitset indexes)
    BitsAllNotSet = 9,
    /// Rectangles overlap (rtree indexes)
    Overlaps = 10,
    /// Nearest neighbor (rtree indexes)
    Neighbor = 11,
}

const ALL_ITERATORS: [IteratorType; 12] = [
    IteratorType::Eq,
    IteratorType::Req,
    IteratorType::All,
    IteratorType::Lt,
    IteratorType::Le,
    IteratorType::Ge,
    IteratorType::Gt,
    IteratorType::BitsAllSet,
    IteratorType::BitsAnySet,
    IteratorType::BitsAllNotSet,
    IteratorType::Overlaps,
    IteratorType::Neighbor,
];

impl IteratorType {
    /// Protocol code of this iterator
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Lua name of this iterator, as accepted by `index:select{..., {iterator = ...}}`
    pub fn to_str(&self) -> &'static str {
        match self {
            IteratorType::Eq => "EQ",
            IteratorType::Req => "REQ",
            IteratorType::All => "ALL",
            IteratorType::Lt => "LT",
            IteratorType::Le => "LE",
            IteratorType::Ge => "GE",
            IteratorType::Gt => "GT",
            IteratorType::BitsAllSet => "BITS_ALL_SET",
            IteratorType::BitsAnySet => "BITS_ANY_SET",
            IteratorType::BitsAllNotSet => "BITS_ALL_NOT_SET",
            IteratorType::Overlaps => "OVERLAPS",
            IteratorType::Neighbor => "NEIGHBOR",
        }
    }
}

impl std::fmt::Display for IteratorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl TryFrom<u32> for IteratorType {
    type Error = DatabaseError;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        ALL_ITERATORS
            .iter()
            .copied()
            .find(|it| it.code() == code)
            .ok_or_else(|| DatabaseError::InvalidIterator(code.to_string()))
    }
}

impl FromStr for IteratorType {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.parse::<u32>() {
            return IteratorType::try_from(code);
        }
        let upper = s.to_uppercase();
        ALL_ITERATORS
            .iter()
            .copied()
            .find(|it| it.to_str() == upper)
            .ok_or_else(|| DatabaseError::InvalidIterator(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iterator_codes() {
        assert_eq!(IteratorType::Eq.code(), 0);
        assert_eq!(IteratorType::Gt.code(), 6);
        assert_eq!(IteratorType::Neighbor.code(), 11);
    }

    #[test]
    fn test_iterator_from_str() {
        assert_eq!("gt".parse::<IteratorType>().ok(), Some(IteratorType::Gt));
        assert_eq!("EQ".parse::<IteratorType>().ok(), Some(IteratorType::Eq));
        assert_eq!(
            "bits_any_set".parse::<IteratorType>().ok(),
            Some(IteratorType::BitsAnySet)
        );
        assert_eq!("4".parse::<IteratorType>().ok(), Some(IteratorType::Le));
        assert!("12".parse::<IteratorType>().is_err());
        assert!("sideways".parse::<IteratorType>().is_err());
    }

    #[test]
    fn test_iterator_display() {
        assert_eq!(IteratorType::BitsAllSet.to_string(), "BITS_ALL_SET");
        assert_eq!(IteratorType::default(), IteratorType::Eq);
    }
}
