use std::convert::TryFrom;
use std::ops::BitOr;
use std::str::FromStr;

use crate::{GoError, GoResult};

/// The namespace of a GO term as bitmask
///
/// Records carry exactly one aspect, query filters can combine several.
///
/// # Examples
///
/// ```
/// use goterm::Aspect;
///
/// let filter = Aspect::PROCESS | Aspect::FUNCTION;
/// assert!(filter.intersects(Aspect::try_from("F").unwrap()));
/// assert!(!filter.intersects("cellular_component".parse().unwrap()));
/// assert!(Aspect::ALL.intersects(Aspect::COMPONENT));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Aspect {
    bits: u8,
}

impl Aspect {
    /// Biological process (`P`)
    pub const PROCESS: Aspect = Aspect { bits: 1 };
    /// Cellular component (`C`)
    pub const COMPONENT: Aspect = Aspect { bits: 2 };
    /// Molecular function (`F`)
    pub const FUNCTION: Aspect = Aspect { bits: 4 };
    /// All three namespaces
    pub const ALL: Aspect = Aspect { bits: 7 };

    /// Constructs an `Aspect` from a raw bitmask, dropping unknown bits
    pub fn from_bits(bits: u8) -> Self {
        Aspect {
            bits: bits & Aspect::ALL.bits,
        }
    }

    /// Returns the raw bitmask
    pub fn bits(&self) -> u8 {
        self.bits
    }

    /// Returns `true` if `self` and `other` share a namespace
    pub fn intersects(&self, other: Aspect) -> bool {
        self.bits & other.bits != 0
    }
}

impl Default for Aspect {
    fn default() -> Self {
        Aspect::ALL
    }
}

impl BitOr for Aspect {
    type Output = Aspect;
    fn bitor(self, rhs: Self) -> Self::Output {
        Aspect {
            bits: self.bits | rhs.bits,
        }
    }
}

/// Parses the one-letter aspect of annotation files or the namespace name
impl TryFrom<&str> for Aspect {
    type Error = GoError;
    fn try_from(value: &str) -> GoResult<Self> {
        match value {
            "P" | "biological_process" => Ok(Aspect::PROCESS),
            "C" | "cellular_component" => Ok(Aspect::COMPONENT),
            "F" | "molecular_function" => Ok(Aspect::FUNCTION),
            _ => Err(GoError::InvalidAspect(value.to_string())),
        }
    }
}

impl FromStr for Aspect {
    type Err = GoError;
    fn from_str(s: &str) -> GoResult<Self> {
        Aspect::try_from(s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(Aspect::try_from("P"), Ok(Aspect::PROCESS));
        assert_eq!("molecular_function".parse(), Ok(Aspect::FUNCTION));
        assert_eq!(
            Aspect::try_from("X"),
            Err(GoError::InvalidAspect("X".to_string()))
        );
    }

    #[test]
    fn combine() {
        let all = Aspect::PROCESS | Aspect::COMPONENT | Aspect::FUNCTION;
        assert_eq!(all, Aspect::ALL);
        assert_eq!(Aspect::default(), Aspect::ALL);
        assert_eq!(Aspect::from_bits(0xff).bits(), 7);
        assert!(!Aspect::PROCESS.intersects(Aspect::COMPONENT));
    }
}
