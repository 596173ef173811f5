use std::convert::TryFrom;
use std::fmt::Display;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::{GoError, GoResult};

/// The GO evidence codes
///
/// Each code occupies one bit of the [`Evidence`] bitmask, in the order
/// listed here (`EXP` is bit 0, `NR` is bit 17).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum EvidenceCode {
    /// Inferred from Experiment
    EXP,
    /// Inferred from Direct Assay
    IDA,
    /// Inferred from Physical Interaction
    IPI,
    /// Inferred from Mutant Phenotype
    IMP,
    /// Inferred from Genetic Interaction
    IGI,
    /// Inferred from Expression Pattern
    IEP,
    /// Inferred from Sequence or structural Similarity
    ISS,
    /// Inferred from Sequence Alignment
    ISA,
    /// Inferred from Sequence Orthology
    ISO,
    /// Inferred from Sequence Model
    ISM,
    /// Inferred from Genomic Context
    IGC,
    /// Inferred from Reviewed Computational Analysis
    RCA,
    /// Traceable Author Statement
    TAS,
    /// Non-traceable Author Statement
    NAS,
    /// Inferred by Curator
    IC,
    /// No biological Data available
    ND,
    /// Inferred from Electronic Annotation
    IEA,
    /// Not Recorded
    NR,
}

impl EvidenceCode {
    /// All evidence codes in bit order
    pub const ALL: [EvidenceCode; 18] = [
        EvidenceCode::EXP,
        EvidenceCode::IDA,
        EvidenceCode::IPI,
        EvidenceCode::IMP,
        EvidenceCode::IGI,
        EvidenceCode::IEP,
        EvidenceCode::ISS,
        EvidenceCode::ISA,
        EvidenceCode::ISO,
        EvidenceCode::ISM,
        EvidenceCode::IGC,
        EvidenceCode::RCA,
        EvidenceCode::TAS,
        EvidenceCode::NAS,
        EvidenceCode::IC,
        EvidenceCode::ND,
        EvidenceCode::IEA,
        EvidenceCode::NR,
    ];

    /// Returns the bit of the code in the [`Evidence`] bitmask
    pub fn bit(self) -> u32 {
        1 << (self as u32)
    }

    /// Returns the abbreviation of the code, e.g. `IEA`
    pub fn as_str(self) -> &'static str {
        match self {
            EvidenceCode::EXP => "EXP",
            EvidenceCode::IDA => "IDA",
            EvidenceCode::IPI => "IPI",
            EvidenceCode::IMP => "IMP",
            EvidenceCode::IGI => "IGI",
            EvidenceCode::IEP => "IEP",
            EvidenceCode::ISS => "ISS",
            EvidenceCode::ISA => "ISA",
            EvidenceCode::ISO => "ISO",
            EvidenceCode::ISM => "ISM",
            EvidenceCode::IGC => "IGC",
            EvidenceCode::RCA => "RCA",
            EvidenceCode::TAS => "TAS",
            EvidenceCode::NAS => "NAS",
            EvidenceCode::IC => "IC",
            EvidenceCode::ND => "ND",
            EvidenceCode::IEA => "IEA",
            EvidenceCode::NR => "NR",
        }
    }
}

impl Display for EvidenceCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for EvidenceCode {
    type Error = GoError;
    fn try_from(value: &str) -> GoResult<Self> {
        EvidenceCode::ALL
            .into_iter()
            .find(|code| code.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| GoError::InvalidEvidenceCode(value.to_string()))
    }
}

impl FromStr for EvidenceCode {
    type Err = GoError;
    fn from_str(s: &str) -> GoResult<Self> {
        EvidenceCode::try_from(s)
    }
}

/// A set of [`EvidenceCode`]s, stored as bitmask
///
/// Annotation records carry the evidence of the annotation, queries use
/// `Evidence` as a filter: a record passes if it shares at least one code
/// with the filter.
///
/// # Examples
///
/// ```
/// use goterm::{Evidence, EvidenceCode};
///
/// let experimental = Evidence::from_codes([EvidenceCode::EXP, EvidenceCode::IDA]);
/// assert_eq!(experimental.bits(), 0b11);
///
/// let record = Evidence::from(EvidenceCode::IDA);
/// assert!(experimental.intersects(record));
/// assert!(!experimental.intersects(EvidenceCode::IEA.into()));
/// assert!(Evidence::ALL.contains(EvidenceCode::NR));
///
/// let parsed: Evidence = "IEA,TAS".parse().unwrap();
/// assert_eq!(parsed.codes(), vec![EvidenceCode::TAS, EvidenceCode::IEA]);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Evidence {
    bits: u32,
}

impl Evidence {
    /// No evidence code
    pub const NONE: Evidence = Evidence { bits: 0 };
    /// Every evidence code
    pub const ALL: Evidence = Evidence {
        bits: (1 << EvidenceCode::ALL.len()) - 1,
    };

    /// Constructs `Evidence` from a raw bitmask
    ///
    /// Bits beyond the known codes are dropped.
    pub fn from_bits(bits: u32) -> Self {
        Evidence {
            bits: bits & Evidence::ALL.bits,
        }
    }

    /// Constructs `Evidence` from a list of codes
    pub fn from_codes<I: IntoIterator<Item = EvidenceCode>>(codes: I) -> Self {
        codes.into_iter().map(Evidence::from).fold(Evidence::NONE, BitOr::bitor)
    }

    /// Returns the raw bitmask
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Returns `true` if no code is set
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// Returns `true` if `code` is set
    pub fn contains(&self, code: EvidenceCode) -> bool {
        self.bits & code.bit() != 0
    }

    /// Returns `true` if `self` and `other` share at least one code
    pub fn intersects(&self, other: Evidence) -> bool {
        self.bits & other.bits != 0
    }

    /// Returns all set codes in bit order
    pub fn codes(&self) -> Vec<EvidenceCode> {
        EvidenceCode::ALL
            .into_iter()
            .filter(|code| self.contains(*code))
            .collect()
    }
}

impl From<EvidenceCode> for Evidence {
    fn from(code: EvidenceCode) -> Self {
        Evidence { bits: code.bit() }
    }
}

impl BitOr for Evidence {
    type Output = Evidence;
    fn bitor(self, rhs: Self) -> Self::Output {
        Evidence {
            bits: self.bits | rhs.bits,
        }
    }
}

impl BitOrAssign for Evidence {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl Display for Evidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let codes: Vec<&str> = self.codes().into_iter().map(EvidenceCode::as_str).collect();
        write!(f, "{}", codes.join(","))
    }
}

/// Parses a comma separated list of evidence codes
impl FromStr for Evidence {
    type Err = GoError;
    fn from_str(s: &str) -> GoResult<Self> {
        let mut evidence = Evidence::NONE;
        for code in s.split(',').map(str::trim).filter(|code| !code.is_empty()) {
            evidence |= EvidenceCode::try_from(code)?.into();
        }
        Ok(evidence)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bits_follow_code_order() {
        assert_eq!(EvidenceCode::EXP.bit(), 1);
        assert_eq!(EvidenceCode::IEA.bit(), 1 << 16);
        assert_eq!(EvidenceCode::NR.bit(), 1 << 17);
        assert_eq!(Evidence::ALL.bits(), 0x3_ffff);
        assert_eq!(Evidence::ALL.codes().len(), 18);
    }

    #[test]
    fn codes_round_trip() {
        for code in EvidenceCode::ALL {
            assert_eq!(EvidenceCode::try_from(code.as_str()), Ok(code));
        }
        assert_eq!("iea".parse::<EvidenceCode>(), Ok(EvidenceCode::IEA));
        assert_eq!(
            "XYZ".parse::<EvidenceCode>(),
            Err(GoError::InvalidEvidenceCode("XYZ".to_string()))
        );
    }

    #[test]
    fn bitmask_operations() {
        let mut evidence = Evidence::from(EvidenceCode::TAS);
        assert!(!evidence.contains(EvidenceCode::NAS));
        evidence |= EvidenceCode::NAS.into();
        assert!(evidence.contains(EvidenceCode::NAS));
        assert_eq!(evidence.to_string(), "TAS,NAS");
        assert!(Evidence::NONE.is_empty());
        assert!(!Evidence::NONE.intersects(Evidence::ALL));
        assert_eq!(Evidence::from_bits(u32::MAX), Evidence::ALL);
    }

    #[test]
    fn parse_list() {
        assert_eq!("".parse::<Evidence>(), Ok(Evidence::NONE));
        assert_eq!(
            "EXP, IDA".parse::<Evidence>(),
            Ok(Evidence::from_codes([EvidenceCode::IDA, EvidenceCode::EXP]))
        );
        assert!("EXP,FOO".parse::<Evidence>().is_err());
    }
}
