use std::fmt::{self, Write};
use std::num::NonZeroU32;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub type Int = i32;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type NonEmpty<T> = vec1::Vec1<T>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Comparison {
    Equals,
    GreaterThan,
    LessThan,
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Equals => '=',
            Self::GreaterThan => '>',
            Self::LessThan => '<',
        };
        f.write_char(c)
    }
}

/// A threshold test applied to a face value.
///
/// The alternate form (`{:#}`) writes an `Equals` test as bare digits, which is how it
/// appears after a prefix token such as `r` or `!!`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonOp {
    pub kind: Comparison,
    pub value: Int,
}

impl ComparisonOp {
    pub const fn new(kind: Comparison, value: Int) -> Self {
        Self { kind, value }
    }

    pub const fn equals(value: Int) -> Self {
        Self::new(Comparison::Equals, value)
    }

    pub const fn greater_than(value: Int) -> Self {
        Self::new(Comparison::GreaterThan, value)
    }

    pub const fn less_than(value: Int) -> Self {
        Self::new(Comparison::LessThan, value)
    }

    pub fn matches(&self, x: Int) -> bool {
        match self.kind {
            Comparison::Equals => x == self.value,
            Comparison::GreaterThan => x > self.value,
            Comparison::LessThan => x < self.value,
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !(f.alternate() && self.kind == Comparison::Equals) {
            write!(f, "{}", self.kind)?;
        }
        write!(f, "{}", self.value)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExplodeKind {
    Exploding,
    Compounded,
    Penetrating,
}

impl fmt::Display for ExplodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Exploding => "!",
            Self::Compounded => "!!",
            Self::Penetrating => "!p",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExplodingOp {
    pub kind: ExplodeKind,
    pub comparison: ComparisonOp,
}

impl ExplodingOp {
    pub const fn new(kind: ExplodeKind, comparison: ComparisonOp) -> Self {
        Self { kind, comparison }
    }
}

impl fmt::Display for ExplodingOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:#}", self.kind, self.comparison)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LimitKind {
    KeepHighest,
    KeepLowest,
    DropHighest,
    DropLowest,
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::KeepHighest => "kh",
            Self::KeepLowest => "kl",
            Self::DropHighest => "dh",
            Self::DropLowest => "dl",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LimitOp {
    pub kind: LimitKind,
    pub amount: usize,
}

impl LimitOp {
    pub const fn new(kind: LimitKind, amount: usize) -> Self {
        Self { kind, amount }
    }
}

impl fmt::Display for LimitOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind, self.amount)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RerollOp {
    pub comparison: ComparisonOp,
    pub once: bool,
}

impl RerollOp {
    pub const fn new(comparison: ComparisonOp, once: bool) -> Self {
        Self { comparison, once }
    }
}

impl fmt::Display for RerollOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.once { "ro" } else { "r" };
        write!(f, "{}{:#}", prefix, self.comparison)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SortOp {
    #[default]
    Unsorted,
    Ascending,
    Descending,
}

impl fmt::Display for SortOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unsorted => "",
            Self::Ascending => "s",
            Self::Descending => "sd",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comparison_matches() {
        assert!(ComparisonOp::equals(3).matches(3));
        assert!(!ComparisonOp::equals(3).matches(4));
        assert!(ComparisonOp::greater_than(3).matches(4));
        assert!(!ComparisonOp::greater_than(3).matches(3));
        assert!(ComparisonOp::less_than(3).matches(2));
        assert!(!ComparisonOp::less_than(3).matches(3));
    }

    #[test]
    fn test_display_ops() {
        assert_eq!(ComparisonOp::equals(5).to_string(), "=5");
        assert_eq!(format!("{:#}", ComparisonOp::equals(5)), "5");
        assert_eq!(format!("{:#}", ComparisonOp::less_than(2)), "<2");
        assert_eq!(
            ExplodingOp::new(ExplodeKind::Compounded, ComparisonOp::equals(5)).to_string(),
            "!!5"
        );
        assert_eq!(
            ExplodingOp::new(ExplodeKind::Penetrating, ComparisonOp::greater_than(4)).to_string(),
            "!p>4"
        );
        assert_eq!(LimitOp::new(LimitKind::DropLowest, 1).to_string(), "dl1");
        assert_eq!(RerollOp::new(ComparisonOp::equals(1), true).to_string(), "ro1");
        assert_eq!(SortOp::Unsorted.to_string(), "");
        assert_eq!(SortOp::Descending.to_string(), "sd");
    }
}
