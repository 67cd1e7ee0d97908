use crate::common::{Int, NonZeroUInt, UInt};
use crate::roll::Roller;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const FATE_MINUS: &str = "⊟";
pub const FATE_BLANK: &str = "☐";
pub const FATE_PLUS: &str = "⊞";

const FATE_SIDES: NonZeroUInt = match NonZeroUInt::new(3) {
    Some(sides) => sides,
    None => unreachable!(),
};

/// The kind of die a roll throws.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DieSpec {
    /// A uniform die numbered `1..=sides`.
    Standard(NonZeroUInt),
    /// A Fudge/Fate die showing -1, 0 or +1.
    Fate,
}

impl DieSpec {
    /// A standard die, if `sides` is a face count the roll arithmetic can hold.
    pub fn standard(sides: UInt) -> Option<Self> {
        NonZeroUInt::new(sides)
            .filter(|sides| Int::try_from(sides.get()).is_ok())
            .map(Self::Standard)
    }

    /// Draws one face, consuming exactly one sample from `roller`.
    pub fn roll<R: Roller + ?Sized>(&self, roller: &mut R) -> DieRoll {
        let value = match self {
            Self::Standard(sides) => {
                let face = roller.roll(*sides).clamp(1, sides.get());
                Int::try_from(face).unwrap_or(Int::MAX)
            }
            Self::Fate => roller.roll(FATE_SIDES).clamp(1, 3) as Int - 2,
        };
        self.face(value)
    }

    /// Builds a face of this die showing `value`.
    pub fn face(&self, value: Int) -> DieRoll {
        DieRoll::new(value, self.symbol(value))
    }

    pub fn symbol(&self, value: Int) -> String {
        match (self, value) {
            (Self::Fate, -1) => FATE_MINUS.to_owned(),
            (Self::Fate, 0) => FATE_BLANK.to_owned(),
            (Self::Fate, 1) => FATE_PLUS.to_owned(),
            _ => value.to_string(),
        }
    }
}

impl fmt::Display for DieSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard(sides) => write!(f, "d{}", sides),
            Self::Fate => f.write_str("dF"),
        }
    }
}

/// One generated face.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DieRoll {
    pub value: Int,
    pub symbol: String,
}

impl DieRoll {
    pub fn new(value: Int, symbol: impl Into<String>) -> Self {
        Self {
            value,
            symbol: symbol.into(),
        }
    }

    /// A face that was not drawn from a die, such as a compounded sum or a group member's total.
    pub fn synthetic(value: Int) -> Self {
        Self::new(value, value.to_string())
    }

    pub(crate) fn negated(self) -> Option<Self> {
        let value = self.value.checked_neg()?;
        let symbol = match self.symbol.as_str() {
            FATE_MINUS => FATE_PLUS.to_owned(),
            FATE_PLUS => FATE_MINUS.to_owned(),
            FATE_BLANK => self.symbol,
            _ => value.to_string(),
        };
        Some(Self { value, symbol })
    }
}

impl fmt::Display for DieRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::{ScriptedRoller, StepRoller};
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_standard_faces_in_range() {
        let d6 = DieSpec::standard(6).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let face = d6.roll(&mut rng);
            assert!((1..=6).contains(&face.value));
            assert_eq!(face.symbol, face.value.to_string());
        }
    }

    #[test]
    fn test_fate_faces() {
        let mut roller = StepRoller::new(NonZeroUInt::new(1).unwrap(), 1);
        let faces: Vec<_> = (0..3).map(|_| DieSpec::Fate.roll(&mut roller)).collect();
        assert_eq!(
            faces,
            vec![
                DieRoll::new(-1, FATE_MINUS),
                DieRoll::new(0, FATE_BLANK),
                DieRoll::new(1, FATE_PLUS),
            ]
        );
    }

    #[test]
    fn test_fate_symbol_out_of_range() {
        assert_eq!(DieSpec::Fate.symbol(-2), "-2");
    }

    #[test]
    fn test_scripted_draws() {
        let d20 = DieSpec::standard(20).unwrap();
        let mut roller = ScriptedRoller::new(vec![20, 1]);
        assert_eq!(d20.roll(&mut roller).value, 20);
        assert_eq!(d20.roll(&mut roller).value, 1);
        assert_eq!(d20.roll(&mut roller).value, 20);
    }

    #[test]
    fn test_negated() {
        assert_eq!(DieRoll::new(4, "4").negated(), Some(DieRoll::new(-4, "-4")));
        assert_eq!(
            DieRoll::new(1, FATE_PLUS).negated(),
            Some(DieRoll::new(-1, FATE_MINUS))
        );
        assert_eq!(DieRoll::synthetic(Int::MIN).negated(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(DieSpec::standard(20).unwrap().to_string(), "d20");
        assert_eq!(DieSpec::Fate.to_string(), "dF");
        assert_eq!(DieSpec::standard(0), None);
        assert_eq!(DieSpec::standard(3_000_000_000), None);
        assert!(DieSpec::standard(Int::MAX as UInt).is_some());
    }
}
