//! Canonical notation for parsed rolls.

use super::tree::{GroupedRoll, Roll, SingleRoll};
use crate::common::{ComparisonOp, Int, LimitOp};
use std::fmt::{self, Write};

impl fmt::Display for Roll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(roll) => fmt::Display::fmt(roll, f),
            Self::Grouped(roll) => fmt::Display::fmt(roll, f),
        }
    }
}

impl fmt::Display for SingleRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.multiplier {
            1 => {}
            -1 => f.write_char('-')?,
            n => write!(f, "{}", n)?,
        }
        write!(f, "{}", self.die)?;
        for reroll in &self.rerolls {
            write!(f, "{}", reroll)?;
        }
        if let Some(exploding) = &self.exploding {
            write!(f, "{}", exploding)?;
        }
        fmt_limit_and_tests(f, self.limit.as_ref(), self.success.as_ref(), self.failure.as_ref())?;
        write!(f, "{}", self.sort)?;
        fmt_modifier(f, self.modifier)
    }
}

impl fmt::Display for GroupedRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_char('-')?;
        }
        f.write_char('{')?;
        for (i, roll) in self.rolls.iter().enumerate() {
            let rendered = roll.to_string();
            if i > 0 {
                if !self.combined {
                    f.write_char(',')?;
                } else if !rendered.starts_with('-') {
                    f.write_char('+')?;
                }
            }
            f.write_str(&rendered)?;
        }
        f.write_char('}')?;
        fmt_limit_and_tests(f, self.limit.as_ref(), self.success.as_ref(), self.failure.as_ref())?;
        fmt_modifier(f, self.modifier)
    }
}

fn fmt_limit_and_tests(
    f: &mut fmt::Formatter<'_>,
    limit: Option<&LimitOp>,
    success: Option<&ComparisonOp>,
    failure: Option<&ComparisonOp>,
) -> fmt::Result {
    if let Some(limit) = limit {
        write!(f, "{}", limit)?;
    }
    // A bare success threshold would run into a preceding limit amount.
    if let Some(success) = success {
        write!(f, "{}", success)?;
    }
    if let Some(failure) = failure {
        write!(f, "f{:#}", failure)?;
    }
    Ok(())
}

fn fmt_modifier(f: &mut fmt::Formatter<'_>, modifier: Int) -> fmt::Result {
    if modifier != 0 {
        write!(f, "{:+}", modifier)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    fn check(s: &str, expected: &str) {
        let roll = crate::parse(s).unwrap();
        assert_eq!(roll.render(), expected);
        assert_eq!(crate::parse(expected).unwrap(), roll);
    }

    fn check_same(s: &str) {
        check(s, s);
    }

    #[test]
    fn test_render_single() {
        check_same("d20");
        check_same("3d6+4");
        check_same("6d6!!5kh3sd+3");
        check_same("6d6r2ro4>3f1");
        check_same("4dF=0");
        check_same("10d10!p>8<3f1s-2");
        check_same("0d6");
        check("1d20", "d20");
        check("3D6", "3d6");
        check("4df", "4dF");
        check("3d6+4-1+6-3", "3d6+6");
        check("2d20kh", "2d20kh1");
        check("6d6f=1", "6d6f1");
        check("3d6 r 1 + 2", "3d6r1+2");
    }

    #[test]
    fn test_render_group() {
        check_same("{3d6+4,2d8}");
        check_same("{d6+2d8}");
        check_same("{d6-2d8}kh1");
        check_same("{d6-{d4+d8}}");
        check_same("{{d4}+{d6}}>3f1-1");
        check("{3d6+4,2d8}dl=1f>5", "{3d6+4,2d8}dl1=1f>5");
        check("{ d6 , d8 }", "{d6,d8}");
    }
}
