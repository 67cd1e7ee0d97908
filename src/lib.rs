//! Parsing and rolling of compact dice notation such as `4d6!!5kh3sd+3` or `{3d6+4,2d8}kh1`.
//!
//! ```
//! use dice_notation::ScriptedRoller;
//!
//! let roll = dice_notation::parse("3d6+4").unwrap();
//! let result = roll.evaluate(ScriptedRoller::new(vec![1, 1, 2])).unwrap();
//! assert_eq!(result.total, 8);
//! assert_eq!(roll.render(), "3d6+4");
//! ```

pub mod common;
pub mod dice;
mod error;
pub mod parse;
pub mod roll;

pub use dice::{DieRoll, DieSpec};
pub use error::Error;
pub use parse::ParseError;
pub use roll::{
    Eval, GroupedRoll, Roll, RollContext, RollError, RollResult, Roller, ScriptedRoller,
    SingleRoll,
};

/// Parses notation into a [`Roll`].
pub fn parse(notation: &str) -> Result<Roll, ParseError> {
    parse::parse(notation)
}

/// Rolls `notation` with the thread-local generator, allowing at most 1000 draws.
pub fn roll(notation: &str) -> Result<String, Error> {
    roll_in(notation, &mut RollContext::default())
}

/// Rolls `notation` with `roller` and describes the outcome in one line.
pub fn roll_with<R: Roller>(notation: &str, roller: R) -> Result<String, Error> {
    roll_in(notation, &mut RollContext::new_unbounded(roller))
}

pub fn roll_in<R: Roller>(notation: &str, ctx: &mut RollContext<R>) -> Result<String, Error> {
    let roll = parse(notation)?;
    let result = ctx.eval(&roll)?;
    Ok(format!(
        "Rolled \"{}\" and got {} for a total of {}",
        roll, result, result.total
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_with() {
        assert_eq!(
            roll_with("3d6+4", ScriptedRoller::new(vec![1, 1, 2])).unwrap(),
            "Rolled \"3d6+4\" and got 1, 1, 2 for a total of 8"
        );
        assert_eq!(
            roll_with("1d20 + 2", ScriptedRoller::new(vec![17])).unwrap(),
            "Rolled \"d20+2\" and got 17 for a total of 19"
        );
    }

    #[test]
    fn test_roll_errors() {
        let err = roll_with("3d4d5", ScriptedRoller::default()).unwrap_err();
        assert_eq!(err.to_string(), "found unexpected token \"d5\" at position 3");

        let err = roll_in("3d1r1", &mut RollContext::new_bounded(10, ScriptedRoller::default()))
            .unwrap_err();
        assert_eq!(err, Error::Roll(RollError::TooManyRolls { limit: 10 }));
    }

    #[test]
    fn test_roll_default() {
        let rolled = roll("4d6kh3").unwrap();
        assert!(rolled.starts_with("Rolled \"4d6kh3\" and got "));
    }
}
