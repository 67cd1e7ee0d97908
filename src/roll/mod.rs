mod ctx;
mod error;
mod ops;
mod roller;
mod stringify;
mod tree;

pub(crate) type RResult<T> = Result<T, RollError>;

pub use ctx::{DefaultRoller, RollContext};
pub use error::RollError;
#[cfg(test)]
pub(crate) use roller::StepRoller;
pub use roller::{Roller, ScriptedRoller};
pub use tree::{Eval, GroupedRoll, Roll, RollResult, SingleRoll};
