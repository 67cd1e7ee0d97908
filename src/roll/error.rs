use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RollError {
    #[error("too many dice rolled (limit is {limit})")]
    TooManyRolls { limit: usize },
    #[error("roll total overflowed")]
    Overflow,
}
