use crate::parse::ParseError;
use crate::roll::RollError;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Roll(#[from] RollError),
}
