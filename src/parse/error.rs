use logos::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("found unexpected token {literal:?} at position {}", .span.start)]
    UnexpectedToken { literal: String, span: Span },
    #[error("unrecognised die type {literal:?} at position {}", .span.start)]
    UnknownDieType { literal: String, span: Span },
    #[error("unterminated group starting at position {}", .span.start)]
    UnterminatedGroup { span: Span },
}

impl ParseError {
    /// The offending source text, if the error is tied to a single token.
    pub fn literal(&self) -> Option<&str> {
        match self {
            Self::UnexpectedToken { literal, .. } | Self::UnknownDieType { literal, .. } => {
                Some(literal)
            }
            Self::UnterminatedGroup { .. } => None,
        }
    }

    pub fn span(&self) -> &Span {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::UnknownDieType { span, .. }
            | Self::UnterminatedGroup { span } => span,
        }
    }
}
