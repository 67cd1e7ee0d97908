mod error;
mod lexer;
mod parser;

pub use error::ParseError;
pub use lexer::{Lexer, Token, TokenKind};

pub(crate) fn parse(s: &str) -> Result<crate::roll::Roll, ParseError> {
    parser::Parser::new(s).parse()
}
