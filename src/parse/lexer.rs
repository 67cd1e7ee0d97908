use log::trace;
use logos::{Logos, Span};
use std::fmt;

#[derive(Logos, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[regex(r"[ \t\r\n]+")]
    Whitespace,
    #[regex(r"[0-9]+")]
    Number,
    // Any single letter is lexed as part of the die so that `dX` reports as one bad die.
    // `dl`/`dh` outrank it on priority and become drop tokens.
    #[regex(r"[dD]([0-9]+|[a-zA-Z])?")]
    Die,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("f")]
    Failure,
    #[token("!")]
    Explode,
    #[token("!!")]
    Compound,
    #[token("!p")]
    Penetrate,
    #[regex(r"kh[0-9]*")]
    KeepHigh,
    #[regex(r"kl[0-9]*")]
    KeepLow,
    #[regex(r"dh[0-9]*")]
    DropHigh,
    #[regex(r"dl[0-9]*")]
    DropLow,
    #[token("r")]
    #[token("ro")]
    Reroll,
    #[token("s")]
    #[token("sd")]
    Sort,

    #[token(">")]
    Greater,
    #[token("<")]
    Less,
    #[token("=")]
    Equal,
    #[token("{")]
    GroupStart,
    #[token("}")]
    GroupEnd,
    #[token(",")]
    GroupSeparator,

    Eof,
    #[error]
    Illegal,
}

impl TokenKind {
    pub const LIMITS: &'static [Self] = &[
        Self::KeepHigh,
        Self::KeepLow,
        Self::DropHigh,
        Self::DropLow,
    ];

    pub const COMPARISONS: &'static [Self] = &[Self::Greater, Self::Less, Self::Equal];

    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Whitespace => "<whitespace>",
            Number => "<number>",
            Die => "<die>",
            Plus => "'+'",
            Minus => "'-'",
            Failure => "'f'",
            Explode => "'!'",
            Compound => "'!!'",
            Penetrate => "'!p'",
            KeepHigh => "'kh'",
            KeepLow => "'kl'",
            DropHigh => "'dh'",
            DropLow => "'dl'",
            Reroll => "'r'",
            Sort => "'s'",
            Greater => "'>'",
            Less => "'<'",
            Equal => "'='",
            GroupStart => "'{'",
            GroupEnd => "'}'",
            GroupSeparator => "','",
            Eof => "<end of input>",
            Illegal => "<illegal>",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub literal: &'a str,
    pub span: Span,
}

/// Splits notation into tokens, with room to push the last one back.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    last: Option<Token<'a>>,
    rewind: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(s),
            last: None,
            rewind: false,
        }
    }

    /// Returns the next token, or the pushed-back one after [`Lexer::unscan`].
    ///
    /// Once the input is exhausted every call yields an [`TokenKind::Eof`] token.
    pub fn scan(&mut self) -> Token<'a> {
        if self.rewind {
            if let Some(token) = &self.last {
                self.rewind = false;
                return token.clone();
            }
        }

        let token = match self.inner.next() {
            Some(kind) => Token {
                kind,
                literal: self.inner.slice(),
                span: self.inner.span(),
            },
            None => {
                let end = self.inner.source().len();
                Token {
                    kind: TokenKind::Eof,
                    literal: "",
                    span: end..end,
                }
            }
        };
        trace!("scanned {} {:?}", token.kind, token.literal);
        self.last = Some(token.clone());
        token
    }

    pub fn scan_ignore_whitespace(&mut self) -> Token<'a> {
        loop {
            let token = self.scan();
            if token.kind != TokenKind::Whitespace {
                return token;
            }
        }
    }

    /// Pushes the last scanned token back. Only one token of pushback is kept.
    pub fn unscan(&mut self) {
        self.rewind = true;
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.scan();
        (token.kind != TokenKind::Eof).then(|| token)
    }
}
