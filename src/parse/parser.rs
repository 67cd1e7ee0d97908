use super::error::ParseError;
use super::lexer::{Lexer, Token, TokenKind};
use crate::common::*;
use crate::dice::DieSpec;
use crate::roll::{GroupedRoll, Roll, SingleRoll};
use log::trace;
use logos::Span;
use std::ops::ControlFlow;

type PResult<T> = Result<T, ParseError>;

/// How a nested roll handed control back to its group.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Signal {
    /// The roll is complete and its terminating token was pushed back.
    EndOfRoll,
    /// A trailing `+n`/`-n` was followed by a new term, so it is that term's multiplier.
    /// `span` locates the sign.
    AmbiguousModifier { value: Int, span: Span },
}

/// A numeric modifier read after a sign, kept until the next token shows whether it was one.
type PendingModifier = Option<(Int, Span)>;

/// What followed a `+` or `-` suffix.
enum Modifier<'a> {
    Value(Int, Token<'a>),
    /// A bare sign in front of the next group member.
    Sign(Int),
}

/// The suffixes shared by single and grouped rolls.
trait Suffixed {
    fn modifier_mut(&mut self) -> &mut Int;
    fn limit_mut(&mut self) -> &mut Option<LimitOp>;
    fn success_mut(&mut self) -> &mut Option<ComparisonOp>;
    fn failure_mut(&mut self) -> &mut Option<ComparisonOp>;
}

macro_rules! impl_suffixed {
    ($($ty:ty),*) => {$(
        impl Suffixed for $ty {
            fn modifier_mut(&mut self) -> &mut Int {
                &mut self.modifier
            }

            fn limit_mut(&mut self) -> &mut Option<LimitOp> {
                &mut self.limit
            }

            fn success_mut(&mut self) -> &mut Option<ComparisonOp> {
                &mut self.success
            }

            fn failure_mut(&mut self) -> &mut Option<ComparisonOp> {
                &mut self.failure
            }
        }
    )*};
}

impl_suffixed!(SingleRoll, GroupedRoll);

pub struct Parser<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Parser<'a> {
    pub fn new(s: &'a str) -> Self {
        Self {
            lexer: Lexer::new(s),
        }
    }

    pub fn parse(mut self) -> PResult<Roll> {
        let token = self.advance();
        let (roll, _) = self.parse_roll(token, false)?;
        Ok(roll)
    }

    fn advance(&mut self) -> Token<'a> {
        self.lexer.scan_ignore_whitespace()
    }

    fn rewind(&mut self) {
        self.lexer.unscan();
    }

    fn expect(&mut self, kind: TokenKind) -> PResult<Token<'a>> {
        let token = self.advance();
        if token.kind == kind {
            Ok(token)
        } else {
            Err(unexpected_token(&token))
        }
    }

    fn parse_roll(&mut self, token: Token<'a>, grouped: bool) -> PResult<(Roll, Signal)> {
        match token.kind {
            TokenKind::Number | TokenKind::Die => self.parse_single(token, grouped),
            TokenKind::GroupStart => self.parse_group(token, grouped),
            _ => Err(unexpected_token(&token)),
        }
    }

    fn parse_single(&mut self, first: Token<'a>, grouped: bool) -> PResult<(Roll, Signal)> {
        let (multiplier, die) = if first.kind == TokenKind::Number {
            (parse_int(&first)?, self.expect(TokenKind::Die)?)
        } else {
            (1, first)
        };
        let mut roll = SingleRoll::new(multiplier, parse_die(&die)?);

        let mut last_modifier = None;
        loop {
            let token = self.advance();
            let mut modifier = None;
            match token.kind {
                TokenKind::Reroll => {
                    let comparison = self.parse_comparison()?;
                    roll.rerolls
                        .push(RerollOp::new(comparison, token.literal == "ro"));
                }
                TokenKind::Explode | TokenKind::Compound | TokenKind::Penetrate => {
                    let kind = match token.kind {
                        TokenKind::Explode => ExplodeKind::Exploding,
                        TokenKind::Compound => ExplodeKind::Compounded,
                        _ => ExplodeKind::Penetrating,
                    };
                    roll.exploding = Some(ExplodingOp::new(kind, self.parse_comparison()?));
                }
                TokenKind::Sort => {
                    roll.sort = if token.literal == "sd" {
                        SortOp::Descending
                    } else {
                        SortOp::Ascending
                    };
                }
                _ => match self.parse_suffix(&mut roll, token, grouped, last_modifier)? {
                    ControlFlow::Continue(value) => modifier = value,
                    ControlFlow::Break(signal) => return Ok((roll.into(), signal)),
                },
            }
            last_modifier = modifier;
        }
    }

    fn parse_group(&mut self, start: Token<'a>, grouped: bool) -> PResult<(Roll, Signal)> {
        let mut separator = None;
        let (first, mut signal) = self.parse_member(&start, None)?;
        let mut rolls = NonEmpty::new(first);

        loop {
            let multiplier = match signal {
                Signal::AmbiguousModifier { value, span } => {
                    let sign = if value < 0 { "-" } else { "+" };
                    check_separator(&mut separator, TokenKind::Plus, sign, span)?;
                    Some(value)
                }
                Signal::EndOfRoll => {
                    let token = self.advance();
                    match token.kind {
                        TokenKind::GroupSeparator => {
                            check_separator(&mut separator, token.kind, token.literal, token.span)?;
                            None
                        }
                        TokenKind::GroupEnd => break,
                        TokenKind::Eof => {
                            return Err(ParseError::UnterminatedGroup {
                                span: start.span.clone(),
                            })
                        }
                        _ => return Err(unexpected_token(&token)),
                    }
                }
            };
            let (roll, next) = self.parse_member(&start, multiplier)?;
            rolls.push(roll);
            signal = next;
        }

        let mut group = GroupedRoll::new(rolls);
        group.combined = separator != Some(TokenKind::GroupSeparator);

        let mut last_modifier = None;
        loop {
            let token = self.advance();
            match self.parse_suffix(&mut group, token, grouped, last_modifier)? {
                ControlFlow::Continue(modifier) => last_modifier = modifier,
                ControlFlow::Break(signal) => return Ok((group.into(), signal)),
            }
        }
    }

    /// Parses the next group member, giving it the multiplier handed over by its predecessor.
    fn parse_member(
        &mut self,
        start: &Token<'a>,
        multiplier: Option<Int>,
    ) -> PResult<(Roll, Signal)> {
        let token = self.advance();
        if token.kind == TokenKind::Eof {
            return Err(ParseError::UnterminatedGroup {
                span: start.span.clone(),
            });
        }
        let (mut roll, signal) = self.parse_roll(token, true)?;
        if let Some(multiplier) = multiplier {
            apply_multiplier(&mut roll, multiplier);
        }
        Ok((roll, signal))
    }

    /// Parses one of the suffixes both roll shapes accept.
    ///
    /// Continues with the value of a numeric modifier, if that is what was read, and breaks
    /// with a signal once the roll has ended.
    fn parse_suffix<S: Suffixed>(
        &mut self,
        roll: &mut S,
        token: Token<'a>,
        grouped: bool,
        last_modifier: PendingModifier,
    ) -> PResult<ControlFlow<Signal, PendingModifier>> {
        match token.kind {
            TokenKind::Plus | TokenKind::Minus => {
                return Ok(match self.parse_modifier(&token, grouped)? {
                    Modifier::Value(value, number) => {
                        let modifier = roll
                            .modifier_mut()
                            .checked_add(value)
                            .ok_or_else(|| unexpected_token(&number))?;
                        *roll.modifier_mut() = modifier;
                        ControlFlow::Continue(Some((value, token.span)))
                    }
                    Modifier::Sign(value) => ControlFlow::Break(Signal::AmbiguousModifier {
                        value,
                        span: token.span,
                    }),
                });
            }
            kind if TokenKind::LIMITS.contains(&kind) => {
                *roll.limit_mut() = Some(parse_limit(&token)?);
            }
            kind if TokenKind::COMPARISONS.contains(&kind) => {
                self.rewind();
                *roll.success_mut() = Some(self.parse_comparison()?);
            }
            TokenKind::Failure => {
                *roll.failure_mut() = Some(self.parse_comparison()?);
            }
            TokenKind::Eof => {
                self.rewind();
                return Ok(ControlFlow::Break(Signal::EndOfRoll));
            }
            TokenKind::GroupEnd | TokenKind::GroupSeparator if grouped => {
                self.rewind();
                return Ok(ControlFlow::Break(Signal::EndOfRoll));
            }
            TokenKind::Die if grouped => match last_modifier {
                Some((value, span)) => {
                    trace!("reading {:+} as the multiplier of {:?}", value, token.literal);
                    self.rewind();
                    // Undoes the addition made when the modifier was read.
                    *roll.modifier_mut() -= value;
                    return Ok(ControlFlow::Break(Signal::AmbiguousModifier { value, span }));
                }
                None => return Err(unexpected_token(&token)),
            },
            _ => return Err(unexpected_token(&token)),
        }
        Ok(ControlFlow::Continue(None))
    }

    fn parse_modifier(&mut self, sign: &Token<'a>, grouped: bool) -> PResult<Modifier<'a>> {
        let sign = if sign.kind == TokenKind::Minus { -1 } else { 1 };
        let token = self.advance();
        match token.kind {
            TokenKind::Number => Ok(Modifier::Value(sign * parse_int(&token)?, token)),
            TokenKind::Die | TokenKind::GroupStart if grouped => {
                self.rewind();
                Ok(Modifier::Sign(sign))
            }
            _ => Err(unexpected_token(&token)),
        }
    }

    fn parse_comparison(&mut self) -> PResult<ComparisonOp> {
        let token = self.advance();
        let kind = match token.kind {
            TokenKind::Number => return Ok(ComparisonOp::equals(parse_int(&token)?)),
            TokenKind::Equal => Comparison::Equals,
            TokenKind::Greater => Comparison::GreaterThan,
            TokenKind::Less => Comparison::LessThan,
            _ => return Err(unexpected_token(&token)),
        };
        let value = self.expect(TokenKind::Number)?;
        Ok(ComparisonOp::new(kind, parse_int(&value)?))
    }
}

fn unexpected_token(token: &Token<'_>) -> ParseError {
    ParseError::UnexpectedToken {
        literal: token.literal.to_owned(),
        span: token.span.clone(),
    }
}

fn parse_int(token: &Token<'_>) -> PResult<Int> {
    token.literal.parse().map_err(|_| unexpected_token(token))
}

fn parse_die(token: &Token<'_>) -> PResult<DieSpec> {
    // The lexer guarantees an ASCII `d`/`D` first.
    let code = &token.literal[1..];
    let die = if !code.is_empty() && code.bytes().all(|b| b.is_ascii_digit()) {
        let sides: Int = code.parse().map_err(|_| unexpected_token(token))?;
        DieSpec::standard(sides.unsigned_abs())
    } else if code.eq_ignore_ascii_case("f") {
        Some(DieSpec::Fate)
    } else {
        None
    };
    die.ok_or_else(|| ParseError::UnknownDieType {
        literal: token.literal.to_owned(),
        span: token.span.clone(),
    })
}

fn parse_limit(token: &Token<'_>) -> PResult<LimitOp> {
    let kind = match token.kind {
        TokenKind::KeepHigh => LimitKind::KeepHighest,
        TokenKind::KeepLow => LimitKind::KeepLowest,
        TokenKind::DropHigh => LimitKind::DropHighest,
        _ => LimitKind::DropLowest,
    };
    let amount = match &token.literal[2..] {
        "" => 1,
        digits => digits.parse().map_err(|_| unexpected_token(token))?,
    };
    Ok(LimitOp::new(kind, amount))
}

fn apply_multiplier(roll: &mut Roll, multiplier: Int) {
    match roll {
        Roll::Single(roll) => roll.multiplier = multiplier,
        Roll::Grouped(group) => group.negative = multiplier < 0,
    }
}

/// Records the separator used between group members, rejecting a switch to the other kind.
fn check_separator(
    seen: &mut Option<TokenKind>,
    kind: TokenKind,
    literal: &str,
    span: Span,
) -> PResult<()> {
    match *seen {
        Some(previous) if previous != kind => Err(ParseError::UnexpectedToken {
            literal: literal.to_owned(),
            span,
        }),
        _ => {
            *seen = Some(kind);
            Ok(())
        }
    }
}
