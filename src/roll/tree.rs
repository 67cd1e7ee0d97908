use super::{ops, roller::Roller, RResult, RollContext, RollError};
use crate::common::*;
use crate::dice::{DieRoll, DieSpec};
use log::debug;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The outcome of evaluating a [`Roll`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RollResult {
    pub rolls: Vec<DieRoll>,
    pub total: Int,
    pub successes: Int,
}

impl fmt::Display for RollResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, roll) in self.rolls.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", roll)?;
        }
        Ok(())
    }
}

#[enum_dispatch::enum_dispatch]
pub trait Eval {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult>;

    /// Whether this roll counts against its siblings in a combined group.
    fn is_negative(&self) -> bool;
}

/// A parsed roll: either a single run of dice or a braced group of rolls.
#[enum_dispatch::enum_dispatch(Eval)]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Roll {
    Single(SingleRoll),
    Grouped(GroupedRoll),
}

impl Roll {
    /// Evaluates the roll, drawing faces from `roller` without any limit on the number of draws.
    pub fn evaluate<R: Roller>(&self, roller: R) -> RResult<RollResult> {
        RollContext::new_unbounded(roller).eval(self)
    }

    /// The canonical notation for this roll.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SingleRoll {
    pub multiplier: Int,
    pub die: DieSpec,
    pub modifier: Int,
    pub rerolls: Vec<RerollOp>,
    pub exploding: Option<ExplodingOp>,
    pub limit: Option<LimitOp>,
    pub success: Option<ComparisonOp>,
    pub failure: Option<ComparisonOp>,
    pub sort: SortOp,
}

impl SingleRoll {
    pub fn new(multiplier: Int, die: DieSpec) -> Self {
        Self {
            multiplier,
            die,
            modifier: 0,
            rerolls: Vec::new(),
            exploding: None,
            limit: None,
            success: None,
            failure: None,
            sort: SortOp::Unsorted,
        }
    }
}

impl Eval for SingleRoll {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult> {
        let count = self.multiplier.unsigned_abs() as usize;
        if count == 0 {
            return Ok(RollResult::default());
        }

        let mut faces = ctx.roll_many(&self.die, count)?;
        for reroll in &self.rerolls {
            ops::reroll(ctx, &self.die, &mut faces, reroll)?;
        }
        if let Some(exploding) = &self.exploding {
            ops::explode(ctx, &self.die, &mut faces, exploding)?;
        }
        if let Some(limit) = &self.limit {
            ops::limit(&mut faces, limit);
        }
        let successes = ops::tally(
            &faces,
            self.success.as_ref(),
            self.failure.as_ref(),
            self.modifier,
        )?;
        ops::sort(&mut faces, self.sort);

        let total = match successes {
            Some(successes) => successes,
            None => ops::total(&faces, self.modifier, self.multiplier.signum())?,
        };
        let result = RollResult {
            rolls: faces,
            total,
            successes: successes.unwrap_or(0),
        };
        debug!("rolled {} => {:?}", self, result);
        Ok(result)
    }

    fn is_negative(&self) -> bool {
        self.multiplier < 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GroupedRoll {
    pub rolls: NonEmpty<Roll>,
    pub modifier: Int,
    pub limit: Option<LimitOp>,
    pub success: Option<ComparisonOp>,
    pub failure: Option<ComparisonOp>,
    /// Whether member faces are pooled (`+`) rather than reduced to one face per member (`,`).
    pub combined: bool,
    pub negative: bool,
}

impl GroupedRoll {
    pub fn new(rolls: NonEmpty<Roll>) -> Self {
        Self {
            rolls,
            modifier: 0,
            limit: None,
            success: None,
            failure: None,
            combined: true,
            negative: false,
        }
    }
}

impl Eval for GroupedRoll {
    fn eval<R: Roller>(&self, ctx: &mut RollContext<R>) -> RResult<RollResult> {
        let mut faces = Vec::new();
        for roll in self.rolls.iter() {
            let result = roll.eval(ctx)?;
            if !self.combined {
                faces.push(DieRoll::synthetic(result.total));
            } else if roll.is_negative() {
                for face in result.rolls {
                    faces.push(face.negated().ok_or(RollError::Overflow)?);
                }
            } else {
                faces.extend(result.rolls);
            }
        }

        if let Some(limit) = &self.limit {
            ops::limit(&mut faces, limit);
        }
        let successes = ops::tally(
            &faces,
            self.success.as_ref(),
            self.failure.as_ref(),
            self.modifier,
        )?;

        let sign = if self.negative { -1 } else { 1 };
        let total = match successes {
            Some(successes) => successes,
            None => ops::total(&faces, self.modifier, sign)?,
        };
        let result = RollResult {
            rolls: faces,
            total,
            successes: successes.unwrap_or(0),
        };
        debug!("rolled {} => {:?}", self, result);
        Ok(result)
    }

    fn is_negative(&self) -> bool {
        self.negative
    }
}
