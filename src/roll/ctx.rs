use super::{error::RollError, roller::Roller, tree::Eval, RResult, Roll, RollResult};
use crate::dice::{DieRoll, DieSpec};
use log::warn;

pub type DefaultRoller = rand::rngs::ThreadRng;

/// Owns the face source for one evaluation and counts the draws made from it.
///
/// With `max_rolls` set, any draw past the budget fails with [`RollError::TooManyRolls`]
/// instead of letting a reroll or explosion that always matches spin forever.
pub struct RollContext<R = DefaultRoller> {
    max_rolls: Option<usize>,
    rolls: usize,
    roller: R,
}

impl<R: Roller> RollContext<R> {
    pub fn new(max_rolls: Option<usize>, roller: R) -> Self {
        Self {
            max_rolls,
            rolls: 0,
            roller,
        }
    }

    pub fn new_bounded(max_rolls: usize, roller: R) -> Self {
        Self::new(Some(max_rolls), roller)
    }

    pub fn new_unbounded(roller: R) -> Self {
        Self::new(None, roller)
    }

    /// Number of faces drawn so far.
    pub fn rolls(&self) -> usize {
        self.rolls
    }

    /// Starts a fresh budget, keeping the roller's state.
    pub fn reset(&mut self) {
        self.rolls = 0;
    }

    pub fn into_roller(self) -> R {
        self.roller
    }

    fn count_rolls(&mut self, n: usize) -> RResult<()> {
        self.rolls = self.rolls.saturating_add(n);
        match self.max_rolls {
            Some(limit) if self.rolls > limit => {
                warn!("roll budget of {} draws exhausted", limit);
                Err(RollError::TooManyRolls { limit })
            }
            _ => Ok(()),
        }
    }

    pub fn roll(&mut self, die: &DieSpec) -> RResult<DieRoll> {
        self.count_rolls(1)?;
        Ok(die.roll(&mut self.roller))
    }

    pub fn roll_many(&mut self, die: &DieSpec, num: usize) -> RResult<Vec<DieRoll>> {
        self.count_rolls(num)?;
        Ok((0..num).map(|_| die.roll(&mut self.roller)).collect())
    }

    pub fn eval(&mut self, roll: &Roll) -> RResult<RollResult> {
        roll.eval(self)
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(Some(1000), rand::thread_rng())
    }
}
