use crate::common::{NonZeroUInt, UInt};
use rand::Rng;

/// A source of die faces.
///
/// Every call consumes exactly one sample. Evaluation draws in a fixed order, so the same
/// sequence of samples always produces the same result.
pub trait Roller {
    /// Draws a face in `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }
}

/// Replays a fixed list of faces, starting over once the list runs out.
///
/// Faces larger than the die are wrapped into range, and an empty script always rolls 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    faces: Vec<UInt>,
    next: usize,
}

impl ScriptedRoller {
    pub fn new(faces: Vec<UInt>) -> Self {
        Self {
            faces,
            next: 0,
        }
    }
}

impl Roller for ScriptedRoller {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        let face = match self.faces.get(self.next) {
            Some(&face) => face,
            None => return 1,
        };
        self.next = (self.next + 1) % self.faces.len();
        (face.max(1) - 1) % sides.get() + 1
    }
}

#[cfg(test)]
pub(crate) use step::StepRoller;

#[cfg(test)]
mod step {
    use super::*;

    pub(crate) struct StepRoller {
        current: UInt,
        step: UInt,
    }

    impl StepRoller {
        pub fn new(initial: NonZeroUInt, step: UInt) -> Self {
            Self {
                current: initial.get(),
                step,
            }
        }
    }

    impl Roller for StepRoller {
        fn roll(&mut self, sides: NonZeroUInt) -> UInt {
            let ret = (self.current - 1) % sides.get() + 1;
            self.current += self.step;
            ret
        }
    }
}
