//! The individual stages of the roll pipeline.

use super::{roller::Roller, RResult, RollContext, RollError};
use crate::common::*;
use crate::dice::{DieRoll, DieSpec};
use std::collections::HashMap;

pub(crate) fn reroll<R: Roller>(
    ctx: &mut RollContext<R>,
    die: &DieSpec,
    faces: &mut [DieRoll],
    op: &RerollOp,
) -> RResult<()> {
    for face in faces.iter_mut() {
        while op.comparison.matches(face.value) {
            *face = ctx.roll(die)?;
            if op.once {
                break;
            }
        }
    }
    Ok(())
}

pub(crate) fn explode<R: Roller>(
    ctx: &mut RollContext<R>,
    die: &DieSpec,
    faces: &mut Vec<DieRoll>,
    op: &ExplodingOp,
) -> RResult<()> {
    if op.kind == ExplodeKind::Compounded {
        for i in 0..faces.len() {
            if !op.comparison.matches(faces[i].value) {
                continue;
            }
            let mut sum: Int = 0;
            loop {
                let drawn = ctx.roll(die)?;
                sum = checked(sum.checked_add(drawn.value))?;
                if !op.comparison.matches(drawn.value) {
                    break;
                }
            }
            faces.push(DieRoll::synthetic(sum));
        }
        return Ok(());
    }

    // Penetrating faces are stored decremented, but keep chaining on the value as drawn.
    let mut drawn_values: Vec<Int> = faces.iter().map(|face| face.value).collect();
    let mut i = 0;
    while i < drawn_values.len() {
        if op.comparison.matches(drawn_values[i]) {
            let drawn = ctx.roll(die)?;
            drawn_values.push(drawn.value);
            faces.push(match op.kind {
                ExplodeKind::Penetrating => die.face(checked(drawn.value.checked_sub(1))?),
                _ => drawn,
            });
        }
        i += 1;
    }
    Ok(())
}

/// Keeps or drops the highest or lowest faces without reordering the survivors.
///
/// Faces sharing a value are matched by count, earliest first.
pub(crate) fn limit(faces: &mut Vec<DieRoll>, op: &LimitOp) {
    let len = faces.len();
    if op.amount >= len {
        return;
    }

    let mut sorted: Vec<Int> = faces.iter().map(|face| face.value).collect();
    sorted.sort_unstable();
    let selected = match op.kind {
        LimitKind::KeepHighest => &sorted[len - op.amount..],
        LimitKind::KeepLowest => &sorted[..op.amount],
        LimitKind::DropHighest => &sorted[..len - op.amount],
        LimitKind::DropLowest => &sorted[op.amount..],
    };

    let mut counts: HashMap<Int, usize> = HashMap::new();
    for &value in selected {
        *counts.entry(value).or_default() += 1;
    }
    faces.retain(|face| match counts.get_mut(&face.value) {
        Some(count) if *count > 0 => {
            *count -= 1;
            true
        }
        _ => false,
    });
}

/// Counts successes minus failures, or `None` when the roll has neither test.
pub(crate) fn tally(
    faces: &[DieRoll],
    success: Option<&ComparisonOp>,
    failure: Option<&ComparisonOp>,
    modifier: Int,
) -> RResult<Option<Int>> {
    if success.is_none() && failure.is_none() {
        return Ok(None);
    }
    let count = |op: Option<&ComparisonOp>| -> RResult<Int> {
        let Some(op) = op else { return Ok(0) };
        let mut matched: Int = 0;
        for face in faces {
            if op.matches(checked(face.value.checked_add(modifier))?) {
                matched = checked(matched.checked_add(1))?;
            }
        }
        Ok(matched)
    };
    Ok(Some(checked(count(success)?.checked_sub(count(failure)?))?))
}

pub(crate) fn sort(faces: &mut [DieRoll], op: SortOp) {
    match op {
        SortOp::Unsorted => {}
        SortOp::Ascending => faces.sort_by_key(|face| face.value),
        SortOp::Descending => faces.sort_by(|a, b| b.value.cmp(&a.value)),
    }
}

pub(crate) fn sum(faces: &[DieRoll]) -> RResult<Int> {
    faces
        .iter()
        .try_fold(0 as Int, |total, face| checked(total.checked_add(face.value)))
}

/// The total of a roll: its faces plus `modifier`, taken with `sign`.
pub(crate) fn total(faces: &[DieRoll], modifier: Int, sign: Int) -> RResult<Int> {
    checked(sum(faces)?.checked_add(modifier).and_then(|total| total.checked_mul(sign)))
}

pub(crate) fn checked(value: Option<Int>) -> RResult<Int> {
    value.ok_or(RollError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::ScriptedRoller;

    fn d6() -> DieSpec {
        DieSpec::standard(6).unwrap()
    }

    fn faces(values: &[Int]) -> Vec<DieRoll> {
        values.iter().map(|&v| d6().face(v)).collect()
    }

    fn values(faces: &[DieRoll]) -> Vec<Int> {
        faces.iter().map(|face| face.value).collect()
    }

    fn ctx(script: &[UInt]) -> RollContext<ScriptedRoller> {
        RollContext::new_unbounded(ScriptedRoller::new(script.to_vec()))
    }

    #[test]
    fn test_reroll_until_clear() {
        let mut rolled = faces(&[1, 2, 3, 1]);
        let op = RerollOp::new(ComparisonOp::equals(1), false);
        reroll(&mut ctx(&[1, 5, 6]), &d6(), &mut rolled, &op).unwrap();
        assert_eq!(values(&rolled), vec![5, 2, 3, 6]);
    }

    #[test]
    fn test_reroll_once() {
        let mut rolled = faces(&[1, 2, 3, 1]);
        let op = RerollOp::new(ComparisonOp::equals(1), true);
        reroll(&mut ctx(&[1, 5, 6]), &d6(), &mut rolled, &op).unwrap();
        assert_eq!(values(&rolled), vec![1, 2, 3, 5]);
    }

    #[test]
    fn test_explode() {
        let mut rolled = faces(&[6, 2]);
        let op = ExplodingOp::new(ExplodeKind::Exploding, ComparisonOp::equals(6));
        explode(&mut ctx(&[6, 3]), &d6(), &mut rolled, &op).unwrap();
        assert_eq!(values(&rolled), vec![6, 2, 6, 3]);
    }

    #[test]
    fn test_compound() {
        let mut rolled = faces(&[6, 2]);
        let op = ExplodingOp::new(ExplodeKind::Compounded, ComparisonOp::equals(6));
        explode(&mut ctx(&[6, 6, 1]), &d6(), &mut rolled, &op).unwrap();
        assert_eq!(values(&rolled), vec![6, 2, 13]);
        assert_eq!(rolled[2].symbol, "13");
    }

    #[test]
    fn test_penetrate() {
        let mut rolled = faces(&[6, 2]);
        let op = ExplodingOp::new(ExplodeKind::Penetrating, ComparisonOp::equals(6));
        explode(&mut ctx(&[6, 4]), &d6(), &mut rolled, &op).unwrap();
        assert_eq!(values(&rolled), vec![6, 2, 5, 3]);
        assert_eq!(rolled[2].symbol, "5");
    }

    #[test]
    fn test_limit_preserves_order() {
        let check = |kind, amount, expected: &[Int]| {
            let mut rolled = faces(&[3, 1, 4, 1, 5]);
            limit(&mut rolled, &LimitOp::new(kind, amount));
            assert_eq!(values(&rolled), expected);
        };
        check(LimitKind::KeepHighest, 2, &[4, 5]);
        check(LimitKind::KeepLowest, 2, &[1, 1]);
        check(LimitKind::DropHighest, 2, &[3, 1, 1]);
        check(LimitKind::DropLowest, 1, &[3, 1, 4, 5]);
        check(LimitKind::KeepHighest, 0, &[]);
    }

    #[test]
    fn test_limit_past_count_is_noop() {
        for kind in [
            LimitKind::KeepHighest,
            LimitKind::KeepLowest,
            LimitKind::DropHighest,
            LimitKind::DropLowest,
        ] {
            let mut rolled = faces(&[3, 1]);
            limit(&mut rolled, &LimitOp::new(kind, 2));
            assert_eq!(values(&rolled), vec![3, 1]);
        }
    }

    #[test]
    fn test_tally() {
        let rolled = faces(&[1, 4, 6]);
        let success = ComparisonOp::greater_than(3);
        let failure = ComparisonOp::equals(1);
        assert_eq!(tally(&rolled, None, None, 0), Ok(None));
        assert_eq!(tally(&rolled, Some(&success), None, 0), Ok(Some(2)));
        assert_eq!(tally(&rolled, Some(&success), Some(&failure), 0), Ok(Some(1)));
        assert_eq!(tally(&rolled, Some(&success), Some(&failure), 1), Ok(Some(2)));
        assert_eq!(tally(&rolled, None, Some(&failure), 0), Ok(Some(-1)));
        assert_eq!(
            tally(&rolled, Some(&success), None, Int::MAX),
            Err(RollError::Overflow)
        );
    }

    #[test]
    fn test_total_overflow() {
        assert_eq!(total(&faces(&[6, 2]), 4, -1), Ok(-12));
        assert_eq!(total(&faces(&[6]), Int::MAX, 1), Err(RollError::Overflow));
        assert_eq!(sum(&[d6().face(Int::MAX), d6().face(1)]), Err(RollError::Overflow));
        assert_eq!(total(&[d6().face(Int::MIN)], 0, -1), Err(RollError::Overflow));
    }

    #[test]
    fn test_sort() {
        let mut rolled = faces(&[3, 1, 4]);
        sort(&mut rolled, SortOp::Unsorted);
        assert_eq!(values(&rolled), vec![3, 1, 4]);
        sort(&mut rolled, SortOp::Ascending);
        assert_eq!(values(&rolled), vec![1, 3, 4]);
        sort(&mut rolled, SortOp::Descending);
        assert_eq!(values(&rolled), vec![4, 3, 1]);
    }
}
