//! Sequence commands: `$push`, `$unshift`, `$splice`.

use crate::error::{UpdateError, UpdateResult};
use crate::value::Value;
use std::sync::Arc;

pub const PUSH: &str = "$push";
pub const UNSHIFT: &str = "$unshift";
pub const SPLICE: &str = "$splice";

fn expect_target<'a>(command: &str, target: &'a Value) -> UpdateResult<&'a Arc<Vec<Value>>> {
    target.as_sequence().ok_or_else(|| {
        UpdateError::invalid_target(
            command,
            format!("update(): expected target of {command} to be an array; got {target}."),
        )
    })
}

fn expect_items<'a>(command: &str, arg: &'a Value) -> UpdateResult<&'a Arc<Vec<Value>>> {
    arg.as_sequence().ok_or_else(|| {
        UpdateError::invalid_arg(
            command,
            format!(
                "update(): expected spec of {command} to be an array; got {arg}. \
                 Did you forget to wrap your parameter in an array?"
            ),
        )
    })
}

/// `$push`: appends the argument's elements.
pub fn push(arg: &Value, target: &Value) -> UpdateResult<Value> {
    let items = expect_target(PUSH, target)?;
    let extra = expect_items(PUSH, arg)?;
    if extra.is_empty() {
        return Ok(target.clone());
    }
    let mut next = Vec::with_capacity(items.len() + extra.len());
    next.extend(items.iter().cloned());
    next.extend(extra.iter().cloned());
    Ok(Value::from(next))
}

/// `$unshift`: prepends the argument's elements, keeping their order.
pub fn unshift(arg: &Value, target: &Value) -> UpdateResult<Value> {
    let items = expect_target(UNSHIFT, target)?;
    let extra = expect_items(UNSHIFT, arg)?;
    if extra.is_empty() {
        return Ok(target.clone());
    }
    let mut next = Vec::with_capacity(items.len() + extra.len());
    next.extend(extra.iter().cloned());
    next.extend(items.iter().cloned());
    Ok(Value::from(next))
}

fn splice_arg_error(got: &Value) -> UpdateError {
    UpdateError::invalid_arg(
        SPLICE,
        format!(
            "update(): expected spec of $splice to be an array of arrays; got {got}. \
             Did you forget to wrap your parameters in an array?"
        ),
    )
}

/// Integer conversion of a splice position: truncates toward zero, and an
/// absent value or `NaN` counts as zero.
fn splice_number(value: &Value) -> UpdateResult<f64> {
    match value {
        Value::Undefined => Ok(0.0),
        Value::Number(n) if n.is_nan() => Ok(0.0),
        Value::Number(n) => Ok(n.trunc()),
        other => Err(UpdateError::invalid_arg(
            SPLICE,
            format!("update(): expected $splice start and delete count to be numbers; got {other}."),
        )),
    }
}

/// Applies one `[start, deleteCount?, ...items]` group to `items`.
fn splice_in_place(items: &mut Vec<Value>, args: &[Value]) -> UpdateResult<()> {
    let Some((start, rest)) = args.split_first() else {
        return Ok(());
    };
    let len = items.len() as f64;
    let start = splice_number(start)?;
    let start = if start < 0.0 {
        (len + start).max(0.0)
    } else {
        start.min(len)
    };
    let start = start as usize;
    let available = items.len() - start;
    let delete = match rest.first() {
        None => available,
        Some(count) => splice_number(count)?.clamp(0.0, available as f64) as usize,
    };
    let inserted = rest.iter().skip(1).cloned();
    items.splice(start..start + delete, inserted);
    Ok(())
}

/// `$splice`: applies each splice group in order to a copy of the target.
pub fn splice(arg: &Value, target: &Value) -> UpdateResult<Value> {
    let items = target.as_sequence().ok_or_else(|| {
        UpdateError::invalid_target(
            SPLICE,
            format!("update(): Expected $splice target to be an array; got {target}"),
        )
    })?;
    let groups = arg.as_sequence().ok_or_else(|| splice_arg_error(arg))?;
    let groups = groups
        .iter()
        .map(|group| group.as_sequence().ok_or_else(|| splice_arg_error(group)))
        .collect::<UpdateResult<Vec<_>>>()?;
    if groups.is_empty() {
        return Ok(target.clone());
    }

    let mut next = items.as_ref().clone();
    for group in groups {
        splice_in_place(&mut next, group)?;
    }
    Ok(Value::from(next))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nums(values: &[i32]) -> Value {
        Value::array(values.iter().copied())
    }

    fn splice_groups(groups: &[&[i32]]) -> Value {
        Value::array(groups.iter().map(|g| nums(g)))
    }

    #[test]
    fn test_push_appends() {
        let target = nums(&[1]);
        assert_eq!(push(&nums(&[7]), &target).unwrap(), nums(&[1, 7]));
        assert_eq!(target, nums(&[1]));
    }

    #[test]
    fn test_push_empty_keeps_identity() {
        let target = nums(&[1, 2]);
        assert!(push(&nums(&[]), &target).unwrap().same(&target));
    }

    #[test]
    fn test_push_rejects_non_array_arg() {
        let err = push(&Value::from(7), &nums(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "update(): expected spec of $push to be an array; got 7. \
             Did you forget to wrap your parameter in an array?"
        );
        assert!(matches!(err, UpdateError::InvalidCommandArg { .. }));
    }

    #[test]
    fn test_push_checks_target_first() {
        let err = push(&Value::from(7), &Value::from(1)).unwrap_err();
        assert_eq!(err.to_string(), "update(): expected target of $push to be an array; got 1.");
        assert!(matches!(err, UpdateError::InvalidTarget { .. }));
    }

    #[test]
    fn test_unshift_prepends_in_order() {
        let target = nums(&[1]);
        assert_eq!(unshift(&nums(&[7, 8]), &target).unwrap(), nums(&[7, 8, 1]));
    }

    #[test]
    fn test_unshift_errors() {
        let err = unshift(&Value::from(7), &nums(&[])).unwrap_err();
        assert!(err.to_string().starts_with("update(): expected spec of $unshift to be an array; got 7."));
        let err = unshift(&Value::from(7), &Value::from(1)).unwrap_err();
        assert_eq!(err.to_string(), "update(): expected target of $unshift to be an array; got 1.");
    }

    #[test]
    fn test_splice_replaces() {
        let target = nums(&[1, 4, 3]);
        let result = splice(&splice_groups(&[&[1, 1, 2]]), &target).unwrap();
        assert_eq!(result, nums(&[1, 2, 3]));
        assert_eq!(target, nums(&[1, 4, 3]));
    }

    #[test]
    fn test_splice_groups_apply_sequentially() {
        let target = nums(&[1, 2, 3, 4]);
        let result = splice(&splice_groups(&[&[0, 1], &[0, 0, 9]]), &target).unwrap();
        assert_eq!(result, nums(&[9, 2, 3, 4]));
    }

    #[test]
    fn test_splice_negative_start_and_missing_count() {
        let target = nums(&[1, 2, 3, 4]);
        assert_eq!(splice(&splice_groups(&[&[-1]]), &target).unwrap(), nums(&[1, 2, 3]));
        assert_eq!(splice(&splice_groups(&[&[1]]), &target).unwrap(), nums(&[1]));
        assert_eq!(splice(&splice_groups(&[&[-10, 1]]), &target).unwrap(), nums(&[2, 3, 4]));
        assert_eq!(splice(&splice_groups(&[&[10, 1, 5]]), &target).unwrap(), nums(&[1, 2, 3, 4, 5]));
        assert_eq!(splice(&splice_groups(&[&[1, -3]]), &target).unwrap(), nums(&[1, 2, 3, 4]));
        assert_eq!(splice(&splice_groups(&[&[]]), &target).unwrap(), nums(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_splice_rejects_flat_array() {
        let expected = "update(): expected spec of $splice to be an array of arrays; got 1. \
                        Did you forget to wrap your parameters in an array?";
        let err = splice(&Value::from(1), &nums(&[])).unwrap_err();
        assert_eq!(err.to_string(), expected);
        let err = splice(&nums(&[1]), &nums(&[])).unwrap_err();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_splice_target_error() {
        let err = splice(&Value::from(7), &Value::from(1)).unwrap_err();
        assert_eq!(err.to_string(), "update(): Expected $splice target to be an array; got 1");
    }

    #[test]
    fn test_splice_rejects_non_numeric_start() {
        let groups = Value::array([Value::array([Value::from("x")])]);
        let err = splice(&groups, &nums(&[1])).unwrap_err();
        assert!(matches!(err, UpdateError::InvalidCommandArg { .. }));
    }
}
