//! Commands that work on any value: `$set`, `$apply`.

use crate::error::{UpdateError, UpdateResult};
use crate::value::Value;

pub const SET: &str = "$set";
pub const APPLY: &str = "$apply";

/// `$set`: replaces the current value wholesale.
pub fn set(arg: &Value, _target: &Value) -> UpdateResult<Value> {
    Ok(arg.clone())
}

/// `$apply`: calls the argument with the current value. Errors raised by the
/// function are returned as they are.
pub fn apply(arg: &Value, target: &Value) -> UpdateResult<Value> {
    let f = arg.as_function().ok_or_else(|| {
        UpdateError::invalid_arg(
            APPLY,
            format!("update(): expected spec of $apply to be a function; got {arg}."),
        )
    })?;
    f(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_any_kind() {
        let target = Value::object([("a", "b")]);
        let replacement = Value::object([("c", "d")]);
        assert!(set(&replacement, &target).unwrap().same(&replacement));
        assert_eq!(set(&Value::from(1), &target).unwrap(), Value::from(1));
    }

    #[test]
    fn test_apply_calls_function() {
        let double = Value::func(|v| {
            let n = v.get("v").and_then(Value::as_f64).unwrap_or_default();
            Ok(Value::object([("v", n * 2.0)]))
        });
        let result = apply(&double, &Value::object([("v", 2)])).unwrap();
        assert_eq!(result, Value::object([("v", 4)]));
    }

    #[test]
    fn test_apply_rejects_non_function() {
        let err = apply(&Value::from(123), &Value::from(2)).unwrap_err();
        assert_eq!(err.to_string(), "update(): expected spec of $apply to be a function; got 123.");
        assert!(matches!(err, UpdateError::InvalidCommandArg { .. }));
    }

    #[test]
    fn test_apply_propagates_errors() {
        let failing = Value::func(|_| Err(UpdateError::handler("nope")));
        assert_eq!(apply(&failing, &Value::Null).unwrap_err(), UpdateError::handler("nope"));
    }
}
