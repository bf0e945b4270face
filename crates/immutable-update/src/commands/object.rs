//! Container commands: `$merge`, `$unset`.

use crate::error::{UpdateError, UpdateResult};
use crate::value::{Container, Key, Value};

pub const MERGE: &str = "$merge";
pub const UNSET: &str = "$unset";

/// `$merge`: overlays the argument's own entries on a copy of the target.
///
/// Entries whose key already reads as the same value, own or through the
/// proto, are skipped; if all are, the target itself is returned.
pub fn merge(arg: &Value, target: &Value) -> UpdateResult<Value> {
    let base = target.as_container().ok_or_else(|| {
        UpdateError::invalid_target(
            MERGE,
            format!("update(): $merge expects a target of type 'object'; got {target}"),
        )
    })?;
    let overlay = arg.as_container().ok_or_else(|| {
        UpdateError::invalid_arg(
            MERGE,
            format!("update(): $merge expects a spec of type 'object'; got {arg}"),
        )
    })?;

    let mut next: Option<Container> = None;
    for (key, value) in overlay.iter() {
        let unchanged = match base.get(key) {
            Some(current) => current.same(value),
            None => value.is_undefined(),
        };
        if unchanged {
            continue;
        }
        next.get_or_insert_with(|| base.as_ref().clone())
            .insert(key.clone(), value.clone());
    }
    Ok(next.map(Value::from).unwrap_or_else(|| target.clone()))
}

fn unset_key(value: &Value) -> UpdateResult<Key> {
    match value {
        Value::String(s) => Ok(Key::Str(s.clone())),
        Value::Symbol(sym) => Ok(Key::Symbol(sym.clone())),
        Value::Number(_) => Ok(Key::Str(value.to_string())),
        other => Err(UpdateError::invalid_arg(
            UNSET,
            format!("update(): expected the keys of $unset to be strings or symbols; got {other}."),
        )),
    }
}

/// `$unset`: removes the listed keys the target holds directly.
///
/// Keys only visible through the target's proto are left alone, and a
/// non-container target passes through untouched.
pub fn unset(arg: &Value, target: &Value) -> UpdateResult<Value> {
    let keys = arg.as_sequence().ok_or_else(|| {
        UpdateError::invalid_arg(
            UNSET,
            format!(
                "update(): expected spec of $unset to be an array; got {arg}. \
                 Did you forget to wrap the key(s) in an array?"
            ),
        )
    })?;
    let Some(base) = target.as_container() else {
        return Ok(target.clone());
    };

    let mut next: Option<Container> = None;
    for key in keys.iter() {
        let key = unset_key(key)?;
        if base.has_own(&key) {
            next.get_or_insert_with(|| base.as_ref().clone()).remove(&key);
        }
    }
    Ok(next.map(Value::from).unwrap_or_else(|| target.clone()))
}
