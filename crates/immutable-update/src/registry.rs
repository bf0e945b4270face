//! The ordered command-name → handler map a [`Context`](crate::Context) owns.

use crate::commands;
use crate::error::UpdateResult;
use crate::value::Value;
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A command handler: `(argument, current value) -> new value`.
///
/// The handler sees the whole value at the path where the command appears.
/// Returning the current value unchanged (same reference) keeps the
/// surrounding structure shared.
pub type Handler = Arc<dyn Fn(&Value, &Value) -> UpdateResult<Value> + Send + Sync>;

#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, Handler>,
}

impl CommandRegistry {
    /// An empty registry. Every spec is invalid against it.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in commands.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for def in commands::builtin_commands() {
            registry.insert(def.name, Arc::new(def.handler));
        }
        registry
    }

    /// Registers `name`, replacing any previous handler in place.
    pub fn insert(&mut self, name: impl Into<String>, handler: Handler) -> Option<Handler> {
        self.commands.insert(name.into(), handler)
    }

    pub fn get(&self, name: &str) -> Option<&Handler> {
        self.commands.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let names: Vec<_> = CommandRegistry::builtin().names().map(str::to_string).collect();
        assert_eq!(
            names,
            vec!["$push", "$unshift", "$splice", "$set", "$unset", "$merge", "$apply"]
        );
    }

    #[test]
    fn test_override_keeps_position() {
        let mut registry = CommandRegistry::builtin();
        let previous = registry.insert(
            "$set",
            Arc::new(|_: &Value, _: &Value| -> UpdateResult<Value> { Ok(Value::Null) }),
        );
        assert!(previous.is_some());
        assert_eq!(registry.names().nth(3), Some("$set"));
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_empty_registry() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert!(!registry.contains("$set"));
        assert!(registry.get("$set").is_none());
    }
}
