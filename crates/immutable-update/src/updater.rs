//! The recursive update engine.
//!
//! One step at a path: validate the spec node, recurse into its property
//! keys, then run its commands on the result. Nodes are copied only when a
//! child actually changed, so every untouched subtree of the result is the
//! target's own allocation.

use crate::error::{UpdateError, UpdateResult};
use crate::path::format_path;
use crate::registry::CommandRegistry;
use crate::spec::{self, SpecNode};
use crate::value::{Container, Key, Value};
use std::sync::Arc;

pub(crate) struct Updater<'r> {
    registry: &'r CommandRegistry,
    path: Vec<Key>,
}

impl<'r> Updater<'r> {
    pub fn new(registry: &'r CommandRegistry) -> Self {
        Updater {
            registry,
            path: Vec::new(),
        }
    }

    pub fn run(&mut self, current: &Value, spec: &Value) -> UpdateResult<Value> {
        let SpecNode {
            properties,
            commands,
        } = spec::classify(spec, current, self.registry, &self.path)?;

        // Properties always go first, so commands on the same node see the
        // updated children.
        let mut next = if properties.is_empty() {
            current.clone()
        } else {
            self.apply_properties(current, &properties)?
        };

        for (name, handler, arg) in commands {
            tracing::trace!(command = name, path = %format_path(&self.path), "applying command");
            next = handler(arg, &next)?;
        }
        Ok(next)
    }

    fn descend(&mut self, key: &Key, current: &Value, spec: &Value) -> UpdateResult<Value> {
        self.path.push(key.clone());
        let result = self.run(current, spec);
        self.path.pop();
        result
    }

    fn apply_properties(&mut self, current: &Value, properties: &[(Key, &Value)]) -> UpdateResult<Value> {
        match current {
            Value::Container(container) => self.update_container(current, container, properties),
            Value::Sequence(items) => self.update_sequence(current, items, properties),
            other => {
                // Children of a leaf read as undefined. Recurse anyway so a
                // malformed spec below is reported as such, then refuse the write.
                for (key, spec) in properties {
                    self.descend(key, &Value::Undefined, spec)?;
                }
                let key = properties.first().map(|(k, _)| k.to_string()).unwrap_or_default();
                Err(UpdateError::InvalidTarget {
                    command: None,
                    message: format!(
                        "update(): cannot update key '{key}' of {} value {other}",
                        other.kind().name()
                    ),
                })
            }
        }
    }

    fn update_container(
        &mut self,
        current: &Value,
        container: &Arc<Container>,
        properties: &[(Key, &Value)],
    ) -> UpdateResult<Value> {
        let mut copy: Option<Container> = None;
        for (key, spec) in properties {
            let original = container.get(key).cloned().unwrap_or_default();
            let child = self.descend(key, &original, spec)?;
            // An absent key that resolves to undefined still becomes an own key.
            if child.same(&original) && (container.has_own(key) || !child.is_undefined()) {
                continue;
            }
            copy.get_or_insert_with(|| {
                tracing::trace!(path = %format_path(&self.path), "copying container");
                container.as_ref().clone()
            })
            .insert(key.clone(), child);
        }
        Ok(copy.map(Value::from).unwrap_or_else(|| current.clone()))
    }

    fn update_sequence(
        &mut self,
        current: &Value,
        items: &Arc<Vec<Value>>,
        properties: &[(Key, &Value)],
    ) -> UpdateResult<Value> {
        let mut copy: Option<Vec<Value>> = None;
        for (key, spec) in properties {
            let index = key.as_index().ok_or_else(|| UpdateError::InvalidTarget {
                command: None,
                message: format!("update(): cannot update key '{key}' of array value {current}"),
            })?;
            let original = items.get(index).cloned().unwrap_or_default();
            let child = self.descend(key, &original, spec)?;
            if child.same(&original) && index < items.len() {
                continue;
            }
            let next = copy.get_or_insert_with(|| {
                tracing::trace!(path = %format_path(&self.path), "copying sequence");
                items.as_ref().clone()
            });
            if index >= next.len() {
                let len = index.checked_add(1).ok_or_else(|| UpdateError::InvalidTarget {
                    command: None,
                    message: format!("update(): cannot update key '{key}' of array value {current}"),
                })?;
                next.resize(len, Value::Undefined);
            }
            next[index] = child;
        }
        Ok(copy.map(Value::from).unwrap_or_else(|| current.clone()))
    }
}
