//! Shape validation of a single spec node.
//!
//! Runs at every node the updater reaches. A node is either a container
//! (property keys and registered command keys) or, when the value it applies
//! to is a sequence, a sequence aligned with it by index.

use crate::error::{UpdateError, UpdateResult};
use crate::path::format_path;
use crate::registry::{CommandRegistry, Handler};
use crate::value::{Key, Value};

const ARRAY_SPEC_MESSAGE: &str = "update(): You provided an invalid spec to update(). The spec \
     may not contain an array except as the value of $set, $push, $unshift, $splice or any \
     custom command allowing an array value.";

/// A validated spec node, split into its two kinds of keys.
pub(crate) struct SpecNode<'a> {
    /// Keys to recurse into, in spec order.
    pub properties: Vec<(Key, &'a Value)>,
    /// Registered commands with their arguments, in spec order.
    pub commands: Vec<(&'a str, &'a Handler, &'a Value)>,
}

impl SpecNode<'_> {
    fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.commands.is_empty()
    }
}

fn plain_object_message(registry: &CommandRegistry) -> String {
    let names: Vec<&str> = registry.names().collect();
    format!(
        "update(): You provided an invalid spec to update(). The spec and every included key \
         path must be plain objects containing one of the following commands: {}.",
        names.join(", ")
    )
}

/// Validates `spec` as applied to `current` and splits it into property and
/// command keys.
pub(crate) fn classify<'a>(
    spec: &'a Value,
    current: &Value,
    registry: &'a CommandRegistry,
    path: &[Key],
) -> UpdateResult<SpecNode<'a>> {
    let node = match spec {
        Value::Container(entries) => {
            let mut node = SpecNode {
                properties: Vec::new(),
                commands: Vec::new(),
            };
            for (key, value) in entries.iter() {
                let command = key
                    .as_str()
                    .and_then(|name| registry.get(name).map(|handler| (name, handler)));
                match command {
                    Some((name, handler)) => node.commands.push((name, handler, value)),
                    None => node.properties.push((key.clone(), value)),
                }
            }
            node
        }
        Value::Sequence(items) if current.is_sequence() => SpecNode {
            properties: items
                .iter()
                .enumerate()
                .filter(|(_, item)| !item.is_undefined())
                .map(|(index, item)| (Key::from(index), item))
                .collect(),
            commands: Vec::new(),
        },
        Value::Sequence(_) => {
            return Err(UpdateError::invalid_spec(format_path(path), ARRAY_SPEC_MESSAGE));
        }
        _ => {
            return Err(UpdateError::invalid_spec(
                format_path(path),
                plain_object_message(registry),
            ));
        }
    };

    if node.is_empty() {
        let message = if spec.is_sequence() {
            ARRAY_SPEC_MESSAGE.to_string()
        } else {
            plain_object_message(registry)
        };
        return Err(UpdateError::invalid_spec(format_path(path), message));
    }
    Ok(node)
}
