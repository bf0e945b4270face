//! Built-in command definitions.

pub mod array;
pub mod object;
pub mod value;

use crate::error::UpdateResult;
use crate::value::Value;

pub type CommandFn = fn(&Value, &Value) -> UpdateResult<Value>;

/// A built-in command: its name and handler.
pub struct CommandDefinition {
    pub name: &'static str,
    pub handler: CommandFn,
}

/// All built-in commands, in registration order. The order is observable:
/// invalid-spec messages list command names in it.
pub fn builtin_commands() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition { name: array::PUSH, handler: array::push },
        CommandDefinition { name: array::UNSHIFT, handler: array::unshift },
        CommandDefinition { name: array::SPLICE, handler: array::splice },
        CommandDefinition { name: value::SET, handler: value::set },
        CommandDefinition { name: object::UNSET, handler: object::unset },
        CommandDefinition { name: object::MERGE, handler: object::merge },
        CommandDefinition { name: value::APPLY, handler: value::apply },
    ]
}
