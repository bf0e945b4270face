use thiserror::Error;

/// Result type alias for update operations.
pub type UpdateResult<T> = Result<T, UpdateError>;

/// Errors raised while interpreting a spec.
///
/// Every error aborts the whole update; the inputs are never touched, so
/// there is nothing to roll back.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpdateError {
    /// A spec node has the wrong shape, or bottoms out without a command.
    #[error("{message}{}", path_suffix(.path))]
    InvalidSpec {
        /// Pointer to the offending node; empty for the root.
        path: String,
        message: String,
    },

    /// A command was given an argument of the wrong shape.
    #[error("{message}")]
    InvalidCommandArg { command: String, message: String },

    /// The value at the current path cannot take the command (or, with no
    /// command, cannot be indexed by a property key).
    #[error("{message}")]
    InvalidTarget {
        command: Option<String>,
        message: String,
    },

    /// Raised by a caller-supplied function or handler.
    #[error("{0}")]
    Handler(String),
}

fn path_suffix(path: &str) -> String {
    if path.is_empty() {
        String::new()
    } else {
        format!(" (at {path})")
    }
}

impl UpdateError {
    #[inline]
    pub fn invalid_spec(path: impl Into<String>, message: impl Into<String>) -> Self {
        UpdateError::InvalidSpec {
            path: path.into(),
            message: message.into(),
        }
    }

    #[inline]
    pub fn invalid_arg(command: &str, message: impl Into<String>) -> Self {
        UpdateError::InvalidCommandArg {
            command: command.to_string(),
            message: message.into(),
        }
    }

    #[inline]
    pub fn invalid_target(command: &str, message: impl Into<String>) -> Self {
        UpdateError::InvalidTarget {
            command: Some(command.to_string()),
            message: message.into(),
        }
    }

    /// Error for user-supplied `$apply` functions and custom commands.
    #[inline]
    pub fn handler(message: impl Into<String>) -> Self {
        UpdateError::Handler(message.into())
    }

    /// The message without the path suffix.
    pub fn message(&self) -> &str {
        match self {
            UpdateError::InvalidSpec { message, .. }
            | UpdateError::InvalidCommandArg { message, .. }
            | UpdateError::InvalidTarget { message, .. }
            | UpdateError::Handler(message) => message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_spec_display_with_path() {
        let err = UpdateError::invalid_spec("/a/b", "bad spec.");
        assert_eq!(err.to_string(), "bad spec. (at /a/b)");
        assert_eq!(err.message(), "bad spec.");
    }

    #[test]
    fn test_invalid_spec_display_at_root() {
        let err = UpdateError::invalid_spec("", "bad spec.");
        assert_eq!(err.to_string(), "bad spec.");
    }

    #[test]
    fn test_command_errors_display_message() {
        let err = UpdateError::invalid_arg("$push", "wrong arg");
        assert_eq!(err.to_string(), "wrong arg");
        let err = UpdateError::invalid_target("$push", "wrong target");
        assert_eq!(err.to_string(), "wrong target");
        assert_eq!(UpdateError::handler("boom").to_string(), "boom");
    }
}
