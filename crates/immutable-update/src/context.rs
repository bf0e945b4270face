//! Contexts: a command registry plus the `update`/`extend` operations bound
//! to it, and the process-wide default context behind the free functions.

use crate::error::UpdateResult;
use crate::registry::CommandRegistry;
use crate::updater::Updater;
use crate::value::Value;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// An isolated set of commands.
///
/// Cloning a context (or calling [`Context::new_context`]) branches it: the
/// branches share the registry until one of them is extended, at which point
/// that branch gets its own copy.
#[derive(Clone, Debug)]
pub struct Context {
    registry: Arc<CommandRegistry>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// A context with the built-in commands.
    pub fn new() -> Self {
        Self::with_registry(CommandRegistry::builtin())
    }

    pub fn with_registry(registry: CommandRegistry) -> Self {
        Context {
            registry: Arc::new(registry),
        }
    }

    /// Applies `spec` to `target`, returning the updated value.
    ///
    /// Neither input is modified. Subtrees the spec does not change are
    /// shared with `target`; if nothing changes at all the result is `target`
    /// itself (see [`Value::same`]).
    pub fn update(&self, target: &Value, spec: &Value) -> UpdateResult<Value> {
        Updater::new(&self.registry).run(target, spec)
    }

    /// Registers (or overrides) a command in this context only.
    pub fn extend<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&Value, &Value) -> UpdateResult<Value> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(command = %name, "registering command");
        Arc::make_mut(&mut self.registry).insert(name, Arc::new(handler));
    }

    /// Branches this context, keeping every command it has now.
    pub fn new_context(&self) -> Context {
        tracing::debug!(commands = self.registry.len(), "branching context");
        self.clone()
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Registered command names, in order.
    pub fn commands(&self) -> Vec<&str> {
        self.registry.names().collect()
    }
}

fn default_context() -> &'static RwLock<Context> {
    static DEFAULT: OnceLock<RwLock<Context>> = OnceLock::new();
    DEFAULT.get_or_init(|| RwLock::new(Context::new()))
}

/// Snapshot of the default context. The lock is released before any update
/// runs, so handlers may call back into [`update`] or [`extend`].
fn snapshot() -> Context {
    default_context()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Applies `spec` to `target` with the default context.
pub fn update(target: &Value, spec: &Value) -> UpdateResult<Value> {
    snapshot().update(target, spec)
}

/// Registers a command in the default context.
pub fn extend<F>(name: impl Into<String>, handler: F)
where
    F: Fn(&Value, &Value) -> UpdateResult<Value> + Send + Sync + 'static,
{
    default_context()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .extend(name, handler);
}

/// Branches the default context as it is now.
pub fn new_context() -> Context {
    snapshot().new_context()
}
