//! Declarative immutable updates of nested data.
//!
//! # Overview
//!
//! [`update`] takes a target value and a spec describing the changes, and
//! returns a new value with those changes applied. The target is never
//! modified; every subtree the spec leaves unchanged is shared with the
//! result by reference, and an update that changes nothing returns the
//! target itself.
//!
//! A spec is a container whose keys are either property keys (recurse into
//! that child) or commands (`$push`, `$unshift`, `$splice`, `$set`,
//! `$unset`, `$merge`, `$apply`, plus any registered with [`extend`]).
//!
//! # Example
//!
//! ```
//! use immutable_update::{update, Value};
//! use serde_json::json;
//!
//! let target = Value::from(json!({"a": [1, 2, 3], "b": {"c": 1}}));
//! let spec = Value::from(json!({"a": {"$push": [4]}}));
//! let result = update(&target, &spec).unwrap();
//!
//! assert_eq!(result.to_json(), json!({"a": [1, 2, 3, 4], "b": {"c": 1}}));
//! // `b` was not touched, so it is shared.
//! assert!(result.get("b").unwrap().same(target.get("b").unwrap()));
//! ```
//!
//! Custom commands live in a [`Context`]:
//!
//! ```
//! use immutable_update::{new_context, Value};
//! use serde_json::json;
//!
//! let mut ctx = new_context();
//! ctx.extend("$addtax", |tax, original| {
//!     let (tax, original) = (tax.as_f64().unwrap_or(0.0), original.as_f64().unwrap_or(0.0));
//!     Ok(Value::from(original + tax * original))
//! });
//! let result = ctx.update(&Value::from(5), &Value::from(json!({"$addtax": 0.1}))).unwrap();
//! assert_eq!(result, Value::from(5.5));
//! ```

pub mod commands;
pub mod context;
pub mod error;
pub mod json;
mod path;
pub mod registry;
mod spec;
mod updater;
pub mod value;

pub use context::{extend, new_context, update, Context};
pub use error::{UpdateError, UpdateResult};
pub use registry::{CommandRegistry, Handler};
pub use value::{Container, Func, Key, Symbol, Value, ValueKind};
