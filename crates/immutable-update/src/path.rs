//! Rendering of spec paths for error messages, in JSON Pointer (RFC 6901)
//! form. Symbol keys render as `@@<description>`.

use crate::value::Key;
use std::borrow::Cow;

/// Escapes a pointer component: `~` becomes `~0`, `/` becomes `~1`.
pub(crate) fn escape_component(component: &str) -> Cow<'_, str> {
    if !component.contains('/') && !component.contains('~') {
        return Cow::Borrowed(component);
    }
    // `~` first, or the `~` of `~1` would be escaped again
    Cow::Owned(component.replace('~', "~0").replace('/', "~1"))
}

/// Formats a path; the root is the empty string.
pub(crate) fn format_path(path: &[Key]) -> String {
    let mut out = String::new();
    for key in path {
        out.push('/');
        match key {
            Key::Str(s) => out.push_str(&escape_component(s)),
            Key::Symbol(sym) => {
                out.push_str("@@");
                out.push_str(&escape_component(sym.description()));
            }
        }
    }
    out
}
