//! Template variable substitution.
//!
//! Schema files may embed `${NAME}` markers anywhere in their text.
//! [`substitute`] replaces each marker whose name is present in the
//! variable map and leaves unknown markers untouched.

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Replaces `${NAME}` markers with configured values.
///
/// A single left-to-right pass: replaced values are never re-scanned, so a
/// variable whose value contains `${...}` does not trigger further
/// substitution. Markers with no matching variable pass through verbatim.
/// With an empty variable map the input is returned unchanged without
/// allocating.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use redis_schema_core::substitute;
///
/// let mut vars = BTreeMap::new();
/// vars.insert("ENV".to_string(), "prod".to_string());
///
/// assert_eq!(substitute("SET ${ENV}:flag 1;", &vars), "SET prod:flag 1;");
/// assert_eq!(substitute("SET ${OTHER} 1;", &vars), "SET ${OTHER} 1;");
/// ```
pub fn substitute<'a>(text: &'a str, variables: &BTreeMap<String, String>) -> Cow<'a, str> {
    if variables.is_empty() || !text.contains("${") {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match variables.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated marker: emit the remainder as-is.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}
