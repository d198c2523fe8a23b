//! Compact, cycle-safe value rendering for failure messages.

use std::fmt;

use crate::model::{ObjectRef, PayloadShape, Value};

/// Nesting depth beyond which object contents are elided
pub const MAX_RENDER_DEPTH: usize = 3;

/// Renders values for messages, eliding deep nesting and long output
#[derive(Debug, Clone, Copy)]
pub struct ValueRenderer {
    max_chars: usize,
}

impl ValueRenderer {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Render a value, truncated to the configured length with `...`
    pub fn render(&self, value: &Value) -> String {
        self.truncate(Rendered(value).to_string())
    }

    /// Render a dictionary key as it appears inside a path: strings unquoted
    pub fn render_key(&self, key: &Value) -> String {
        match key {
            Value::Str(s) => self.truncate(s.clone()),
            other => self.render(other),
        }
    }

    fn truncate(&self, rendered: String) -> String {
        match rendered.char_indices().nth(self.max_chars) {
            Some((cut, _)) => format!("{}...", &rendered[..cut]),
            None => rendered,
        }
    }
}

/// `Display` adapter over a value; cycle-safe and depth-capped
struct Rendered<'a>(&'a Value);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_into(self.0, 0, &mut Vec::new(), f)
    }
}

fn render_into(
    value: &Value,
    depth: usize,
    ancestors: &mut Vec<usize>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match value {
        Value::Null => f.write_str("<null>"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Int(i) => write!(f, "{}", i),
        Value::UInt(u) => write!(f, "{}", u),
        Value::Float(x) => write!(f, "{}", x),
        Value::Str(s) => write!(f, "\"{}\"", s),
        Value::Bytes(bytes) => {
            f.write_str("{")?;
            for (i, b) in bytes.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", b)?;
            }
            f.write_str("}")
        }
        Value::Ref(object) => {
            if ancestors.contains(&object.identity()) {
                return write!(f, "{{cyclic reference to {}}}", object.type_name());
            }
            if depth >= MAX_RENDER_DEPTH {
                return match object.shape() {
                    PayloadShape::Members => write!(f, "{} {{ ... }}", object.type_name()),
                    _ => f.write_str("{...}"),
                };
            }

            ancestors.push(object.identity());
            let result = render_payload(object, depth, ancestors, f);
            ancestors.pop();
            result
        }
    }
}

fn render_payload(
    object: &ObjectRef,
    depth: usize,
    ancestors: &mut Vec<usize>,
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    if let Some(slots) = object.members() {
        write!(f, "{} {{", object.type_name())?;
        for (i, (name, slot)) in slots.iter().enumerate() {
            f.write_str(if i == 0 { " " } else { ", " })?;
            write!(f, "{} = ", name)?;
            render_into(slot, depth + 1, ancestors, f)?;
        }
        f.write_str(" }")
    } else if let Some(items) = object.items() {
        f.write_str("{")?;
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            render_into(item, depth + 1, ancestors, f)?;
        }
        f.write_str("}")
    } else if let Some(entries) = object.entries() {
        f.write_str("{")?;
        for (i, (key, entry)) in entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str("[")?;
            render_into(key, depth + 1, ancestors, f)?;
            f.write_str("] = ")?;
            render_into(entry, depth + 1, ancestors, f)?;
        }
        f.write_str("}")
    } else {
        Ok(())
    }
}
