//! Node paths and path patterns.
//!
//! A [`Path`] addresses a node relative to the comparison root, always on the
//! expectation side. A [`PathPattern`] is the configuration-side counterpart
//! used by exclusion, inclusion, and ordering rules.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::errors::{EquivError, Result};

/// Rendered name of the root node
pub const ROOT_NAME: &str = "subject";
/// Prefix used when a path starts with an index
pub const ITEM_NAME: &str = "item";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Member(String),
    Index(usize),
    /// Dictionary key, already rendered
    Key(String),
}

/// Address of a node relative to the root
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn child_member(&self, name: &str) -> Path {
        self.child(PathSegment::Member(name.to_string()))
    }

    pub fn child_index(&self, index: usize) -> Path {
        self.child(PathSegment::Index(index))
    }

    pub fn child_key(&self, key: impl Into<String>) -> Path {
        self.child(PathSegment::Key(key.into()))
    }

    fn child(&self, segment: PathSegment) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.segments.first() {
            None => return f.write_str(ROOT_NAME),
            Some(PathSegment::Index(_)) | Some(PathSegment::Key(_)) => f.write_str(ITEM_NAME)?,
            Some(PathSegment::Member(_)) => {}
        }
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Member(name) if i == 0 => f.write_str(name)?,
                PathSegment::Member(name) => write!(f, ".{}", name)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
                PathSegment::Key(key) => write!(f, "[{}]", key)?,
            }
        }
        Ok(())
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternSegment {
    Member(String),
    /// Literal index or key, compared against the rendered segment
    Bracket(String),
    AnyIndex,
}

impl PatternSegment {
    fn matches(&self, segment: &PathSegment) -> bool {
        match (self, segment) {
            (PatternSegment::Member(p), PathSegment::Member(s)) => p == s,
            (PatternSegment::Bracket(p), PathSegment::Index(i)) => *p == i.to_string(),
            (PatternSegment::Bracket(p), PathSegment::Key(k)) => p == k,
            (PatternSegment::AnyIndex, PathSegment::Index(_) | PathSegment::Key(_)) => true,
            _ => false,
        }
    }
}

/// A path with optional `[*]` wildcards, e.g. `Customers[*].Address.City`
///
/// Patterns are relative to the root. A leading `subject` or a leading `item`
/// directly before a bracket is accepted and ignored, so a path copied from a
/// failure message can be pasted back into a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<PatternSegment>,
}

impl PathPattern {
    /// Parse a pattern.
    ///
    /// # Errors
    ///
    /// `InvalidPathPattern` for an empty pattern, an empty member name
    /// (`a..b`, trailing `.`), or an unterminated `[`.
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |reason: &str| EquivError::InvalidPathPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(invalid("pattern is empty"));
        }

        let mut rest = trimmed;
        if let Some(tail) = rest.strip_prefix(ROOT_NAME) {
            if tail.is_empty() || tail.starts_with('.') || tail.starts_with('[') {
                rest = tail.strip_prefix('.').unwrap_or(tail);
            }
        } else if let Some(tail) = rest.strip_prefix(ITEM_NAME) {
            if tail.starts_with('[') {
                rest = tail;
            }
        }

        let mut segments = Vec::new();
        let mut chars = rest.char_indices().peekable();
        let mut member = String::new();
        let mut expect_member = !rest.starts_with('[');

        while let Some((pos, c)) = chars.next() {
            match c {
                '.' => {
                    if expect_member && member.is_empty() {
                        return Err(invalid("empty member name"));
                    }
                    if !member.is_empty() {
                        segments.push(PatternSegment::Member(std::mem::take(&mut member)));
                    }
                    expect_member = true;
                }
                '[' => {
                    if !member.is_empty() {
                        segments.push(PatternSegment::Member(std::mem::take(&mut member)));
                    } else if expect_member && pos != 0 {
                        return Err(invalid("empty member name"));
                    }
                    let close = rest[pos..]
                        .find(']')
                        .ok_or_else(|| invalid("unterminated '['"))?;
                    let inner = rest[pos + 1..pos + close].trim();
                    segments.push(match inner {
                        "" | "*" => PatternSegment::AnyIndex,
                        literal => PatternSegment::Bracket(literal.to_string()),
                    });
                    // Skip to just past the closing bracket
                    while let Some((p, _)) = chars.peek() {
                        if *p <= pos + close {
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    expect_member = false;
                }
                ']' => return Err(invalid("unexpected ']'")),
                c => {
                    if !expect_member && member.is_empty() {
                        return Err(invalid("member name must follow '.'"));
                    }
                    member.push(c);
                }
            }
        }

        if !member.is_empty() {
            segments.push(PatternSegment::Member(member));
        } else if expect_member && !segments.is_empty() {
            return Err(invalid("trailing '.'"));
        }

        Ok(Self {
            source: trimmed.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The pattern addresses exactly this path
    pub fn matches(&self, path: &Path) -> bool {
        self.segments.len() == path.depth() && self.matches_leading(path.segments())
    }

    /// The path is this pattern's node or lies below it
    pub fn covers(&self, path: &Path) -> bool {
        self.segments.len() <= path.depth() && self.matches_leading(path.segments())
    }

    /// The path is a strict ancestor of a node this pattern addresses
    pub fn leads_to(&self, path: &Path) -> bool {
        path.depth() < self.segments.len()
            && self
                .segments
                .iter()
                .zip(path.segments())
                .all(|(p, s)| p.matches(s))
    }

    fn matches_leading(&self, segments: &[PathSegment]) -> bool {
        self.segments
            .iter()
            .zip(segments)
            .all(|(p, s)| p.matches(s))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
