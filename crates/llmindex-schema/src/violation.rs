//! # Schema Violations
//!
//! Structural errors reported by the `jsonschema` crate, converted to the
//! dotted field paths used in every user-facing message:
//! `/endpoints/faq` becomes `endpoints.faq`, `/topics/0` becomes
//! `topics.0`, and the empty pointer becomes `(root)`.

use std::fmt;

use jsonschema::Validator;
use serde_json::Value;

/// One segment of an instance location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathSegment {
    /// An array index.
    Index(usize),
    /// An object key.
    Key(String),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Key(k) => f.write_str(k),
        }
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location of the offending value within the instance.
    pub path: Vec<PathSegment>,
    /// Human-readable description of the violation.
    pub message: String,
}

impl Violation {
    /// The location joined with `.`, or `(root)` for the top level.
    pub fn dotted_path(&self) -> String {
        if self.path.is_empty() {
            return "(root)".to_string();
        }
        self.path.iter().map(ToString::to_string).collect::<Vec<_>>().join(".")
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.dotted_path(), self.message)
    }
}

/// Split an RFC 6901 JSON pointer into segments.
///
/// Purely numeric segments are treated as array indices.
pub fn parse_pointer(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .skip(1)
        .map(|raw| {
            let key = raw.replace("~1", "/").replace("~0", "~");
            match key.parse::<usize>() {
                Ok(i) if !key.is_empty() => PathSegment::Index(i),
                _ => PathSegment::Key(key),
            }
        })
        .collect()
}

/// Run a compiled validator and return every violation, ordered by
/// ascending location. Violations at the same location keep the order the
/// validator reported them in.
pub fn collect_violations(validator: &Validator, instance: &Value) -> Vec<Violation> {
    let mut violations: Vec<Violation> = validator
        .iter_errors(instance)
        .map(|e| Violation {
            path: parse_pointer(&e.instance_path.to_string()),
            message: e.to_string(),
        })
        .collect();
    violations.sort_by(|a, b| a.path.cmp(&b.path));
    violations
}
