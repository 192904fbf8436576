//! PropPath parsing and formatting.
//!
//! Grammar (simple, renderer-agnostic):
//!   scene/.../node.field[.subfield]
//! - '/' separates scene/namespace segments
//! - the last '/'-separated segment holds the node name and optional
//!   '.'-separated field selectors
//!   Examples:
//!   "intro/title.opacity"      -> scenes=["intro"], node="title", fields=["opacity"]
//!   "intro/logo.scale"         -> scenes=["intro"], node="logo",  fields=["scale"]
//!   "badge"                    -> scenes=[],        node="badge", fields=[]
//!
//! PropPath is intentionally string-based; hosts resolve it into whatever
//! render-object slot they maintain.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("empty property path")]
    Empty,
    #[error("invalid property path '{path}': {reason}")]
    Invalid { path: String, reason: String },
}

/// A parsed property path identifying one settable slot on a render object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropPath {
    /// Scene/namespace segments preceding the node (may be empty)
    pub scenes: Vec<String>,
    /// Node name (last segment before field selectors)
    pub node: String,
    /// Ordered field selectors on the node (may be empty)
    pub fields: Vec<String>,
}

impl PropPath {
    /// Construct a PropPath from components.
    pub fn new(scenes: Vec<String>, node: impl Into<String>, fields: Vec<String>) -> Self {
        Self {
            scenes,
            node: node.into(),
            fields,
        }
    }

    /// Parse a path string according to the grammar above.
    pub fn parse(s: &str) -> Result<Self, PathError> {
        if s.is_empty() {
            return Err(PathError::Empty);
        }
        let invalid = |reason: &str| PathError::Invalid {
            path: s.to_string(),
            reason: reason.to_string(),
        };
        let mut parts: Vec<&str> = s.split('/').collect();
        if parts.iter().any(|seg| seg.is_empty()) {
            return Err(invalid("empty namespace segment"));
        }
        let last = parts.pop().ok_or_else(|| invalid("missing node segment"))?;
        let mut last_parts: Vec<&str> = last.split('.').collect();
        let node = last_parts.remove(0);
        if node.is_empty() {
            return Err(invalid("empty node name"));
        }
        if last_parts.iter().any(|f| f.is_empty()) {
            return Err(invalid("empty field selector"));
        }
        if s.chars().any(char::is_whitespace) {
            return Err(invalid("whitespace in path"));
        }
        Ok(Self {
            scenes: parts.into_iter().map(|p| p.to_string()).collect(),
            node: node.to_string(),
            fields: last_parts.into_iter().map(|f| f.to_string()).collect(),
        })
    }
}

impl fmt::Display for PropPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ns in &self.scenes {
            write!(f, "{ns}/")?;
        }
        write!(f, "{}", self.node)?;
        for field in &self.fields {
            write!(f, ".{field}")?;
        }
        Ok(())
    }
}

impl FromStr for PropPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Serialize as the canonical string form; deserialize by parsing.
impl Serialize for PropPath {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PropPath {
    fn deserialize<D>(deserializer: D) -> Result<PropPath, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PropPath::parse(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_scene_node_field() {
        let p = PropPath::parse("intro/title.opacity").unwrap();
        assert_eq!(p.scenes, vec!["intro"]);
        assert_eq!(p.node, "title");
        assert_eq!(p.fields, vec!["opacity"]);
        assert_eq!(p.to_string(), "intro/title.opacity");
    }

    #[test]
    fn parse_bare_node() {
        let p = PropPath::parse("badge").unwrap();
        assert!(p.scenes.is_empty());
        assert_eq!(p.node, "badge");
        assert!(p.fields.is_empty());
    }

    #[test]
    fn rejects_malformed() {
        assert!(PropPath::parse("").is_err());
        assert!(PropPath::parse("intro//title.opacity").is_err());
        assert!(PropPath::parse("intro/title..opacity").is_err());
        assert!(PropPath::parse("intro/ti tle.opacity").is_err());
    }

    #[test]
    fn serde_as_string() {
        let p = PropPath::parse("intro/title.opacity").unwrap();
        let s = serde_json::to_string(&p).unwrap();
        assert_eq!(s, r#""intro/title.opacity""#);
        let back: PropPath = serde_json::from_str(&s).unwrap();
        assert_eq!(back, p);
    }
}
