//! Document tree types.
//!
//! A template is a tree of [`Node`]s. Every node is exactly one of a scalar,
//! an ordered sequence, or an ordered string-keyed mapping. Mappings keep
//! declaration order so that diagnostics come out in the same order the
//! author wrote the template.

use std::fmt;

/// A scalar leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Explicit null (`null` in JSON, `~` in YAML).
    Null,
    /// Boolean.
    Bool(bool),
    /// Number, kept as its textual form so integers and floats round-trip.
    Number(String),
    /// String.
    String(String),
}

impl Scalar {
    /// Returns the string value if this is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            Self::Null | Self::Bool(_) | Self::Number(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
        }
    }
}

/// An ordered string-keyed mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mapping {
    entries: Vec<(String, Node)>,
}

impl Mapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry, keeping declaration order.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        self.entries.push((key.into(), value));
    }

    /// Returns the value of the first entry with `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterates over keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// A node of a template document.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Scalar leaf.
    Scalar(Scalar),
    /// Ordered sequence.
    Sequence(Vec<Node>),
    /// Ordered mapping.
    Mapping(Mapping),
}

impl Node {
    /// Shorthand for a string scalar.
    #[must_use]
    pub fn string(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(s.into()))
    }

    /// Shorthand for a null scalar.
    #[must_use]
    pub fn null() -> Self {
        Self::Scalar(Scalar::Null)
    }

    /// Returns the mapping if this node is one.
    #[must_use]
    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(m) => Some(m),
            Self::Scalar(_) | Self::Sequence(_) => None,
        }
    }

    /// Returns the items if this node is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Self::Sequence(items) => Some(items),
            Self::Scalar(_) | Self::Mapping(_) => None,
        }
    }

    /// Returns the string value if this node is a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => s.as_str(),
            Self::Sequence(_) | Self::Mapping(_) => None,
        }
    }

    /// Looks up `key` if this node is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_mapping().and_then(|m| m.get(key))
    }

    /// Returns true for values that carry no content: null, `false`, zero,
    /// `""`, `[]` and `{}`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Scalar(Scalar::Null) => true,
            Self::Scalar(Scalar::String(s)) => s.is_empty(),
            Self::Scalar(Scalar::Bool(b)) => !b,
            Self::Scalar(Scalar::Number(n)) => n.parse::<f64>().is_ok_and(|v| v == 0.0),
            Self::Sequence(items) => items.is_empty(),
            Self::Mapping(m) => m.is_empty(),
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::string(s)
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Self::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(m: Mapping) -> Self {
        Self::Mapping(m)
    }
}
