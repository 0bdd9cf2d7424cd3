//! Positional paths into a template document.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// One step of a [`DocPath`]: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    /// Sequence index (0-based).
    Index(usize),
    /// Mapping key.
    Key(String),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(k) => write!(f, "{k}"),
            Self::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// Location of a node, as the sequence of segments from the document root.
///
/// Paths are immutable. Extending one returns a new path and leaves the
/// original (and every other path sharing its prefix) untouched.
///
/// ```
/// use stacklint_core::DocPath;
///
/// let resource = DocPath::from_keys(["Resources", "Lb", "Properties"]);
/// let protocol = resource.key("Listeners").index(0).key("Protocol");
/// assert_eq!(protocol.to_string(), "Resources/Lb/Properties/Listeners/0/Protocol");
/// assert_eq!(resource.to_string(), "Resources/Lb/Properties");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocPath {
    segments: Arc<[Segment]>,
}

impl DocPath {
    /// The empty path (document root).
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from mapping keys.
    #[must_use]
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        keys.into_iter().map(|k| Segment::Key(k.into())).collect()
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn join(&self, segment: impl Into<Segment>) -> Self {
        self.segments
            .iter()
            .cloned()
            .chain(std::iter::once(segment.into()))
            .collect()
    }

    /// Returns a new path with the mapping key `key` appended.
    #[must_use]
    pub fn key(&self, key: &str) -> Self {
        self.join(key)
    }

    /// Returns a new path with the sequence index `index` appended.
    #[must_use]
    pub fn index(&self, index: usize) -> Self {
        self.join(index)
    }

    /// The segments, root first.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true for the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the resource name if the path lies under `Resources/<name>`.
    #[must_use]
    pub fn resource_name(&self) -> Option<&str> {
        match self.segments() {
            [Segment::Key(section), Segment::Key(name), ..] if section == "Resources" => {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}

impl Default for DocPath {
    fn default() -> Self {
        Self {
            segments: Arc::from(Vec::new()),
        }
    }
}

impl FromIterator<Segment> for DocPath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl Serialize for DocPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.segments.iter())
    }
}

impl<'de> Deserialize<'de> for DocPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let segments = Vec::<Segment>::deserialize(deserializer)?;
        Ok(segments.into_iter().collect())
    }
}
