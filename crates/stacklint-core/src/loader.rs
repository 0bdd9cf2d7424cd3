//! Template loading from JSON and YAML text.
//!
//! YAML short-form intrinsic tags are expanded to their long form so rules
//! only ever see one shape:
//!
//! | YAML            | Loaded as                          |
//! |-----------------|------------------------------------|
//! | `!Ref Name`     | `{"Ref": "Name"}`                  |
//! | `!Condition C`  | `{"Condition": "C"}`               |
//! | `!GetAtt A.B`   | `{"Fn::GetAtt": ["A", "B"]}`       |
//! | `!Sub ...`      | `{"Fn::Sub": ...}` (any other tag) |

use crate::intrinsic::{FUNCTION_PREFIX, REF_MARKER};
use crate::node::{Mapping, Node, Scalar};
use crate::template::Template;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Errors that can occur while loading a template.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// IO error reading the template file.
    #[error("Failed to read template {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// JSON syntax error.
    #[error("Invalid JSON: {message}")]
    Json {
        /// 1-indexed line.
        line: usize,
        /// 1-indexed column.
        column: usize,
        /// Parser message.
        message: String,
    },

    /// YAML syntax error.
    #[error("Invalid YAML: {message}")]
    Yaml {
        /// 1-indexed line, when the parser reports one.
        line: Option<usize>,
        /// 1-indexed column, when the parser reports one.
        column: Option<usize>,
        /// Parser message.
        message: String,
    },

    /// A mapping key that cannot be used as a string (e.g. a YAML sequence key).
    #[error("Unsupported mapping key: {key}")]
    UnsupportedKey {
        /// Debug rendering of the key.
        key: String,
    },
}

impl LoadError {
    /// Line of the error, when known.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Json { line, .. } => Some(*line),
            Self::Yaml { line, .. } => *line,
            Self::Io { .. } | Self::UnsupportedKey { .. } => None,
        }
    }
}

/// Serialization format of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// JSON.
    Json,
    /// YAML (also accepts JSON, which is a YAML subset).
    Yaml,
}

impl Format {
    /// Picks the format from a file extension, falling back to sniffing the
    /// first non-blank character of `content`.
    #[must_use]
    pub fn detect(path: &Path, content: &str) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ if content.trim_start().starts_with('{') => Self::Json,
            _ => Self::Yaml,
        }
    }
}

/// Loads a template file, detecting its format.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> Result<Template, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let format = Format::detect(path, &content);
    debug!("Loading {} as {:?}", path.display(), format);
    let root = load_str(&content, format)?;
    Ok(Template::new(root).with_filename(path))
}

/// Parses template text in the given format.
///
/// # Errors
///
/// Returns an error on syntax errors or unsupported mapping keys.
pub fn load_str(content: &str, format: Format) -> Result<Node, LoadError> {
    match format {
        Format::Json => from_json_str(content),
        Format::Yaml => from_yaml_str(content),
    }
}

/// Parses JSON text into a [`Node`], keeping key order.
///
/// # Errors
///
/// Returns [`LoadError::Json`] on syntax errors.
pub fn from_json_str(content: &str) -> Result<Node, LoadError> {
    let value: serde_json::Value = serde_json::from_str(content).map_err(|e| LoadError::Json {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    })?;
    Ok(from_json_value(value))
}

/// Parses YAML text into a [`Node`], expanding short-form intrinsic tags.
///
/// # Errors
///
/// Returns [`LoadError::Yaml`] on syntax errors and
/// [`LoadError::UnsupportedKey`] for non-scalar mapping keys.
pub fn from_yaml_str(content: &str) -> Result<Node, LoadError> {
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
        let location = e.location();
        LoadError::Yaml {
            line: location.as_ref().map(serde_yaml::Location::line),
            column: location.as_ref().map(serde_yaml::Location::column),
            message: e.to_string(),
        }
    })?;
    from_yaml_value(value)
}

fn from_json_value(value: serde_json::Value) -> Node {
    use serde_json::Value;

    match value {
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
        Value::Number(n) => Node::Scalar(Scalar::Number(n.to_string())),
        Value::String(s) => Node::Scalar(Scalar::String(s)),
        Value::Array(items) => Node::Sequence(items.into_iter().map(from_json_value).collect()),
        Value::Object(map) => Node::Mapping(
            map.into_iter()
                .map(|(k, v)| (k, from_json_value(v)))
                .collect(),
        ),
    }
}

fn from_yaml_value(value: serde_yaml::Value) -> Result<Node, LoadError> {
    use serde_yaml::Value;

    Ok(match value {
        Value::Null => Node::Scalar(Scalar::Null),
        Value::Bool(b) => Node::Scalar(Scalar::Bool(b)),
        Value::Number(n) => Node::Scalar(Scalar::Number(n.to_string())),
        Value::String(s) => Node::Scalar(Scalar::String(s)),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(from_yaml_value)
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut mapping = Mapping::new();
            for (k, v) in map {
                mapping.insert(yaml_key(k)?, from_yaml_value(v)?);
            }
            Node::Mapping(mapping)
        }
        Value::Tagged(tagged) => {
            let tagged = *tagged;
            let tag = tagged.tag.to_string();
            expand_short_form(tag.trim_start_matches('!'), from_yaml_value(tagged.value)?)
        }
    })
}

fn yaml_key(key: serde_yaml::Value) -> Result<String, LoadError> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(LoadError::UnsupportedKey {
            key: format!("{other:?}"),
        }),
    }
}

fn expand_short_form(tag: &str, value: Node) -> Node {
    let (key, value) = match tag {
        REF_MARKER | "Condition" => (tag.to_string(), value),
        "GetAtt" => {
            let value = match value.as_str().and_then(|s| s.split_once('.')) {
                Some((resource, attribute)) => {
                    Node::Sequence(vec![Node::from(resource), Node::from(attribute)])
                }
                None => value,
            };
            (format!("{FUNCTION_PREFIX}GetAtt"), value)
        }
        other => (format!("{FUNCTION_PREFIX}{other}"), value),
    };

    let mut mapping = Mapping::new();
    mapping.insert(key, value);
    Node::Mapping(mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intrinsic::is_deferred;

    #[test]
    fn json_keeps_key_order() {
        let node = from_json_str(r#"{"b": 1, "a": [true, null, "x"]}"#).unwrap();
        let keys: Vec<&str> = node.as_mapping().unwrap().keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(
            node.get("a").and_then(Node::as_sequence).map(<[Node]>::len),
            Some(3)
        );
    }

    #[test]
    fn json_syntax_error_has_position() {
        let err = from_json_str("{\n  \"a\": }").unwrap_err();
        assert!(matches!(err, LoadError::Json { line: 2, .. }));
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn yaml_ref_tag_expands() {
        let node = from_yaml_str("Protocol: !Ref ProtocolParam\n").unwrap();
        let protocol = node.get("Protocol").unwrap();
        assert!(is_deferred(protocol));
        assert_eq!(
            protocol.get("Ref").and_then(Node::as_str),
            Some("ProtocolParam")
        );
    }

    #[test]
    fn yaml_getatt_splits_dotted_form() {
        let node = from_yaml_str("Value: !GetAtt Lb.DNSName\n").unwrap();
        let att = node.get("Value").and_then(|v| v.get("Fn::GetAtt")).unwrap();
        assert_eq!(
            att,
            &Node::Sequence(vec![Node::from("Lb"), Node::from("DNSName")])
        );
    }

    #[test]
    fn yaml_function_tags_get_prefix() {
        let node = from_yaml_str("Value: !Sub '${AWS::Region}-x'\nCond: !Condition IsProd\n")
            .unwrap();
        assert!(node.get("Value").and_then(|v| v.get("Fn::Sub")).is_some());
        let cond = node.get("Cond").unwrap();
        assert!(cond.get("Condition").is_some());
        assert!(!is_deferred(cond));
    }

    #[test]
    fn yaml_rejects_sequence_keys() {
        let err = from_yaml_str("? [a, b]\n: 1\n").unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedKey { .. }));
    }

    #[test]
    fn format_detection() {
        assert_eq!(Format::detect(Path::new("a.json"), ""), Format::Json);
        assert_eq!(Format::detect(Path::new("a.yml"), "{}"), Format::Yaml);
        assert_eq!(Format::detect(Path::new("a.template"), " {\"a\": 1}"), Format::Json);
        assert_eq!(Format::detect(Path::new("a.template"), "a: 1"), Format::Yaml);
    }
}
