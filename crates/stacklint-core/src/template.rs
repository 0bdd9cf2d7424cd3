//! Template wrapper and property locator.

use crate::node::Node;
use crate::path::DocPath;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level section holding resource declarations.
pub const RESOURCES: &str = "Resources";

/// Resource key holding the resource type identifier.
pub const TYPE: &str = "Type";

/// Resource key holding the property bag.
pub const PROPERTIES: &str = "Properties";

/// Resource key holding free-form metadata.
pub const METADATA: &str = "Metadata";

/// A located property value together with its exact document path.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence<'a> {
    /// Path from the document root to `value`.
    pub path: DocPath,
    /// The located value.
    pub value: &'a Node,
}

/// A loaded template: the document root plus the file it came from.
///
/// Rules only ever receive `&Template`; nothing in the linter mutates it
/// after loading, so one template can be shared by rules on several threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    root: Node,
    filename: Option<PathBuf>,
}

impl Template {
    /// Wraps an in-memory document.
    #[must_use]
    pub fn new(root: Node) -> Self {
        Self {
            root,
            filename: None,
        }
    }

    /// Records the file this template was loaded from.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<PathBuf>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// The document root.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// The source file, if known.
    #[must_use]
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Iterates over `(name, declaration)` for every entry of `Resources`,
    /// in declaration order.
    ///
    /// A missing or non-mapping `Resources` section yields nothing.
    pub fn resources(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.root
            .get(RESOURCES)
            .and_then(Node::as_mapping)
            .into_iter()
            .flat_map(crate::node::Mapping::iter)
    }

    /// Finds every resource whose `Type` is one of `resource_types` and
    /// returns the value at `property_path` inside its `Properties`.
    ///
    /// With an empty `property_path` the whole property bag is returned.
    /// Resources lacking the property, or where an intermediate value is not
    /// a mapping, contribute nothing. Sequences at the target are returned
    /// as-is; callers iterate them. Results follow document order.
    ///
    /// ```
    /// use stacklint_core::{loader, Template};
    ///
    /// let doc = loader::from_json_str(r#"{
    ///   "Resources": {
    ///     "Lb": {
    ///       "Type": "AWS::ElasticLoadBalancing::LoadBalancer",
    ///       "Properties": {"Listeners": [{"Protocol": "HTTP"}]}
    ///     }
    ///   }
    /// }"#).unwrap();
    /// let template = Template::new(doc);
    ///
    /// let found = template.locate(&["AWS::ElasticLoadBalancing::LoadBalancer"], &["Listeners"]);
    /// assert_eq!(found.len(), 1);
    /// assert_eq!(found[0].path.to_string(), "Resources/Lb/Properties/Listeners");
    /// ```
    #[must_use]
    pub fn locate(&self, resource_types: &[&str], property_path: &[&str]) -> Vec<Occurrence<'_>> {
        let mut found = Vec::new();

        for (name, resource) in self.resources() {
            let Some(resource_type) = resource.get(TYPE).and_then(Node::as_str) else {
                debug!("Skipping resource {name}: no string Type");
                continue;
            };
            if !resource_types.contains(&resource_type) {
                continue;
            }
            let Some(properties) = resource.get(PROPERTIES) else {
                continue;
            };

            let mut path = DocPath::from_keys([RESOURCES, name, PROPERTIES]);
            let mut value = properties;
            let mut reached = true;
            for key in property_path {
                match value.get(key) {
                    Some(next) => {
                        path = path.key(key);
                        value = next;
                    }
                    None => {
                        reached = false;
                        break;
                    }
                }
            }

            if reached {
                found.push(Occurrence { path, value });
            }
        }

        found
    }

    /// Resolves a path back to the node it points at.
    #[must_use]
    pub fn node_at(&self, path: &DocPath) -> Option<&Node> {
        use crate::path::Segment;

        path.segments()
            .iter()
            .try_fold(&self.root, |node, segment| match segment {
                Segment::Key(key) => node.get(key),
                Segment::Index(i) => node.as_sequence().and_then(|items| items.get(*i)),
            })
    }
}
