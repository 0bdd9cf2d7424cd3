//! Metadata-based suppression directives.
//!
//! Templates and resources can silence rules through metadata:
//!
//! ```yaml
//! Metadata:
//!   stacklint:
//!     config:
//!       ignore_checks: [E2503]
//! Resources:
//!   Listener:
//!     Type: AWS::ElasticLoadBalancingV2::Listener
//!     Metadata:
//!       stacklint:
//!         config:
//!           ignore_checks:
//!             - E2503
//! ```
//!
//! Template-level entries apply everywhere; resource-level entries apply to
//! findings located under that resource.

use crate::node::Node;
use crate::path::DocPath;
use crate::template::{Template, METADATA};
use std::collections::{HashMap, HashSet};

/// Metadata key owned by stacklint.
pub const METADATA_KEY: &str = "stacklint";

/// Whether a finding is reported or silenced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuppressState {
    /// Report the finding.
    Reported,
    /// Silenced by template-level metadata.
    SuppressedByTemplate,
    /// Silenced by the enclosing resource's metadata.
    SuppressedByResource,
}

impl SuppressState {
    /// Returns true if the finding is silenced.
    #[must_use]
    pub fn is_suppressed(self) -> bool {
        self != Self::Reported
    }
}

/// Rule ids silenced per template and per resource, collected once per
/// template.
#[derive(Debug, Default, Clone)]
pub struct Suppressions {
    template: HashSet<String>,
    resources: HashMap<String, HashSet<String>>,
}

impl Suppressions {
    /// Collects all suppression directives from `template`.
    #[must_use]
    pub fn collect(template: &Template) -> Self {
        let template_level = template
            .root()
            .get(METADATA)
            .map(ignore_checks)
            .unwrap_or_default();

        let resources = template
            .resources()
            .filter_map(|(name, resource)| {
                let ids = resource.get(METADATA).map(ignore_checks)?;
                (!ids.is_empty()).then(|| (name.to_string(), ids))
            })
            .collect();

        Self {
            template: template_level,
            resources,
        }
    }

    /// Returns true if no directive was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.template.is_empty() && self.resources.is_empty()
    }

    /// Decides whether a finding of `rule_id` at `path` is silenced.
    #[must_use]
    pub fn check(&self, rule_id: &str, path: &DocPath) -> SuppressState {
        if self.template.contains(rule_id) {
            return SuppressState::SuppressedByTemplate;
        }
        let by_resource = path
            .resource_name()
            .and_then(|name| self.resources.get(name))
            .is_some_and(|ids| ids.contains(rule_id));
        if by_resource {
            SuppressState::SuppressedByResource
        } else {
            SuppressState::Reported
        }
    }
}

/// Reads `<metadata>.stacklint.config.ignore_checks`, accepting a list or a
/// single string. Anything else yields nothing.
fn ignore_checks(metadata: &Node) -> HashSet<String> {
    let Some(checks) = metadata
        .get(METADATA_KEY)
        .and_then(|m| m.get("config"))
        .and_then(|c| c.get("ignore_checks"))
    else {
        return HashSet::new();
    };

    match checks {
        Node::Sequence(items) => items
            .iter()
            .filter_map(Node::as_str)
            .map(String::from)
            .collect(),
        Node::Scalar(_) => checks.as_str().map(String::from).into_iter().collect(),
        Node::Mapping(_) => HashSet::new(),
    }
}
