//! Rule trait for defining template lint rules.

use crate::template::Template;
use crate::types::{Finding, Severity};

/// A template lint rule.
///
/// A rule carries fixed identity metadata and one evaluation entry point.
/// `check` must be a pure function of the template: no state is kept between
/// calls, and several rules may check the same template concurrently.
///
/// Rules never fail. Malformed or missing data degrades to "no finding" for
/// the affected occurrence, and values that are deferred references (see
/// [`crate::intrinsic::is_deferred`]) are never judged.
///
/// # Example
///
/// ```
/// use stacklint_core::{Finding, Rule, Template};
///
/// pub struct RequireDescription;
///
/// impl Rule for RequireDescription {
///     fn id(&self) -> &'static str { "I9001" }
///     fn short_description(&self) -> &'static str { "Template description" }
///
///     fn check(&self, template: &Template) -> Vec<Finding> {
///         if template.root().get("Description").is_some() {
///             return Vec::new();
///         }
///         vec![Finding::new(Default::default(), "Template has no Description")]
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the rule id (e.g., "E2503"). The first letter selects the
    /// default severity.
    fn id(&self) -> &'static str;

    /// Returns a short, title-like description.
    fn short_description(&self) -> &'static str;

    /// Returns a longer description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns a documentation link for the checked resources, if any.
    fn source_url(&self) -> Option<&'static str> {
        None
    }

    /// Returns tags used to group rules (e.g., `["properties", "elb"]`).
    fn tags(&self) -> &'static [&'static str] {
        &[]
    }

    /// Returns the default severity for violations from this rule.
    fn severity(&self) -> Severity {
        Severity::from_rule_id(self.id())
    }

    /// Checks a template and returns any findings, in document order.
    fn check(&self, template: &Template) -> Vec<Finding>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
