//! Rule presets and lookup by id.

use crate::ElbListenerProtocol;
use stacklint_core::RuleBox;

/// Preset configurations for stacklint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended rules with sensible defaults.
    Recommended,
    /// Every built-in rule.
    All,
}

impl Preset {
    /// Parses a preset name as used in configuration files.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::All => all_rules(),
        }
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `E2503` - ELB listener protocol and certificate consistency
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    vec![Box::new(ElbListenerProtocol::new())]
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![Box::new(ElbListenerProtocol::new())]
}

/// Looks up a built-in rule by id (case-insensitive).
#[must_use]
pub fn rule_by_id(id: &str) -> Option<RuleBox> {
    all_rules()
        .into_iter()
        .find(|rule| rule.id().eq_ignore_ascii_case(id))
}
