//! # stacklint-rules
//!
//! Built-in template lint rules for stacklint.
//!
//! ## Available Rules
//!
//! | Id | Name | Description |
//! |----|------|-------------|
//! | E2503 | Resource ELB Properties | Listener protocols are valid and secure listeners have certificates |
//!
//! ## Usage
//!
//! ```ignore
//! use stacklint_core::Analyzer;
//! use stacklint_rules::ElbListenerProtocol;
//!
//! let analyzer = Analyzer::builder()
//!     .path("./templates")
//!     .rule(ElbListenerProtocol::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod elb;
mod presets;

pub use elb::ElbListenerProtocol;
pub use presets::{all_rules, recommended_rules, rule_by_id, Preset};

/// Re-export core types for convenience.
pub use stacklint_core::{Finding, Rule, Severity};
