//! # stacklint-core
//!
//! Core framework for linting infrastructure-as-code templates.
//!
//! This crate provides the document model and the rule-evaluation contract:
//!
//! - [`Node`] for the template tree and [`DocPath`] for positions in it
//! - [`intrinsic::is_deferred`] to recognize values only known at deploy time
//! - [`Template::locate`] to find resource properties by type and path
//! - [`Rule`] trait and [`Finding`] for rule output
//! - [`Analyzer`] for loading templates and dispatching rules
//!
//! ## Example
//!
//! ```ignore
//! use stacklint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .path("./templates")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! print!("{}", result.format_report());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod node;
mod path;
mod rule;
mod template;
mod types;

pub mod intrinsic;
pub mod loader;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, PARSE_ERROR_CODE};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use intrinsic::is_deferred;
pub use loader::{Format, LoadError};
pub use node::{Mapping, Node, Scalar};
pub use path::{DocPath, Segment};
pub use rule::{Rule, RuleBox};
pub use template::{Occurrence, Template};
pub use types::{Finding, LintResult, Severity, Violation, ViolationDiagnostic};
