//! Utility modules for rule implementations and the analyzer.

pub mod suppression;

#[doc(inline)]
pub use suppression::{SuppressState, Suppressions};
