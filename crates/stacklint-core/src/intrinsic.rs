//! Detection of deferred values (intrinsic function references).
//!
//! A value like `{"Ref": "Param"}` or `{"Fn::GetAtt": ["Lb", "DNSName"]}` is
//! resolved by the deployment engine, not at lint time. Rules must treat such
//! nodes as opaque.

use crate::node::Node;

/// Key of a parameter/resource reference.
pub const REF_MARKER: &str = "Ref";

/// Prefix shared by all intrinsic function keys.
pub const FUNCTION_PREFIX: &str = "Fn::";

/// Returns the intrinsic key if `node` is a deferred reference.
///
/// A deferred reference is a mapping with exactly one entry whose key is
/// [`REF_MARKER`] or starts with [`FUNCTION_PREFIX`].
#[must_use]
pub fn intrinsic_name(node: &Node) -> Option<&str> {
    match node {
        Node::Mapping(m) if m.len() == 1 => m
            .keys()
            .next()
            .filter(|key| *key == REF_MARKER || key.starts_with(FUNCTION_PREFIX)),
        Node::Mapping(_) | Node::Scalar(_) | Node::Sequence(_) => None,
    }
}

/// Returns true if `node` is a deferred reference whose value is unknown
/// until deployment.
#[must_use]
pub fn is_deferred(node: &Node) -> bool {
    intrinsic_name(node).is_some()
}
