//! Glue over the tag-soup tolerant HTML DOM (kuchikiki).
//!
//! The parser never rejects input: malformed markup is recovered and
//! unterminated elements are auto-closed, so tree building is infallible and
//! only serialization can fail.

use kuchikiki::NodeRef;
use tendril::TendrilSink;

use crate::error::StageError;

/// Parse directive-free, placeholder-bearing text into a mutable node tree.
pub(crate) fn build_tree(text: &str) -> NodeRef {
    kuchikiki::parse_html().one(text)
}

/// Serialize the document back to text.
pub(crate) fn serialize(document: &NodeRef) -> Result<String, StageError> {
    let mut out = Vec::new();
    document.serialize(&mut out)?;
    Ok(String::from_utf8(out)?)
}

/// Every element carrying the named attribute with the given value, in
/// document order. Collected up front so callers can mutate siblings freely.
pub(crate) fn elements_with_attribute(
    document: &NodeRef,
    name: &str,
    value: &str,
) -> Vec<NodeRef> {
    let mut nodes = Vec::new();
    for node in document.inclusive_descendants() {
        if let Some(element) = node.as_element() {
            if element.attributes.borrow().get(name) == Some(value) {
                nodes.push(node.clone());
            }
        }
    }
    nodes
}

/// First element matched by the document's native `id` lookup.
///
/// An id the selector grammar rejects simply resolves to nothing, which the
/// applier treats as an unresolved target.
pub(crate) fn element_by_id(document: &NodeRef, id: &str) -> Option<NodeRef> {
    let selector = format!("[id=\"{id}\"]");
    document
        .select_first(&selector)
        .ok()
        .map(|found| found.as_node().clone())
}

/// Remove the named attribute from every element in the tree.
pub(crate) fn strip_attribute(document: &NodeRef, name: &str) {
    for node in document.inclusive_descendants() {
        if let Some(element) = node.as_element() {
            element.attributes.borrow_mut().remove(name);
        }
    }
}
