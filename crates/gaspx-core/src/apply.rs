//! Directive application over the parsed tree.
//!
//! Each directive resolves its target twice, and the two strategies are not
//! exclusive: an element carrying both the reserved `gasp:id` attribute and a
//! matching native `id` is wrapped by both. The asymmetry between the
//! strategies (all matches vs. first match; foreach wrapping the element vs.
//! wrapping its children) is long-standing observed behavior and is kept
//! exactly, pinned by the tests below.

use kuchikiki::NodeRef;
use tracing::debug;

use crate::code_blocks::{CodeBlocks, comment_text};
use crate::directives::Directive;
use crate::tree;

/// Reserved attribute addressing directive targets; never reaches output.
pub(crate) const RESERVED_ID_ATTR: &str = "gasp:id";

/// Closing marker shared by condition and foreach blocks.
const CLOSE_MARKER: &str = "<% } %>";

/// Mint a marker node: register `code` as a new code block and return a
/// placeholder comment resolving to it. Expressions captured from directive
/// bodies may contain placeholders themselves, so the code is expanded
/// against the store before registration.
fn marker(blocks: &mut CodeBlocks, code: &str) -> NodeRef {
    let expanded = blocks.expand(code);
    let id = blocks.insert(expanded);
    NodeRef::new_comment(comment_text(id))
}

/// Apply every directive to the tree in extraction order, then strip the
/// reserved identifier attribute from all elements.
pub(crate) fn apply_directives(
    document: &NodeRef,
    directives: &[Directive],
    blocks: &mut CodeBlocks,
) {
    for directive in directives {
        match directive {
            Directive::Condition { target, expression } => {
                let open = format!("<% if({expression}){{%>");
                apply_wrapping(document, target, &open, blocks);
            }
            Directive::Foreach {
                target,
                expression,
                binding,
            } => {
                let open = format!("<% foreach( var {binding} in ({expression})){{%>");
                let matched = wrap_reserved_matches(document, target, &open, blocks);

                // Native-id resolution wraps the element's children rather
                // than the element itself, and only for the first match.
                if let Some(node) = tree::element_by_id(document, target) {
                    node.prepend(marker(blocks, &open));
                    node.append(marker(blocks, CLOSE_MARKER));
                } else if !matched {
                    debug!(target_id = target, "foreach target resolved to no element");
                }
            }
        }
    }

    tree::strip_attribute(document, RESERVED_ID_ATTR);
}

/// Condition-style application: wrap each target element with before/after
/// sibling markers, via both resolution strategies.
fn apply_wrapping(document: &NodeRef, target: &str, open: &str, blocks: &mut CodeBlocks) {
    let matched = wrap_reserved_matches(document, target, open, blocks);

    if let Some(node) = tree::element_by_id(document, target) {
        node.insert_before(marker(blocks, open));
        node.insert_after(marker(blocks, CLOSE_MARKER));
    } else if !matched {
        debug!(target_id = target, "condition target resolved to no element");
    }
}

/// Wrap every element whose reserved identifier attribute equals `target`
/// with before/after sibling markers. Returns whether anything matched.
fn wrap_reserved_matches(
    document: &NodeRef,
    target: &str,
    open: &str,
    blocks: &mut CodeBlocks,
) -> bool {
    let nodes = tree::elements_with_attribute(document, RESERVED_ID_ATTR, target);
    for node in &nodes {
        node.insert_before(marker(blocks, open));
        node.insert_after(marker(blocks, CLOSE_MARKER));
    }
    !nodes.is_empty()
}
