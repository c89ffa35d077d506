//! Reassembly of serialized output: placeholder comments back to code text.

use crate::code_blocks::{CodeBlocks, PLACEHOLDER_RE, captured_id};
use crate::error::StageError;

/// Replace every placeholder in the serialized document with its stored
/// code-block text.
///
/// A placeholder whose id has no stored text aborts the pipeline: every
/// placeholder is minted together with its entry, so a miss means the store
/// and the document went out of sync.
pub(crate) fn restore_code_blocks(html: &str, blocks: &CodeBlocks) -> Result<String, StageError> {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for caps in PLACEHOLDER_RE.captures_iter(html) {
        let Some(whole) = caps.get(0) else { continue };
        let id = captured_id(&caps);
        let Some(text) = blocks.lookup(id) else {
            return Err(StageError::UnknownPlaceholder { id: id.to_owned() });
        };
        out.push_str(&html[last..whole.start()]);
        out.push_str(text);
        last = whole.end();
    }
    out.push_str(&html[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::code_blocks::placeholder;

    #[test]
    fn restores_raw_placeholders() {
        let mut blocks = CodeBlocks::default();
        let id = blocks.insert("<% a %>".to_owned());
        let html = format!("x{}y", placeholder(id));

        assert_eq!(restore_code_blocks(&html, &blocks).unwrap(), "x<% a %>y");
    }

    #[test]
    fn restores_escaped_placeholders() {
        let mut blocks = CodeBlocks::default();
        let id = blocks.insert("<%= T %>".to_owned());
        let html = format!("<title>&lt;!-- GaspXP[[{id}]] --&gt;</title>");

        assert_eq!(
            restore_code_blocks(&html, &blocks).unwrap(),
            "<title><%= T %></title>"
        );
    }

    #[test]
    fn unknown_id_is_an_error() {
        let blocks = CodeBlocks::default();
        let err = restore_code_blocks(&placeholder(3), &blocks).unwrap_err();

        assert!(matches!(err, StageError::UnknownPlaceholder { id } if id == "3"));
    }

    #[test]
    fn text_without_placeholders_passes_through() {
        let blocks = CodeBlocks::default();
        let html = "<div>plain</div>";

        assert_eq!(restore_code_blocks(html, &blocks).unwrap(), html);
    }
}
