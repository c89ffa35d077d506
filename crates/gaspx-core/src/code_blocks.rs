//! Code-block extraction and placeholder bookkeeping.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// One embedded code block: `<%`, an optional `@`/`=`/`$` sigil, then the
/// shortest body up to the next `%>`. Nested `<%` pairs are out of contract.
static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<%[@=$]?.*?%>").expect("valid regex"));

/// A placeholder comment, raw or entity-escaped. The serializer escapes
/// text in escapable-rawtext positions such as `<title>`, so both forms can
/// appear in serialized output.
pub(crate) static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!-- GaspXP\[\[(\d+)\]\] -->|&lt;!-- GaspXP\[\[(\d+)\]\] --&gt;")
        .expect("valid regex")
});

/// Placeholder text standing in for the code block with the given id.
pub(crate) fn placeholder(id: usize) -> String {
    format!("<!-- GaspXP[[{id}]] -->")
}

/// Comment-node content that serializes to [`placeholder`] output.
pub(crate) fn comment_text(id: usize) -> String {
    format!(" GaspXP[[{id}]] ")
}

/// The id digits captured by [`PLACEHOLDER_RE`], whichever form matched.
pub(crate) fn captured_id<'t>(caps: &Captures<'t>) -> &'t str {
    caps.get(1)
        .or_else(|| caps.get(2))
        .map_or("", |m| m.as_str())
}

/// Store of extracted code-block texts, indexed by dense id.
///
/// Ids are assigned in first-seen order starting at 0 and never reused
/// within a run, so reinsertion is a pure lookup. The store is owned by one
/// pipeline invocation; synthetic control-flow markers minted by the
/// directive applier extend it past the blocks found in the raw text.
#[derive(Debug, Default)]
pub struct CodeBlocks {
    blocks: Vec<String>,
}

impl CodeBlocks {
    /// Store a code-block text and return its id.
    pub(crate) fn insert(&mut self, text: String) -> usize {
        self.blocks.push(text);
        self.blocks.len() - 1
    }

    /// Stored text for an id, if any.
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&str> {
        self.blocks.get(id).map(String::as_str)
    }

    /// Stored text for the raw id digits of a placeholder match.
    pub(crate) fn lookup(&self, id: &str) -> Option<&str> {
        id.parse().ok().and_then(|id: usize| self.get(id))
    }

    /// Number of stored code blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether no code blocks were extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Expand any placeholders in `text` to their stored code text.
    ///
    /// Used when minting marker code from directive expressions, which may
    /// themselves contain placeholders; expanding here keeps reassembly a
    /// single pass. Unknown ids are left in place for reassembly to report.
    pub(crate) fn expand(&self, text: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(text, |caps: &Captures| {
                self.lookup(captured_id(caps))
                    .unwrap_or(&caps[0])
                    .to_owned()
            })
            .into_owned()
    }
}

/// Replace every embedded code block in `raw` with a placeholder comment,
/// storing the verbatim span text under the next dense id.
pub(crate) fn extract_code_blocks(raw: &str, blocks: &mut CodeBlocks) -> String {
    CODE_BLOCK_RE
        .replace_all(raw, |caps: &Captures| {
            let id = blocks.insert(caps[0].to_owned());
            placeholder(id)
        })
        .into_owned()
}
