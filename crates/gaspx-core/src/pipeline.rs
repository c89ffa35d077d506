//! Pipeline orchestration: raw template text in, processed text out.

use tracing::debug;

use crate::apply::apply_directives;
use crate::code_blocks::{CodeBlocks, extract_code_blocks};
use crate::directives::extract_directives;
use crate::error::{PreprocessError, StageError};
use crate::reassemble::restore_code_blocks;
use crate::tree;

/// Preprocess a raw GaspX template document.
///
/// Runs the five pipeline stages in sequence and returns the fully processed
/// text. Any stage failure is wrapped once into [`PreprocessError`] with the
/// cause chained; no partial output is returned.
///
/// Each call is independent and carries its own state, so documents can be
/// processed concurrently from separate invocations.
pub fn process_text(raw: &str) -> Result<String, PreprocessError> {
    run(raw).map_err(PreprocessError::from)
}

fn run(raw: &str) -> Result<String, StageError> {
    let mut blocks = CodeBlocks::default();
    let stripped = extract_code_blocks(raw, &mut blocks);
    let (cleaned, directives) = extract_directives(&stripped);
    debug!(
        code_blocks = blocks.len(),
        directives = directives.len(),
        "extraction complete"
    );

    let document = tree::build_tree(&cleaned);
    apply_directives(&document, &directives, &mut blocks);

    let serialized = tree::serialize(&document)?;
    restore_code_blocks(&serialized, &blocks)
}
