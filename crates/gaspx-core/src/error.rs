//! Error types for the preprocessing pipeline.

/// Failure inside a single pipeline stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Serializing the mutated tree failed.
    #[error("serialize error: {0}")]
    Serialize(#[from] std::io::Error),

    /// Serialized output was not valid UTF-8.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// A placeholder survived reassembly without a stored code block.
    ///
    /// Signals a pipeline bug, not bad input: every placeholder in the
    /// document is minted together with its stored text.
    #[error("no stored code block for placeholder id {id}")]
    UnknownPlaceholder { id: String },
}

/// Error returned by [`process_text`](crate::process_text).
///
/// All stage failures are caught once at the pipeline boundary and wrapped
/// into this single error with the cause chained; no partial output is ever
/// returned.
#[derive(Debug, thiserror::Error)]
#[error("error while preprocessing")]
pub struct PreprocessError(#[from] StageError);

impl PreprocessError {
    /// The stage failure that aborted the pipeline.
    #[must_use]
    pub fn stage(&self) -> &StageError {
        &self.0
    }
}
