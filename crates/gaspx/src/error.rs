//! CLI error types.

use gaspx_core::PreprocessError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Preprocess(#[from] PreprocessError),

    #[error("unhandled file extension (expected one of: .gasp.aspx, .gasp.ascx, .gasp.master)")]
    UnhandledExtension,
}
