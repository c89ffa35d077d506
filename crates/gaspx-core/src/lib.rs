//! Declarative markup preprocessor for GaspX templates.
//!
//! Rewrites the GaspX dialect (`<gasp:condition for="...">`,
//! `<gasp:foreach for="..." key="...">`, embedded `<% %>` code blocks) into
//! plain code-templating output where each directive becomes an imperative
//! control-flow block wrapped around its target element:
//!
//! ```ignore
//! use gaspx_core::process_text;
//!
//! let raw = r#"<gasp:condition for="x">flag</gasp:condition><div gasp:id="x">A</div>"#;
//! let processed = process_text(raw)?;
//! assert!(processed.contains("<% if(flag){%><div>A</div><% } %>"));
//! ```
//!
//! # Pipeline
//!
//! One call to [`process_text`] runs five stages over a single document:
//!
//! 1. extract embedded `<% %>` code blocks, replacing each with a unique
//!    placeholder comment ([`CodeBlocks`]);
//! 2. extract and delete `condition`/`foreach` directive blocks
//!    ([`Directive`]);
//! 3. parse the remaining text with a tag-soup tolerant HTML parser;
//! 4. resolve each directive's target element and inject synthetic
//!    control-flow markers around it;
//! 5. serialize the mutated tree and restore every placeholder to its
//!    original code text.
//!
//! All state is local to one call; documents can be processed in parallel
//! with independent invocations.
//!
//! # Limitations
//!
//! Nested occurrences of the same delimiter pair (`<% ... <% ... %>` or a
//! directive tag inside a directive of the same kind) are out of contract
//! and extract incorrectly. The embedded code-block language is never
//! parsed, only carried through verbatim.

mod apply;
mod code_blocks;
mod directives;
mod error;
mod pipeline;
mod reassemble;
mod tree;

pub use code_blocks::CodeBlocks;
pub use directives::Directive;
pub use error::{PreprocessError, StageError};
pub use pipeline::process_text;
