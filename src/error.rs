//! Typed errors for the editing core.
//!
//! Id-addressed operations on missing elements are deliberately *not* errors:
//! they are no-ops (or `None` results) so that racing UI events degrade
//! gracefully. Errors are reserved for failures the caller must surface to
//! the user, such as a failed symbol lookup or a malformed document.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    /// A library lookup failed; placement is aborted with no partial component.
    #[error("component '{symbol_id}' not found in library '{library_id}'")]
    SymbolNotFound {
        symbol_id: String,
        library_id: String,
    },

    /// The requested library itself is unknown to the symbol source.
    #[error("unknown symbol library '{0}'")]
    UnknownLibrary(String),
}
