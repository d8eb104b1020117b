use mw_core::CoreError;

/// Alias for `Result<T, BuildError>`.
pub type BuildResult<T> = Result<T, BuildError>;

/// Fatal build failures.
///
/// Any of these aborts the remaining pipeline for the document. The scene is
/// left partially built and must be discarded by the caller. Recoverable
/// problems are recorded in the [`BuildLog`](crate::diagnostics::BuildLog) instead.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A builder needs ship state but the host supplied none.
    #[error("ship state not found (required by the {builder} builder)")]
    MissingShipState {
        /// Builder that required it.
        builder: &'static str,
    },

    /// Minimap icons need overlay layers but the ship has no minimap.
    #[error("minimap overlay layers not found")]
    MissingMinimap,

    /// The scene graph rejected an operation.
    #[error(transparent)]
    Scene(#[from] CoreError),

    /// The document source could not supply a document.
    #[error("document '{id}' unavailable: {message}")]
    DocumentUnavailable {
        /// Requested document id.
        id: String,
        /// Why the source failed.
        message: String,
    },

    /// A builder-specific failure.
    #[error("{builder} builder failed: {message}")]
    Builder {
        /// Builder that failed.
        builder: &'static str,
        /// What went wrong.
        message: String,
    },
}
