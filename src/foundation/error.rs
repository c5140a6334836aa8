/// Convenience result type used across the card renderer.
pub type CardResult<T> = Result<T, CardError>;

/// Top-level error taxonomy for share-card exports.
///
/// Every variant is terminal for the export attempt that produced it. Nothing is retried
/// internally; callers decide whether to offer a retry.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid entry data (empty title, out-of-range rating, malformed JSON).
    #[error("validation error: {0}")]
    Validation(String),

    /// An image could not be fetched or decoded.
    #[error("failed to load image '{url}': {reason}")]
    Load {
        /// URL that was requested.
        url: String,
        /// Human-readable cause (status code, timeout, decode failure).
        reason: String,
    },

    /// Rasterization failed (missing slot image, unusable font data).
    #[error("render error: {0}")]
    Render(String),

    /// The composed surface could not be serialized to PNG.
    #[error("png encode failed: {0}")]
    EncodeFailed(String),

    /// The file sink refused or failed to persist the encoded card.
    #[error("save failed: {0}")]
    Save(String),

    /// Another export is still in flight on the same exporter.
    #[error("an export is already in progress")]
    AlreadyInProgress,

    /// The export was cancelled before a file was saved.
    #[error("export cancelled")]
    Cancelled,

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Load`] value.
    pub fn load(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Load {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`CardError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::EncodeFailed`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::EncodeFailed(msg.into())
    }

    /// Build a [`CardError::Save`] value.
    pub fn save(msg: impl Into<String>) -> Self {
        Self::Save(msg.into())
    }

    /// `true` for asset fetch/decode failures.
    pub fn is_load(&self) -> bool {
        matches!(self, Self::Load { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
