/// Convenience result type used across emojify.
pub type EmojifyResult<T> = Result<T, EmojifyError>;

/// Top-level error taxonomy used by engine APIs.
///
/// The core raises each variant once and propagates it unmodified; classification into a
/// transport response belongs to the caller.
#[derive(thiserror::Error, Debug)]
pub enum EmojifyError {
    /// Requested font id is absent from the catalog.
    #[error("font not found: {0}")]
    FontNotFound(String),

    /// Text normalizes to nothing.
    #[error("text is empty")]
    EmptyText,

    /// Encoded output is larger than the configured ceiling.
    #[error("output size {size} bytes exceeds limit of {limit} bytes")]
    SizeBudgetExceeded {
        /// Encoded size in bytes.
        size: usize,
        /// Configured ceiling in bytes.
        limit: usize,
    },

    /// Invalid request fields rejected by the boundary adaptor.
    #[error("validation error: {0}")]
    Validation(String),

    /// Unexpected failure inside layout, compositing, synthesis or encoding.
    ///
    /// The display string carries no detail; the wrapped chain is for logs only.
    #[error("internal render failure")]
    Internal(#[source] anyhow::Error),
}

impl From<anyhow::Error> for EmojifyError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl EmojifyError {
    /// Build a [`EmojifyError::FontNotFound`] value.
    pub fn font_not_found(id: impl Into<String>) -> Self {
        Self::FontNotFound(id.into())
    }

    /// Build a [`EmojifyError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`EmojifyError::Internal`] value from a plain message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(anyhow::anyhow!(msg.into()))
    }

    /// Stable machine-readable label for this error.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FontNotFound(_) => "font_not_found",
            Self::EmptyText => "empty_text",
            Self::SizeBudgetExceeded { .. } => "size_budget_exceeded",
            Self::Validation(_) => "validation",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether the failure was caused by the request rather than the engine.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::FontNotFound(_) | Self::EmptyText | Self::Validation(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
