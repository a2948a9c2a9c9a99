/// Convenience result type used across dreamviz.
pub type DreamResult<T> = Result<T, DreamError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Visual-path degradations (missing images, stale replay indices, out-of-range sliders) are
/// absorbed where they happen and never surface here; this type covers the boundaries that can
/// genuinely fail: configuration, asset IO, archive IO and canvas construction.
#[derive(thiserror::Error, Debug)]
pub enum DreamError {
    /// Invalid user-provided or configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing or compositing layers.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while reading or decoding images and fonts.
    #[error("asset error: {0}")]
    Asset(String),

    /// Errors while reading or writing the scene archive.
    #[error("archive error: {0}")]
    Archive(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DreamError {
    /// Build a [`DreamError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DreamError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`DreamError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`DreamError::Archive`] value.
    pub fn archive(msg: impl Into<String>) -> Self {
        Self::Archive(msg.into())
    }

    /// Build a [`DreamError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for DreamError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
