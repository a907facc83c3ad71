use std::fmt;

/// Result alias used across storyframe.
pub type StoryResult<T> = Result<T, StoryError>;

/// Which referenced image failed to decode.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DecodeTarget {
    /// The background raster of a generated asset.
    Background {
        /// Asset identifier.
        asset_id: String,
        /// 1-based slide index within its batch.
        slide_index: u32,
    },
    /// The brand logo.
    Logo,
}

impl fmt::Display for DecodeTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Background {
                asset_id,
                slide_index,
            } => write!(f, "background of asset '{asset_id}' (slide {slide_index})"),
            Self::Logo => f.write_str("brand logo"),
        }
    }
}

/// Top-level error type.
#[derive(thiserror::Error, Debug)]
pub enum StoryError {
    /// A referenced image could not be read or decoded.
    #[error("decode error: {target}: {reason}")]
    Decode {
        /// Asset that failed.
        target: DecodeTarget,
        /// Underlying failure description.
        reason: String,
    },

    /// An input value was outside its domain and could not be clamped.
    #[error("validation error: {0}")]
    Validation(String),

    /// Raster drawing or encoding failed.
    #[error("render error: {0}")]
    Render(String),

    /// The background image provider failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// Asset storage or metadata persistence failed.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// JSON (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Catch-all for IO and third-party errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoryError {
    /// Build a [`StoryError::Decode`].
    pub fn decode(target: DecodeTarget, reason: impl Into<String>) -> Self {
        Self::Decode {
            target,
            reason: reason.into(),
        }
    }

    /// Build a [`StoryError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StoryError::Provider`].
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Build a [`StoryError::Persistence`].
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Build a [`StoryError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return the failing asset when this is a decode error.
    pub fn decode_target(&self) -> Option<&DecodeTarget> {
        match self {
            Self::Decode { target, .. } => Some(target),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
