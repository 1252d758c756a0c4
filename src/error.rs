//! Error types for resume photo transformation.

/// Message used when the service fails without telling us why.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to transform image. Please try again later.";

/// Errors that can occur while transforming a photo.
#[derive(Debug, thiserror::Error)]
pub enum ResumePhotoError {
    /// No API credential was configured. Raised before any network call.
    #[error(
        "API key is missing. Set GOOGLE_API_KEY (or API_KEY) or pass a key in TransformConfig."
    )]
    MissingCredential,

    /// The service responded but produced no image part.
    #[error("AI did not return an image. Please try another photo.")]
    NoImageReturned,

    /// Any transport or service-level failure.
    #[error("{0}")]
    TransformationFailed(String),

    /// The supplied image could not be decoded.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// I/O error (e.g., reading the upload or saving the result).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ResumePhotoError {
    /// Returns true if the user can reasonably try the transform again.
    ///
    /// Nothing is retried automatically; this only informs the front end.
    pub fn is_user_retryable(&self) -> bool {
        matches!(self, Self::NoImageReturned | Self::TransformationFailed(_))
    }

    /// Wraps a service message, substituting the generic fallback when empty.
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::TransformationFailed(GENERIC_FAILURE_MESSAGE.to_string())
        } else {
            Self::TransformationFailed(message)
        }
    }
}

impl From<reqwest::Error> for ResumePhotoError {
    fn from(err: reqwest::Error) -> Self {
        Self::failed(err.to_string())
    }
}

/// Result type alias for resume photo operations.
pub type Result<T> = std::result::Result<T, ResumePhotoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_user_retryable() {
        assert!(ResumePhotoError::NoImageReturned.is_user_retryable());
        assert!(ResumePhotoError::TransformationFailed("quota exceeded".into()).is_user_retryable());

        assert!(!ResumePhotoError::MissingCredential.is_user_retryable());
        assert!(!ResumePhotoError::InvalidImage("bad base64".into()).is_user_retryable());
    }

    #[test]
    fn test_failed_uses_fallback_for_empty_message() {
        let err = ResumePhotoError::failed("  ");
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);

        let err = ResumePhotoError::failed("quota exceeded");
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_error_display() {
        assert!(ResumePhotoError::MissingCredential
            .to_string()
            .contains("GOOGLE_API_KEY"));
        assert_eq!(
            ResumePhotoError::NoImageReturned.to_string(),
            "AI did not return an image. Please try another photo."
        );
        assert_eq!(
            ResumePhotoError::InvalidImage("truncated".into()).to_string(),
            "invalid image: truncated"
        );
    }
}
