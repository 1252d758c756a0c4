//! Session state: the single Attempt and its published snapshot.

use crate::error::Result;
use crate::image::EncodedImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name offered for the downloaded result.
pub const DOWNLOAD_FILE_NAME: &str = "resume_photo_ai.png";

/// Identifies one upload-through-result cycle within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(u64);

impl AttemptId {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AttemptId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where an Attempt is in its lifecycle.
///
/// The result image only exists in `Succeeded` and the error message only
/// in `Failed`, so neither can outlive its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptStatus {
    /// Uploaded, not yet submitted.
    Idle,
    /// Transform call in flight.
    Processing,
    /// The model returned an image.
    Succeeded(EncodedImage),
    /// The transform failed with this message.
    Failed(String),
}

impl AttemptStatus {
    /// Returns the payload-free kind of this status.
    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Idle => StatusKind::Idle,
            Self::Processing => StatusKind::Processing,
            Self::Succeeded(_) => StatusKind::Succeeded,
            Self::Failed(_) => StatusKind::Failed,
        }
    }
}

/// Status as seen by the presentation layer, including the empty state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// No Attempt: initial state or after reset.
    Empty,
    /// See [`AttemptStatus::Idle`].
    Idle,
    /// See [`AttemptStatus::Processing`].
    Processing,
    /// See [`AttemptStatus::Succeeded`].
    Succeeded,
    /// See [`AttemptStatus::Failed`].
    Failed,
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Empty => "empty",
            Self::Idle => "idle",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One upload-through-result cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    id: AttemptId,
    original_image: EncodedImage,
    status: AttemptStatus,
}

impl Attempt {
    pub(crate) fn new(id: AttemptId, original_image: EncodedImage) -> Self {
        Self {
            id,
            original_image,
            status: AttemptStatus::Idle,
        }
    }

    pub(crate) fn with_status(mut self, status: AttemptStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns this Attempt's id.
    pub fn id(&self) -> AttemptId {
        self.id
    }

    /// Returns the uploaded image.
    pub fn original_image(&self) -> &EncodedImage {
        &self.original_image
    }

    /// Returns the current status.
    pub fn status(&self) -> &AttemptStatus {
        &self.status
    }

    /// Returns the generated image, present only when succeeded.
    pub fn result_image(&self) -> Option<&EncodedImage> {
        match &self.status {
            AttemptStatus::Succeeded(image) => Some(image),
            _ => None,
        }
    }

    /// Returns the error message, present only when failed.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            AttemptStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything the controller knows. `attempt == None` is the empty state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    attempt: Option<Attempt>,
    next_attempt_id: u64,
}

impl SessionState {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current Attempt, if any.
    pub fn attempt(&self) -> Option<&Attempt> {
        self.attempt.as_ref()
    }

    /// Returns true when no Attempt exists.
    pub fn is_empty(&self) -> bool {
        self.attempt.is_none()
    }

    /// Returns the status kind, `Empty` when there is no Attempt.
    pub fn status(&self) -> StatusKind {
        self.attempt
            .as_ref()
            .map_or(StatusKind::Empty, |a| a.status.kind())
    }

    /// Builds the snapshot published to the presentation layer.
    pub fn snapshot(&self) -> Snapshot {
        match &self.attempt {
            None => Snapshot::empty(),
            Some(attempt) => Snapshot {
                attempt_id: Some(attempt.id),
                status: attempt.status.kind(),
                original_image: Some(attempt.original_image.clone()),
                result_image: attempt.result_image().cloned(),
                error_message: attempt.error_message().map(str::to_string),
            },
        }
    }

    /// Replaces any existing Attempt with a fresh one for `image`.
    pub(crate) fn start_attempt(self, image: EncodedImage) -> Self {
        let id = AttemptId::new(self.next_attempt_id);
        Self {
            attempt: Some(Attempt::new(id, image)),
            next_attempt_id: self.next_attempt_id + 1,
        }
    }

    pub(crate) fn with_attempt(self, attempt: Option<Attempt>) -> Self {
        Self { attempt, ..self }
    }

    pub(crate) fn take_attempt(self) -> (Option<Attempt>, Self) {
        let attempt = self.attempt;
        (
            attempt,
            Self {
                attempt: None,
                next_attempt_id: self.next_attempt_id,
            },
        )
    }
}

/// Owned view of the session, published after every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current Attempt id; `None` when empty.
    pub attempt_id: Option<AttemptId>,
    /// Current status.
    pub status: StatusKind,
    /// The uploaded image.
    pub original_image: Option<EncodedImage>,
    /// The generated image, only when succeeded.
    pub result_image: Option<EncodedImage>,
    /// The error message, only when failed.
    pub error_message: Option<String>,
}

impl Snapshot {
    /// The empty pre-upload snapshot.
    pub fn empty() -> Self {
        Self {
            attempt_id: None,
            status: StatusKind::Empty,
            original_image: None,
            result_image: None,
            error_message: None,
        }
    }

    /// Returns the downloadable result, if the transform succeeded.
    pub fn download(&self) -> Option<Download> {
        self.result_image.clone().map(|image| Download { image })
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::empty()
    }
}

/// A finished result ready to be handed to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    image: EncodedImage,
}

impl Download {
    /// Suggested file name.
    pub fn file_name(&self) -> &'static str {
        DOWNLOAD_FILE_NAME
    }

    /// The result image.
    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    /// The result as a PNG data URI.
    pub fn data_uri(&self) -> String {
        self.image.to_data_uri()
    }

    /// Writes the result into `dir` under [`DOWNLOAD_FILE_NAME`].
    pub fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(DOWNLOAD_FILE_NAME);
        self.image.save(&path)?;
        Ok(path)
    }
}
