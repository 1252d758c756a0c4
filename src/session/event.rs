//! Events that drive the session state machine.

use crate::image::EncodedImage;
use crate::session::state::AttemptId;

/// Something that happened: a user action or a finished transform call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The user picked a new photo. Discards any existing Attempt.
    Uploaded(EncodedImage),
    /// The user asked for the studio photo.
    TransformRequested,
    /// A transform call for `attempt` finished.
    TransformCompleted {
        /// The Attempt the call was issued for.
        attempt: AttemptId,
        /// The generated image, or the message to show.
        outcome: Result<EncodedImage, String>,
    },
    /// The user cleared the session.
    Reset,
}
