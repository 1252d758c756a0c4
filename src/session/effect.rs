//! Side effects requested by the state machine.

use crate::image::EncodedImage;
use crate::session::state::{AttemptId, Snapshot};

/// Work the effect runner must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Publish the new state to the presentation layer.
    Publish(Snapshot),
    /// Issue exactly one transform call for `attempt`.
    CallTransform {
        /// Attempt the result belongs to.
        attempt: AttemptId,
        /// Image to send.
        image: EncodedImage,
    },
}
