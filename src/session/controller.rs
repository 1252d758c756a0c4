//! Effect runner that owns the session state and the transform client.

use crate::error::{ResumePhotoError, Result};
use crate::image::EncodedImage;
use crate::session::effect::Effect;
use crate::session::event::Event;
use crate::session::state::{AttemptId, SessionState, Snapshot};
use crate::session::transition::transition;
use crate::transform::TransformClient;
use tokio::sync::watch;

/// A transform call the controller has committed to but not yet run.
///
/// Produced by [`SessionController::request_transform`]. Run it with
/// [`PendingTransform::run`] and feed the resulting event back through
/// [`SessionController::handle`]; if the Attempt was replaced in the meantime
/// the result is dropped.
#[derive(Debug, Clone)]
#[must_use = "a pending transform does nothing until it is run"]
pub struct PendingTransform {
    attempt: AttemptId,
    image: EncodedImage,
}

impl PendingTransform {
    /// The Attempt this call belongs to.
    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    /// The image that will be sent.
    pub fn image(&self) -> &EncodedImage {
        &self.image
    }

    /// Performs the single round trip and returns the completion event.
    ///
    /// Errors of every kind become the Attempt's error message here.
    pub async fn run<C: TransformClient + ?Sized>(self, client: &C) -> Event {
        let outcome = client.transform(&self.image).await.map_err(|e| {
            tracing::warn!(attempt = %self.attempt, client = client.name(), "transform failed: {e}");
            e.to_string()
        });
        Event::TransformCompleted {
            attempt: self.attempt,
            outcome,
        }
    }
}

/// Drives the session state machine and runs its effects.
///
/// Every transition publishes a [`Snapshot`] on a watch channel; rendering
/// code subscribes with [`SessionController::subscribe`].
pub struct SessionController<C> {
    client: C,
    state: SessionState,
    publisher: watch::Sender<Snapshot>,
}

impl<C: TransformClient> SessionController<C> {
    /// Creates a controller with an empty session.
    pub fn new(client: C) -> Self {
        let (publisher, _) = watch::channel(Snapshot::empty());
        Self {
            client,
            state: SessionState::new(),
            publisher,
        }
    }

    /// Returns the transform client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Returns the most recently published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.publisher.borrow().clone()
    }

    /// Subscribes to snapshots published after each transition.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.publisher.subscribe()
    }

    /// Applies an event and runs its effects.
    ///
    /// Returns the transform call to perform, if the event issued one.
    pub fn handle(&mut self, event: Event) -> Option<PendingTransform> {
        let state = std::mem::take(&mut self.state);
        let next = transition(state, event);
        self.state = next.state;

        let mut pending = None;
        for effect in next.effects {
            match effect {
                Effect::Publish(snapshot) => {
                    tracing::debug!(status = %snapshot.status, "publishing session snapshot");
                    self.publisher.send_replace(snapshot);
                }
                Effect::CallTransform { attempt, image } => {
                    pending = Some(PendingTransform { attempt, image });
                }
            }
        }
        pending
    }

    /// Starts a new Attempt with `image`, discarding the previous one.
    pub fn upload(&mut self, image: EncodedImage) -> Snapshot {
        tracing::info!(
            media_type = %image.media_type(),
            size_bytes = image.size(),
            "photo uploaded"
        );
        let _ = self.handle(Event::Uploaded(image));
        self.snapshot()
    }

    /// Decodes a data URI (or bare base64) and uploads it.
    pub fn upload_data_uri(&mut self, data_uri: &str) -> Result<Snapshot> {
        let image = EncodedImage::from_data_uri(data_uri)?;
        Ok(self.upload(image))
    }

    /// Clears the session.
    pub fn reset(&mut self) -> Snapshot {
        let _ = self.handle(Event::Reset);
        self.snapshot()
    }

    /// Moves the Attempt to `Processing` and returns the call to make.
    ///
    /// Returns `None`, issuing nothing, unless the Attempt is `Idle` or `Failed`.
    pub fn request_transform(&mut self) -> Option<PendingTransform> {
        self.handle(Event::TransformRequested)
    }

    /// Feeds back the outcome of a call issued for `attempt`.
    pub fn complete(&mut self, attempt: AttemptId, outcome: Result<EncodedImage>) -> Snapshot {
        let outcome = outcome.map_err(|e: ResumePhotoError| e.to_string());
        let _ = self.handle(Event::TransformCompleted { attempt, outcome });
        self.snapshot()
    }

    /// Requests a transform, awaits the client, and applies the result.
    ///
    /// Never fails: errors end up in the snapshot's `error_message`.
    pub async fn transform(&mut self) -> Snapshot {
        if let Some(pending) = self.request_transform() {
            let event = pending.run(&self.client).await;
            let _ = self.handle(event);
        }
        self.snapshot()
    }
}
