//! Pure state transitions: `(state, event) -> (state, effects)`.

use crate::session::effect::Effect;
use crate::session::event::Event;
use crate::session::state::{AttemptStatus, SessionState, StatusKind};

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the event.
    pub state: SessionState,
    /// Effects to run, in order. Empty when the event was ignored.
    pub effects: Vec<Effect>,
}

impl Transition {
    fn ignored(state: SessionState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn publish(state: SessionState) -> Self {
        let snapshot = state.snapshot();
        Self {
            state,
            effects: vec![Effect::Publish(snapshot)],
        }
    }

    /// Returns true if the event changed nothing.
    pub fn is_ignored(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Applies `event` to `state`.
///
/// Transform requests are only honoured from `Idle` or `Failed`; a request
/// while `Processing` is dropped rather than queued. Completions are only
/// applied to the Attempt they were issued for, and only while it is
/// `Processing`.
pub fn transition(state: SessionState, event: Event) -> Transition {
    match event {
        Event::Uploaded(image) => Transition::publish(state.start_attempt(image)),

        Event::Reset => {
            let (_, state) = state.take_attempt();
            Transition::publish(state)
        }

        Event::TransformRequested => {
            let (attempt, state) = state.take_attempt();
            let Some(attempt) = attempt else {
                tracing::debug!("transform requested with no photo uploaded; ignoring");
                return Transition::ignored(state);
            };

            match attempt.status().kind() {
                StatusKind::Idle | StatusKind::Failed => {
                    let effect = Effect::CallTransform {
                        attempt: attempt.id(),
                        image: attempt.original_image().clone(),
                    };
                    let state =
                        state.with_attempt(Some(attempt.with_status(AttemptStatus::Processing)));
                    let mut transition = Transition::publish(state);
                    transition.effects.push(effect);
                    transition
                }
                status => {
                    tracing::debug!(
                        attempt = %attempt.id(),
                        %status,
                        "transform already issued; ignoring request"
                    );
                    Transition::ignored(state.with_attempt(Some(attempt)))
                }
            }
        }

        Event::TransformCompleted {
            attempt: completed,
            outcome,
        } => {
            let (attempt, state) = state.take_attempt();
            match attempt {
                Some(current)
                    if current.id() == completed
                        && matches!(current.status(), AttemptStatus::Processing) =>
                {
                    let status = match outcome {
                        Ok(image) => AttemptStatus::Succeeded(image),
                        Err(message) => AttemptStatus::Failed(message),
                    };
                    Transition::publish(state.with_attempt(Some(current.with_status(status))))
                }
                current => {
                    tracing::debug!(attempt = %completed, "discarding stale transform result");
                    Transition::ignored(state.with_attempt(current))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::EncodedImage;
    use crate::session::state::AttemptId;

    fn photo() -> EncodedImage {
        EncodedImage::new("image/jpeg", b"photo.jpg".to_vec())
    }

    fn png(bytes: &[u8]) -> EncodedImage {
        EncodedImage::new("image/png", bytes.to_vec())
    }

    fn apply(state: SessionState, events: impl IntoIterator<Item = Event>) -> SessionState {
        events
            .into_iter()
            .fold(state, |state, event| transition(state, event).state)
    }

    fn current_id(state: &SessionState) -> AttemptId {
        state.attempt().unwrap().id()
    }

    fn call_count(t: &Transition) -> usize {
        t.effects
            .iter()
            .filter(|e| matches!(e, Effect::CallTransform { .. }))
            .count()
    }

    fn idle() -> SessionState {
        apply(SessionState::new(), [Event::Uploaded(photo())])
    }

    fn processing() -> SessionState {
        apply(idle(), [Event::TransformRequested])
    }

    fn completed(outcome: Result<EncodedImage, String>) -> SessionState {
        let state = processing();
        let attempt = current_id(&state);
        apply(state, [Event::TransformCompleted { attempt, outcome }])
    }

    #[test]
    fn test_upload_creates_idle_attempt() {
        let t = transition(SessionState::new(), Event::Uploaded(photo()));
        let attempt = t.state.attempt().unwrap();

        assert_eq!(t.state.status(), StatusKind::Idle);
        assert_eq!(attempt.original_image(), &photo());
        assert!(attempt.result_image().is_none());
        assert_eq!(t.effects, vec![Effect::Publish(t.state.snapshot())]);
    }

    #[test]
    fn test_transform_from_idle_issues_one_call() {
        let state = idle();
        let id = current_id(&state);
        let t = transition(state, Event::TransformRequested);

        assert_eq!(t.state.status(), StatusKind::Processing);
        assert_eq!(call_count(&t), 1);
        assert!(t.effects.contains(&Effect::CallTransform {
            attempt: id,
            image: photo()
        }));
        assert!(matches!(t.effects[0], Effect::Publish(ref s) if s.status == StatusKind::Processing));
    }

    #[test]
    fn test_transform_while_processing_is_ignored() {
        let state = processing();
        let t = transition(state.clone(), Event::TransformRequested);

        assert!(t.is_ignored());
        assert_eq!(call_count(&t), 0);
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_transform_ignored_when_empty_or_succeeded() {
        let t = transition(SessionState::new(), Event::TransformRequested);
        assert!(t.is_ignored());
        assert!(t.state.is_empty());

        let t = transition(completed(Ok(png(b"X"))), Event::TransformRequested);
        assert!(t.is_ignored());
        assert_eq!(t.state.status(), StatusKind::Succeeded);
    }

    #[test]
    fn test_success_sets_result() {
        let state = completed(Ok(png(b"X")));
        let snapshot = state.snapshot();

        assert_eq!(snapshot.status, StatusKind::Succeeded);
        assert_eq!(
            snapshot.result_image.unwrap().to_data_uri(),
            "data:image/png;base64,WA=="
        );
        assert!(snapshot.error_message.is_none());
    }

    #[test]
    fn test_failure_sets_message() {
        let state = completed(Err("quota exceeded".into()));
        let attempt = state.attempt().unwrap();

        assert_eq!(state.status(), StatusKind::Failed);
        assert_eq!(attempt.error_message(), Some("quota exceeded"));
        assert!(attempt.result_image().is_none());
    }

    #[test]
    fn test_retry_from_failed() {
        let state = completed(Err("quota exceeded".into()));
        let t = transition(state, Event::TransformRequested);

        assert_eq!(t.state.status(), StatusKind::Processing);
        assert_eq!(call_count(&t), 1);
        assert!(t.state.attempt().unwrap().error_message().is_none());
    }

    #[test]
    fn test_stale_completion_after_new_upload_is_discarded() {
        let state = processing();
        let stale = current_id(&state);
        let state = apply(state, [Event::Uploaded(png(b"second"))]);

        let t = transition(
            state.clone(),
            Event::TransformCompleted {
                attempt: stale,
                outcome: Ok(png(b"late")),
            },
        );

        assert!(t.is_ignored());
        assert_eq!(t.state, state);
        assert_eq!(t.state.status(), StatusKind::Idle);
        assert_eq!(t.state.attempt().unwrap().original_image(), &png(b"second"));
    }

    #[test]
    fn test_stale_completion_after_reupload_and_new_transform() {
        let state = processing();
        let stale = current_id(&state);
        let state = apply(
            state,
            [Event::Uploaded(png(b"second")), Event::TransformRequested],
        );

        let t = transition(
            state,
            Event::TransformCompleted {
                attempt: stale,
                outcome: Err("too late".into()),
            },
        );

        assert!(t.is_ignored());
        assert_eq!(t.state.status(), StatusKind::Processing);
    }

    #[test]
    fn test_completion_after_reset_is_discarded() {
        let state = processing();
        let stale = current_id(&state);
        let state = apply(state, [Event::Reset]);

        let t = transition(
            state,
            Event::TransformCompleted {
                attempt: stale,
                outcome: Ok(png(b"late")),
            },
        );

        assert!(t.is_ignored());
        assert!(t.state.is_empty());
    }

    #[test]
    fn test_duplicate_completion_is_discarded() {
        let state = processing();
        let id = current_id(&state);
        let state = apply(
            state,
            [Event::TransformCompleted {
                attempt: id,
                outcome: Ok(png(b"first")),
            }],
        );

        let t = transition(
            state,
            Event::TransformCompleted {
                attempt: id,
                outcome: Err("second".into()),
            },
        );

        assert!(t.is_ignored());
        assert_eq!(t.state.attempt().unwrap().result_image(), Some(&png(b"first")));
    }

    #[test]
    fn test_reset_from_every_state() {
        let states = [
            SessionState::new(),
            idle(),
            processing(),
            completed(Ok(png(b"X"))),
            completed(Err("boom".into())),
        ];

        for state in states {
            let t = transition(state, Event::Reset);
            assert!(t.state.is_empty());
            assert_eq!(t.state.snapshot(), crate::session::Snapshot::empty());
            assert_eq!(t.effects, vec![Effect::Publish(crate::session::Snapshot::empty())]);
        }
    }

    #[test]
    fn test_new_upload_discards_previous_attempt() {
        let state = completed(Ok(png(b"X")));
        let old = current_id(&state);
        let state = apply(state, [Event::Uploaded(png(b"next"))]);
        let attempt = state.attempt().unwrap();

        assert_ne!(attempt.id(), old);
        assert_eq!(state.status(), StatusKind::Idle);
        assert!(attempt.result_image().is_none());
        assert!(attempt.error_message().is_none());
    }
}
