//! Property tests: session invariants hold for arbitrary event sequences.

use crate::image::EncodedImage;
use crate::session::effect::Effect;
use crate::session::event::Event;
use crate::session::state::{AttemptId, SessionState, Snapshot, StatusKind};
use crate::session::transition::transition;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Upload(u8),
    Request,
    /// Completion for the Attempt `delta` uploads away from the current one.
    Complete { delta: i64, ok: bool },
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => any::<u8>().prop_map(Op::Upload),
        3 => Just(Op::Request),
        3 => (-3i64..=1, any::<bool>()).prop_map(|(delta, ok)| Op::Complete { delta, ok }),
        1 => Just(Op::Reset),
    ]
}

fn to_event(op: &Op, uploads: u64) -> Event {
    match op {
        Op::Upload(byte) => Event::Uploaded(EncodedImage::new("image/jpeg", vec![*byte])),
        Op::Request => Event::TransformRequested,
        Op::Complete { delta, ok } => {
            let id = (uploads as i64 - 1 + delta).max(0) as u64;
            let outcome = if *ok {
                Ok(EncodedImage::new("image/png", vec![0x89, 0x50]))
            } else {
                Err("quota exceeded".to_string())
            };
            Event::TransformCompleted {
                attempt: AttemptId::new(id),
                outcome,
            }
        }
        Op::Reset => Event::Reset,
    }
}

fn check_snapshot(snapshot: &Snapshot) -> Result<(), TestCaseError> {
    prop_assert_eq!(
        snapshot.result_image.is_some(),
        snapshot.status == StatusKind::Succeeded
    );
    prop_assert_eq!(
        snapshot.error_message.is_some(),
        snapshot.status == StatusKind::Failed
    );
    prop_assert_eq!(
        snapshot.original_image.is_some(),
        snapshot.status != StatusKind::Empty
    );
    prop_assert_eq!(
        snapshot.attempt_id.is_some(),
        snapshot.status != StatusKind::Empty
    );
    Ok(())
}

proptest! {
    #[test]
    fn prop_invariants_hold_for_any_sequence(ops in proptest::collection::vec(op(), 1..60)) {
        let mut state = SessionState::new();
        let mut uploads = 0u64;

        for op in &ops {
            let before = state.clone();
            let event = to_event(op, uploads);
            let stale = match &event {
                Event::TransformCompleted { attempt, .. } => {
                    before.attempt().map(|a| a.id()) != Some(*attempt)
                        || before.status() != StatusKind::Processing
                }
                _ => false,
            };

            let t = transition(before.clone(), event);
            let snapshot = t.state.snapshot();
            check_snapshot(&snapshot)?;

            let calls: Vec<_> = t
                .effects
                .iter()
                .filter_map(|e| match e {
                    Effect::CallTransform { attempt, .. } => Some(*attempt),
                    _ => None,
                })
                .collect();
            prop_assert!(calls.len() <= 1);
            if let Some(attempt) = calls.first() {
                prop_assert!(matches!(
                    before.status(),
                    StatusKind::Idle | StatusKind::Failed
                ));
                prop_assert_eq!(t.state.status(), StatusKind::Processing);
                prop_assert_eq!(Some(*attempt), snapshot.attempt_id);
            }
            if before.status() == StatusKind::Processing {
                prop_assert!(calls.is_empty());
            }

            if let Some(Effect::Publish(published)) = t.effects.first() {
                prop_assert_eq!(published, &snapshot);
            } else {
                prop_assert!(t.effects.is_empty());
                prop_assert_eq!(&t.state, &before);
            }

            match op {
                Op::Upload(_) => {
                    uploads += 1;
                    prop_assert_eq!(snapshot.status, StatusKind::Idle);
                    prop_assert_eq!(snapshot.attempt_id, Some(AttemptId::new(uploads - 1)));
                }
                Op::Reset => {
                    prop_assert_eq!(&snapshot, &Snapshot::empty());
                    prop_assert_eq!(&t.effects, &vec![Effect::Publish(Snapshot::empty())]);
                }
                Op::Complete { ok, .. } => {
                    if stale {
                        prop_assert!(t.is_ignored());
                        prop_assert_eq!(&t.state, &before);
                    } else if *ok {
                        prop_assert_eq!(snapshot.status, StatusKind::Succeeded);
                    } else {
                        prop_assert_eq!(snapshot.status, StatusKind::Failed);
                    }
                }
                Op::Request => {}
            }

            state = t.state;
        }
    }
}
