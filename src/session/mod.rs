//! Session state machine for one upload-through-result cycle.
//!
//! The transition function is pure; [`SessionController`] runs its effects
//! (publishing snapshots, calling the transform client) and feeds completions
//! back in.

mod controller;
mod effect;
mod event;
mod state;
mod transition;

#[cfg(test)]
mod proptests;

pub use controller::{PendingTransform, SessionController};
pub use effect::Effect;
pub use event::Event;
pub use state::{
    Attempt, AttemptId, AttemptStatus, Download, SessionState, Snapshot, StatusKind,
    DOWNLOAD_FILE_NAME,
};
pub use transition::{transition, Transition};
