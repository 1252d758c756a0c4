#![warn(missing_docs)]
//! Resume Photo - turn a casual photo into an AI studio resume photo.
//!
//! The crate has two parts:
//!
//! - a [`TransformClient`] that sends one photo plus a fixed instruction to a
//!   generative-image model and returns the generated PNG, and
//! - a [`SessionController`] that tracks the single current Attempt
//!   (`Idle` → `Processing` → `Succeeded`/`Failed`) and publishes a
//!   [`Snapshot`] after every transition.
//!
//! # Quick Start
//!
//! ```no_run
//! use resume_photo::{EncodedImage, GeminiTransformClient, SessionController, TransformConfig};
//!
//! #[tokio::main]
//! async fn main() -> resume_photo::Result<()> {
//!     let client = GeminiTransformClient::new(TransformConfig::from_env());
//!     let mut session = SessionController::new(client);
//!
//!     session.upload(EncodedImage::from_path("photo.jpg")?);
//!     let snapshot = session.transform().await;
//!
//!     match snapshot.download() {
//!         Some(download) => {
//!             download.save_to(".")?;
//!         }
//!         None => eprintln!("{}", snapshot.error_message.unwrap_or_default()),
//!     }
//!     Ok(())
//! }
//! ```

mod error;
pub mod image;
pub mod session;
pub mod transform;

// Re-export error types at crate root
pub use error::{ResumePhotoError, Result, GENERIC_FAILURE_MESSAGE};

pub use image::{EncodedImage, ImageFormat};
pub use session::{
    Attempt, AttemptId, AttemptStatus, Download, SessionController, SessionState, Snapshot,
    StatusKind, DOWNLOAD_FILE_NAME,
};
pub use transform::{GeminiTransformClient, TransformClient, TransformConfig, TransformModel};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ResumePhotoError, Result};
    pub use crate::image::EncodedImage;
    pub use crate::session::{SessionController, Snapshot, StatusKind};
    pub use crate::transform::{GeminiTransformClient, TransformClient, TransformConfig};
}
