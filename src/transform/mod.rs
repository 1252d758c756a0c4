//! Photo transformation through an external generative-image model.

mod client;
mod config;
mod gemini;

pub use client::TransformClient;
pub use config::{
    TransformConfig, TransformModel, API_KEY_ENV_VARS, DEFAULT_BASE_URL, RESUME_PHOTO_INSTRUCTION,
};
pub use gemini::{GeminiTransformClient, RESULT_MEDIA_TYPE};
