//! Image payloads and formats.

mod types;

pub use types::{EncodedImage, ImageFormat, DEFAULT_MEDIA_TYPE};

pub(crate) use types::decode_base64_lenient;
