//! Explicit configuration for the transform client.

/// Default Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Environment variables consulted by [`TransformConfig::from_env`], in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GOOGLE_API_KEY", "API_KEY"];

/// Instruction sent alongside every uploaded photo.
pub const RESUME_PHOTO_INSTRUCTION: &str = "Transform this photo into a professional studio \
resume headshot. Dress the person in neat business attire (a dark suit or blazer with a \
plain shirt). Apply soft, balanced studio lighting. Replace the background with a clean, \
neutral solid grey or off-white backdrop. Frame the head and shoulders facing the camera. \
Preserve the person's facial identity exactly: keep their face shape, features, skin tone, \
hairstyle and expression recognisable. Do not add text, logos or accessories.";

/// Gemini image model variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransformModel {
    /// Gemini 2.5 Flash Image (fast, economical).
    #[default]
    FlashImage,
    /// Gemini 3 Pro Image (highest quality).
    ProImage,
}

impl TransformModel {
    /// Returns the API model identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FlashImage => "gemini-2.5-flash-image",
            Self::ProImage => "gemini-3-pro-image-preview",
        }
    }
}

impl std::fmt::Display for TransformModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration injected into [`GeminiTransformClient`](super::GeminiTransformClient).
///
/// The client never reads the process environment itself. Use
/// [`TransformConfig::from_env`] at the edge of the program to fill in the
/// credential from `GOOGLE_API_KEY` or `API_KEY`.
#[derive(Clone, PartialEq, Eq)]
pub struct TransformConfig {
    /// API credential. `None` makes every transform fail with
    /// [`MissingCredential`](crate::ResumePhotoError::MissingCredential).
    pub api_key: Option<String>,
    /// Model to call.
    pub model: TransformModel,
    /// Base URL of the generative language API, without a trailing slash.
    pub base_url: String,
    /// Natural-language instruction sent with the photo.
    pub instruction: String,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: TransformModel::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            instruction: RESUME_PHOTO_INSTRUCTION.to_string(),
        }
    }
}

impl TransformConfig {
    /// Creates a configuration with defaults and no credential.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration whose credential comes from the environment.
    pub fn from_env() -> Self {
        Self::default().with_api_key_from(|name| std::env::var(name).ok())
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model variant.
    pub fn with_model(mut self, model: TransformModel) -> Self {
        self.model = model;
        self
    }

    /// Sets the API base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replaces the instruction text.
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }

    /// Returns the configured credential, ignoring blank values.
    pub fn credential(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    fn with_api_key_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.api_key = API_KEY_ENV_VARS
            .iter()
            .filter_map(|name| lookup(name))
            .find(|v| !v.trim().is_empty());
        self
    }
}

impl std::fmt::Debug for TransformConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
