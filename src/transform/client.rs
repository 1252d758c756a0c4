//! Transform client trait.

use crate::error::Result;
use crate::image::EncodedImage;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns an uploaded photo into a studio resume photo.
///
/// One call is one round trip to the model: implementations must not retry.
#[async_trait]
pub trait TransformClient: Send + Sync {
    /// Transforms the image, returning the generated PNG.
    async fn transform(&self, image: &EncodedImage) -> Result<EncodedImage>;

    /// Returns the name of this client for display.
    fn name(&self) -> &str;
}

#[async_trait]
impl<T: TransformClient + ?Sized> TransformClient for Arc<T> {
    async fn transform(&self, image: &EncodedImage) -> Result<EncodedImage> {
        (**self).transform(image).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

#[async_trait]
impl<T: TransformClient + ?Sized> TransformClient for Box<T> {
    async fn transform(&self, image: &EncodedImage) -> Result<EncodedImage> {
        (**self).transform(image).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
