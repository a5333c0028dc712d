//! One-shot memoization of a rendered sky image.

use std::sync::Arc;

use image::RgbaImage;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::params::SkyParams;
use crate::service::ImageService;

enum State<S> {
    /// No image yet; the service is kept for the next attempt.
    Pending(S),
    Ready(Arc<RgbaImage>),
}

/// Holds the image produced by one [`ImageService`] for one set of parameters.
///
/// The first `get_image` call runs the service; every later call returns the
/// same image. Concurrent first calls wait for a single generation. Once an
/// image exists the service is dropped. A failed or cancelled generation
/// keeps the service so the next call retries.
///
/// The entry is never invalidated in place: when [`ResultCache::is_valid`]
/// reports a mismatch, build a new cache.
pub struct ResultCache<S> {
    params: SkyParams,
    state: Mutex<State<S>>,
}

impl<S: ImageService> ResultCache<S> {
    pub fn new(service: S) -> Self {
        Self {
            params: *service.params(),
            state: Mutex::new(State::Pending(service)),
        }
    }

    pub fn params(&self) -> &SkyParams {
        &self.params
    }

    /// True when `params` matches the cached parameters bit for bit.
    pub fn is_valid(&self, params: &SkyParams) -> bool {
        self.params.matches(params)
    }

    /// True once an image has been produced. Waits for a generation in progress.
    pub async fn is_ready(&self) -> bool {
        matches!(*self.state.lock().await, State::Ready(_))
    }

    pub async fn get_image(&self) -> Result<Arc<RgbaImage>> {
        let mut state = self.state.lock().await;
        let image = match &*state {
            State::Ready(image) => return Ok(image.clone()),
            State::Pending(service) => Arc::new(service.get_image().await?),
        };

        // Replacing the pending state drops the service
        *state = State::Ready(image.clone());
        tracing::debug!(
            "Cached {}x{} image, generator released",
            image.width(),
            image.height()
        );
        Ok(image)
    }
}

impl<S> std::fmt::Debug for ResultCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
