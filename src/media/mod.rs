// SPDX-License-Identifier: MPL-2.0
//! Image decoding and the loader port used by the neighbor cache.
//!
//! The cache never decodes on its own: it asks an [`ImageLoader`] for a handle
//! and owns whatever comes back. [`ImageDecoder`] is the default loader, built
//! on the `image` crate.

pub mod animation;
pub mod image;
pub mod rotation;

use crate::config::DEFAULT_ANIMATION_FRAME_MS;
use crate::error::Result;
use std::path::Path;
use std::time::Duration;

// Re-export commonly used types
pub use animation::FramePlayer;
pub use image::{load_image, load_image_with_delay, Frame, ImageData};
pub use rotation::RotationAngle;

/// Turns a path into a cacheable handle.
///
/// Loads may be slow; implementations used with background prefetching must be
/// `Send + Sync`.
pub trait ImageLoader {
    type Handle;

    /// Decodes the image at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    fn load(&self, path: &Path) -> Result<Self::Handle>;
}

/// Handles that know their pixel size, for status text.
pub trait Dimensions {
    fn dimensions(&self) -> (u32, u32);
}

impl Dimensions for ImageData {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Default loader: decodes with the `image` crate into [`ImageData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDecoder {
    /// Delay given to animation frames that carry none.
    pub fallback_frame_delay: Duration,
}

impl ImageDecoder {
    pub fn new(fallback_frame_delay: Duration) -> Self {
        Self {
            fallback_frame_delay,
        }
    }
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_ANIMATION_FRAME_MS))
    }
}

impl ImageLoader for ImageDecoder {
    type Handle = ImageData;

    fn load(&self, path: &Path) -> Result<ImageData> {
        load_image_with_delay(path, self.fallback_frame_delay)
    }
}
