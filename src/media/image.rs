// SPDX-License-Identifier: MPL-2.0
//! Image loading and decoding (PNG, JPEG, GIF) into RGBA frames.

use crate::config::{DEFAULT_ANIMATION_FRAME_MS, MIN_ANIMATION_FRAME_MS};
use crate::error::{Error, Result};
use crate::media::rotation::RotationAngle;
use image_rs::codecs::gif::GifDecoder;
use image_rs::{AnimationDecoder, DynamicImage, GenericImageView, ImageFormat, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// One displayable frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// RGBA bytes, shared so clones stay cheap.
    rgba: Arc<Vec<u8>>,
    /// How long the frame stays on screen during playback.
    pub delay: Duration,
}

impl Frame {
    pub fn new(rgba: Vec<u8>, delay: Duration) -> Self {
        Self {
            rgba: Arc::new(rgba),
            delay,
        }
    }

    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba
    }
}

/// A decoded image: one frame for still images, several for animations.
///
/// All frames share the image's dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    frames: Vec<Frame>,
}

impl ImageData {
    /// Creates a still image from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            frames: vec![Frame::new(pixels, Duration::ZERO)],
        }
    }

    /// Creates an animation. Returns an error when `frames` is empty.
    pub fn from_frames(width: u32, height: u32, frames: Vec<Frame>) -> Result<Self> {
        if frames.is_empty() {
            return Err(Error::Decode("image has no frames".into()));
        }
        Ok(Self {
            width,
            height,
            frames,
        })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn is_animated(&self) -> bool {
        self.frames.len() > 1
    }

    /// Returns a reference to the first frame's RGBA bytes.
    pub fn rgba_bytes(&self) -> &[u8] {
        self.frames[0].rgba_bytes()
    }

    /// Creates a rotated copy of every frame.
    ///
    /// Returns a clone when the angle is 0°.
    pub fn rotated(&self, angle: RotationAngle) -> Result<Self> {
        if angle.is_identity() {
            return Ok(self.clone());
        }

        let mut frames = Vec::with_capacity(self.frames.len());
        let mut size = (self.width, self.height);
        for frame in &self.frames {
            let buffer = RgbaImage::from_raw(self.width, self.height, frame.rgba.to_vec())
                .ok_or_else(|| Error::Decode("frame size does not match image".into()))?;
            let rotated = match angle.degrees() {
                90 => DynamicImage::ImageRgba8(buffer).rotate90(),
                180 => DynamicImage::ImageRgba8(buffer).rotate180(),
                _ => DynamicImage::ImageRgba8(buffer).rotate270(),
            };
            size = rotated.dimensions();
            frames.push(Frame::new(rotated.to_rgba8().into_vec(), frame.delay));
        }

        Ok(Self {
            width: size.0,
            height: size.1,
            frames,
        })
    }
}

/// Load an image from the given path and return its data.
///
/// GIF files are decoded into all of their frames; a frame without a usable
/// delay gets `fallback_delay`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Decode`] if
/// the content is not a supported image.
pub fn load_image_with_delay<P: AsRef<Path>>(path: P, fallback_delay: Duration) -> Result<ImageData> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let format = image_rs::guess_format(&bytes).ok();

    if format == Some(ImageFormat::Gif) {
        return decode_gif(bytes, fallback_delay);
    }

    let img = match format {
        Some(fmt) => image_rs::load_from_memory_with_format(&bytes, fmt)?,
        None => image_rs::load_from_memory(&bytes)?,
    };
    let (width, height) = img.dimensions();
    Ok(ImageData::from_rgba(width, height, img.to_rgba8().into_vec()))
}

/// [`load_image_with_delay`] with the default frame delay.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<ImageData> {
    load_image_with_delay(path, Duration::from_millis(DEFAULT_ANIMATION_FRAME_MS))
}

fn decode_gif(bytes: Vec<u8>, fallback_delay: Duration) -> Result<ImageData> {
    let decoder = GifDecoder::new(Cursor::new(bytes))?;
    let raw_frames = decoder.into_frames().collect_frames()?;

    let mut size = (0, 0);
    let mut frames = Vec::with_capacity(raw_frames.len());
    for raw in raw_frames {
        let (numer, denom) = raw.delay().numer_denom_ms();
        let millis = if denom == 0 { 0 } else { u64::from(numer / denom) };
        let delay = if millis < MIN_ANIMATION_FRAME_MS {
            fallback_delay
        } else {
            Duration::from_millis(millis)
        };

        let buffer = raw.into_buffer();
        size = buffer.dimensions();
        frames.push(Frame::new(buffer.into_vec(), delay));
    }

    ImageData::from_frames(size.0, size.1, frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image_rs::codecs::gif::GifEncoder;
    use image_rs::{Delay, Rgba};
    use std::fs;
    use tempfile::tempdir;

    fn write_gif(path: &Path, frame_count: usize, delay_ms: u32) {
        let file = fs::File::create(path).expect("failed to create gif");
        let mut encoder = GifEncoder::new(file);
        let frames = (0..frame_count).map(|i| {
            let shade = (i * 60) as u8;
            let buffer = RgbaImage::from_pixel(3, 2, Rgba([shade, 0, 0, 255]));
            image_rs::Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(delay_ms, 1))
        });
        encoder.encode_frames(frames).expect("failed to encode gif");
    }

    #[test]
    fn load_png_image_returns_expected_dimensions() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let image_path = temp_dir.path().join("sample.png");

        let image = RgbaImage::from_pixel(4, 2, Rgba([255, 0, 0, 255]));
        image
            .save(&image_path)
            .expect("failed to write temporary png");

        let data = load_image(&image_path).expect("png should load successfully");
        assert_eq!(data.width, 4);
        assert_eq!(data.height, 2);
        assert!(!data.is_animated());
        assert_eq!(data.rgba_bytes().len(), 4 * 2 * 4);
    }

    #[test]
    fn load_animated_gif_keeps_every_frame() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let gif_path = temp_dir.path().join("anim.gif");
        write_gif(&gif_path, 3, 50);

        let data = load_image(&gif_path).expect("gif should load successfully");
        assert_eq!(data.frame_count(), 3);
        assert!(data.is_animated());
        assert_eq!((data.width, data.height), (3, 2));
        assert!(data.frames().iter().all(|f| f.delay == Duration::from_millis(50)));
    }

    #[test]
    fn gif_without_delay_uses_fallback() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let gif_path = temp_dir.path().join("nodelay.gif");
        write_gif(&gif_path, 2, 0);

        let data = load_image_with_delay(&gif_path, Duration::from_millis(80))
            .expect("gif should load successfully");
        assert!(data.frames().iter().all(|f| f.delay == Duration::from_millis(80)));
    }

    #[test]
    fn load_missing_image_returns_io_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let missing_path = temp_dir.path().join("does_not_exist.png");

        match load_image(&missing_path) {
            Err(Error::Io(_)) => {}
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn load_invalid_png_bytes_returns_decode_error() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let bad_path = temp_dir.path().join("invalid.png");
        fs::write(&bad_path, b"not a png").expect("failed to write invalid data");

        match load_image(&bad_path) {
            Err(Error::Decode(message)) => assert!(!message.is_empty()),
            other => panic!("expected Decode error for invalid png, got {other:?}"),
        }
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let data = ImageData::from_rgba(4, 2, vec![0; 4 * 2 * 4]);

        let quarter = data.rotated(RotationAngle::default().rotate_right()).expect("rotates");
        assert_eq!((quarter.width, quarter.height), (2, 4));

        let half = data
            .rotated(RotationAngle::default().rotate_right().rotate_right())
            .expect("rotates");
        assert_eq!((half.width, half.height), (4, 2));

        let same = data.rotated(RotationAngle::default()).expect("identity");
        assert_eq!(same, data);
    }

    #[test]
    fn rotation_moves_pixels_clockwise() {
        // 2x1 image: red, blue
        let pixels = vec![255, 0, 0, 255, 0, 0, 255, 255];
        let data = ImageData::from_rgba(2, 1, pixels);

        let rotated = data.rotated(RotationAngle::default().rotate_right()).expect("rotates");
        // 1x2 image: red on top, blue below
        assert_eq!(rotated.rgba_bytes(), &[255, 0, 0, 255, 0, 0, 255, 255]);
    }

    #[test]
    fn rotation_rejects_mismatched_frame() {
        let data = ImageData::from_rgba(4, 4, vec![0; 3]);
        assert!(matches!(
            data.rotated(RotationAngle::default().rotate_left()),
            Err(Error::Decode(_))
        ));
    }

    #[test]
    fn from_frames_requires_a_frame() {
        assert!(ImageData::from_frames(1, 1, Vec::new()).is_err());
    }
}
