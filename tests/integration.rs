// SPDX-License-Identifier: MPL-2.0
use image_rs::codecs::gif::GifEncoder;
use image_rs::{Delay, Frame, Rgba, RgbaImage};
use simple_viewer::config::{self, CacheRadius, Config};
use simple_viewer::media::{FramePlayer, ImageData, ImageDecoder, RotationAngle};
use simple_viewer::prefetch::load_in_background;
use simple_viewer::{Direction, ImageNavigator};
use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn write_png(path: &Path, width: u32, height: u32) {
    RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]))
        .save(path)
        .expect("failed to write png");
}

fn write_gif(path: &Path, frame_count: u32) {
    let file = File::create(path).expect("failed to create gif");
    let mut encoder = GifEncoder::new(file);
    let frames = (0..frame_count).map(|i| {
        let pixels = RgbaImage::from_pixel(2, 2, Rgba([(i * 60) as u8, 0, 0, 255]));
        Frame::from_parts(pixels, 0, 0, Delay::from_numer_denom_ms(50, 1))
    });
    encoder.encode_frames(frames).expect("failed to encode gif");
}

#[test]
fn browse_real_directory() {
    let dir = tempdir().expect("Failed to create temporary directory");
    for i in 1..=7 {
        write_png(&dir.path().join(format!("shot{i}.png")), i, 1);
    }
    write_gif(&dir.path().join("shot8.gif"), 3);
    std::fs::write(dir.path().join("notes.txt"), b"not an image").expect("write txt");

    let mut navigator = ImageNavigator::new(ImageDecoder::default(), CacheRadius::new(1));
    let view = navigator
        .open_file(&dir.path().join("shot2.png"))
        .expect("Failed to open file");
    assert_eq!(view.index, 1);
    assert_eq!(navigator.info().total_count, 8);
    assert_eq!(navigator.cache().len(), 3);

    let view = navigator.previous().expect("has images");
    let image = view.image.expect("png should decode");
    assert_eq!((image.width, image.height), (1, 1));

    let view = navigator.previous().expect("has images");
    let image: Arc<ImageData> = view.image.expect("gif should decode");
    assert!(image.is_animated());
    assert_eq!(navigator.cache().len(), 3);

    let mut player = FramePlayer::new(Arc::clone(&image));
    navigator.next();
    navigator.next();
    assert!(player.tick(Duration::from_millis(50)));
    assert_eq!(player.frame_index(), 1);
    player.stop();

    assert_eq!(
        navigator.status_text().as_deref(),
        Some("shot2.png | 2x1 | 2/8")
    );
}

#[test]
fn delete_and_move_update_directory() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let sorted = tempdir().expect("Failed to create destination directory");
    for name in ["a1.png", "a2.png", "a10.png"] {
        write_png(&dir.path().join(name), 2, 2);
    }

    let mut navigator = ImageNavigator::new(ImageDecoder::default(), CacheRadius::new(2));
    navigator
        .open_directory(dir.path(), None)
        .expect("Failed to open directory");
    assert_eq!(
        navigator.list().get(2).and_then(Path::file_name),
        Some(OsStr::new("a10.png"))
    );

    let view = navigator
        .delete_current()
        .expect("Failed to delete")
        .expect("images left");
    assert!(!dir.path().join("a1.png").exists());
    assert_eq!(view.path, dir.path().join("a2.png"));

    let (target, view) = navigator.move_current(sorted.path()).expect("Failed to move");
    assert!(target.exists());
    assert_eq!(view.expect("one image left").path, dir.path().join("a10.png"));
    assert_eq!(navigator.info().total_count, 1);
    assert_eq!(navigator.cache().len(), 1);
}

#[test]
fn rotation_applies_to_decoded_image() {
    let dir = tempdir().expect("Failed to create temporary directory");
    write_png(&dir.path().join("wide.png"), 4, 2);

    let mut navigator = ImageNavigator::new(ImageDecoder::default(), CacheRadius::default());
    navigator
        .open_directory(dir.path(), None)
        .expect("Failed to open directory");
    let view = navigator.rotate_left().expect("has image");
    assert_eq!(view.rotation, RotationAngle::from_degrees(270));

    let image = view.image.expect("png should decode");
    let rotated = image.rotated(view.rotation).expect("rotation succeeds");
    assert_eq!((rotated.width, rotated.height), (2, 4));
}

#[tokio::test]
async fn background_prefetch_fills_window() {
    let dir = tempdir().expect("Failed to create temporary directory");
    for i in 1..=6 {
        write_png(&dir.path().join(format!("p{i}.png")), 1, 1);
    }

    let mut navigator = ImageNavigator::new(ImageDecoder::default(), CacheRadius::new(1));
    navigator
        .open_directory(dir.path(), None)
        .expect("Failed to open directory");
    navigator.navigate_deferred(Direction::Forward);
    navigator.navigate_deferred(Direction::Forward);
    assert!(navigator.cached_current().is_none());

    let loader = Arc::clone(navigator.loader());
    for ticket in navigator.request_prefetch() {
        let (ticket, result) = load_in_background(Arc::clone(&loader), ticket).await;
        navigator.accept_loaded(ticket, result);
    }

    assert!(navigator.cached_current().is_some());
    assert_eq!(navigator.cache().len(), 3);
}

#[test]
fn config_round_trip_drives_navigator() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let config_path = dir.path().join("settings.toml");

    let config = Config {
        cache_radius: Some(3),
        animation_frame_ms: Some(40),
        shortcuts: None,
    };
    config::save_to_path(&config, &config_path).expect("Failed to write config file");
    let loaded = config::load_from_path(&config_path).expect("Failed to load config");
    assert_eq!(loaded, config);

    let decoder = ImageDecoder::new(loaded.animation_frame_delay());
    let navigator = ImageNavigator::from_config(decoder, &loaded);
    assert_eq!(navigator.radius().capacity(), 7);
    assert_eq!(navigator.cache().capacity(), 7);
    assert_eq!(navigator.loader().fallback_frame_delay, Duration::from_millis(40));
}
