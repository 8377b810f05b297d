// SPDX-License-Identifier: MPL-2.0
//! Frame playback for animated images.
//!
//! A [`FramePlayer`] holds its own `Arc` to the image it plays, so the neighbor
//! cache may evict or replace that entry while frames are still being read.
//! The player must be stopped before the current image is reloaded.

use crate::media::image::{Frame, ImageData};
use std::sync::Arc;
use std::time::Duration;

/// Shortest step accepted when advancing frames, so zero delays cannot spin.
const MIN_FRAME_STEP: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct FramePlayer {
    image: Arc<ImageData>,
    index: usize,
    elapsed: Duration,
    running: bool,
}

impl FramePlayer {
    /// Starts playback on the first frame. Still images never advance.
    pub fn new(image: Arc<ImageData>) -> Self {
        let running = image.is_animated();
        Self {
            image,
            index: 0,
            elapsed: Duration::ZERO,
            running,
        }
    }

    pub fn image(&self) -> &Arc<ImageData> {
        &self.image
    }

    pub fn current_frame(&self) -> &Frame {
        &self.image.frames()[self.index]
    }

    pub fn frame_index(&self) -> usize {
        self.index
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advances playback by `elapsed`, looping at the end.
    ///
    /// Returns true if the visible frame changed.
    pub fn tick(&mut self, elapsed: Duration) -> bool {
        if !self.running {
            return false;
        }

        let start = self.index;
        self.elapsed += elapsed;

        // A full loop always ends where it started.
        let loop_length = self.loop_length();
        if self.elapsed >= loop_length {
            let remainder = self.elapsed.as_nanos() % loop_length.as_nanos();
            self.elapsed = Duration::from_nanos(remainder as u64);
        }

        loop {
            let delay = self.current_frame().delay.max(MIN_FRAME_STEP);
            if self.elapsed < delay {
                break;
            }
            self.elapsed -= delay;
            self.index = (self.index + 1) % self.image.frame_count();
        }
        self.index != start
    }

    /// Freezes playback on the current frame.
    pub fn stop(&mut self) {
        self.running = false;
    }

    fn loop_length(&self) -> Duration {
        self.image
            .frames()
            .iter()
            .map(|frame| frame.delay.max(MIN_FRAME_STEP))
            .sum()
    }
}
