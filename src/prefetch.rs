// SPDX-License-Identifier: MPL-2.0
//! Background decoding for the neighbor cache.
//!
//! Decodes may run off the UI thread, but the cache itself is only touched by
//! the thread that owns the navigator. This module keeps the bookkeeping that
//! makes that safe:
//!
//! - at most one decode in flight per path
//! - a generation counter bumped whenever the image list is rebuilt
//! - completions that are no longer wanted are discarded, never inserted
//!
//! # Usage
//!
//! ```ignore
//! for ticket in navigator.request_prefetch() {
//!     let loader = Arc::clone(&loader);
//!     tokio::spawn(async move {
//!         let (ticket, result) = load_in_background(loader, ticket).await;
//!         sender.send((ticket, result));
//!     });
//! }
//!
//! // Back on the owning thread
//! navigator.accept_loaded(ticket, result);
//! ```

use crate::error::{Error, Result};
use crate::media::ImageLoader;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Claim on a single in-flight decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    path: PathBuf,
    generation: u64,
}

impl LoadTicket {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// In-flight decode tracking.
#[derive(Debug, Default)]
pub struct PendingLoads {
    in_flight: HashMap<PathBuf, u64>,
    generation: u64,
}

impl PendingLoads {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `path` for decoding. Returns `None` if a decode is already running.
    pub fn begin(&mut self, path: &Path) -> Option<LoadTicket> {
        if self.in_flight.contains_key(path) {
            return None;
        }
        self.in_flight.insert(path.to_path_buf(), self.generation);
        Some(LoadTicket {
            path: path.to_path_buf(),
            generation: self.generation,
        })
    }

    /// Releases the claim held by `ticket`.
    ///
    /// Returns true if the ticket belongs to the current generation, i.e. its
    /// result may still be used.
    pub fn finish(&mut self, ticket: &LoadTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.in_flight.remove(&ticket.path).is_some()
    }

    /// Forgets a single path so a later request may decode it again.
    pub fn cancel(&mut self, path: &Path) {
        self.in_flight.remove(path);
    }

    /// Starts a new generation. Every outstanding ticket becomes stale.
    pub fn invalidate(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.in_flight.clear();
    }

    pub fn is_loading(&self, path: &Path) -> bool {
        self.in_flight.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Decodes the ticket's path on the blocking thread pool.
///
/// Returns the ticket with the decode result so the owner can decide whether
/// the result is still wanted.
pub async fn load_in_background<L>(loader: Arc<L>, ticket: LoadTicket) -> (LoadTicket, Result<L::Handle>)
where
    L: ImageLoader + Send + Sync + 'static,
    L::Handle: Send + 'static,
{
    let path = ticket.path.clone();
    let result = tokio::task::spawn_blocking(move || loader.load(&path))
        .await
        .unwrap_or_else(|e| Err(Error::Io(format!("Prefetch task failed: {e}"))));

    (ticket, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{ImageData, ImageDecoder};
    use image_rs::{Rgba, RgbaImage};
    use tempfile::tempdir;

    #[test]
    fn one_decode_per_path() {
        let mut pending = PendingLoads::new();
        let path = Path::new("/pics/a.png");

        let ticket = pending.begin(path).expect("first claim");
        assert!(pending.begin(path).is_none());
        assert!(pending.is_loading(path));

        assert!(pending.finish(&ticket));
        assert!(!pending.is_loading(path));
        assert!(pending.begin(path).is_some());
    }

    #[test]
    fn invalidate_makes_tickets_stale() {
        let mut pending = PendingLoads::new();
        let ticket = pending.begin(Path::new("/pics/a.png")).expect("claim");

        pending.invalidate();

        assert!(!pending.finish(&ticket));
        assert!(pending.is_empty());
        let fresh = pending.begin(Path::new("/pics/a.png")).expect("claim again");
        assert_eq!(fresh.generation(), ticket.generation() + 1);
    }

    #[test]
    fn cancelled_ticket_is_not_current() {
        let mut pending = PendingLoads::new();
        let ticket = pending.begin(Path::new("/pics/a.png")).expect("claim");
        pending.cancel(ticket.path());
        assert!(!pending.finish(&ticket));
    }

    #[test]
    fn finishing_twice_only_counts_once() {
        let mut pending = PendingLoads::new();
        let ticket = pending.begin(Path::new("/pics/a.png")).expect("claim");
        assert!(pending.finish(&ticket));
        assert!(!pending.finish(&ticket));
    }

    #[tokio::test]
    async fn background_load_decodes_image() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let path = temp_dir.path().join("bg.png");
        RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 255]))
            .save(&path)
            .expect("failed to write png");

        let mut pending = PendingLoads::new();
        let ticket = pending.begin(&path).expect("claim");
        let (ticket, result) = load_in_background(Arc::new(ImageDecoder::default()), ticket).await;

        let data: ImageData = result.expect("png should load");
        assert_eq!(data.width, 2);
        assert!(pending.finish(&ticket));
    }

    #[tokio::test]
    async fn background_load_reports_failure() {
        let temp_dir = tempdir().expect("failed to create temp dir");
        let mut pending = PendingLoads::new();
        let ticket = pending
            .begin(&temp_dir.path().join("missing.png"))
            .expect("claim");

        let (_, result) = load_in_background(Arc::new(ImageDecoder::default()), ticket).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
