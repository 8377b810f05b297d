// SPDX-License-Identifier: MPL-2.0
//! Bounded neighbor cache for faster navigation.
//!
//! Keeps the decoded images around the current position of an [`ImageList`]
//! resident, so stepping to the next or previous image never waits on a decode.
//!
//! # Design
//!
//! - **LRU eviction**: Least recently used images are evicted first
//! - **Count-bounded**: At most `2R + 1` images for a cache radius `R`
//! - **Path-keyed**: Images indexed by their file path
//! - **Ownership release**: The cache owns one `Arc` per entry and drops it on
//!   eviction, replacement, removal or clear. A handle cloned out for display
//!   stays valid until the renderer lets go of it.
//!
//! # Usage
//!
//! ```ignore
//! let mut cache = NeighborCache::new(radius.capacity());
//!
//! // After opening a directory
//! cache.clear();
//! let report = cache.warm(&list, radius.value(), &decoder);
//!
//! // After every list.advance(direction)
//! let report = cache.step(&list, radius.value(), direction, &decoder);
//! ```
//!
//! [`ImageList`]: crate::directory_scanner::ImageList

use crate::directory_scanner::{Direction, ImageList};
use crate::error::{Error, Result};
use crate::media::ImageLoader;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Statistics about cache activity.
///
/// Every handle the cache lets go of is counted exactly once in
/// `replacements`, `evictions`, `removals` or `cleared`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups that found an image.
    pub hits: u64,

    /// Number of lookups that found nothing.
    pub misses: u64,

    /// Number of images inserted (new keys and replacements).
    pub insertions: u64,

    /// Number of handles released because their key was put again.
    pub replacements: u64,

    /// Number of handles released to stay within capacity.
    pub evictions: u64,

    /// Number of handles released by explicit removal.
    pub removals: u64,

    /// Number of handles released by `clear`.
    pub cleared: u64,
}

impl CacheStats {
    /// Total number of handles the cache has released.
    #[must_use]
    pub fn released(&self) -> u64 {
        self.replacements + self.evictions + self.removals + self.cleared
    }

    /// Returns the cache hit rate as a percentage (0.0 - 100.0).
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// A decode that failed while filling the window.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of filling (part of) the window.
///
/// Failures never abort the fill; each one is reported for its path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarmReport {
    /// Number of images decoded and inserted.
    pub loaded: usize,
    /// Paths that could not be decoded.
    pub failures: Vec<LoadFailure>,
}

impl WarmReport {
    fn absorb(&mut self, other: WarmReport) {
        self.loaded += other.loaded;
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// LRU cache of decoded images around the current position.
pub struct NeighborCache<H> {
    cache: LruCache<PathBuf, Arc<H>>,
    stats: CacheStats,
}

impl<H> NeighborCache<H> {
    /// Creates a cache holding at most `capacity` images (at least one).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
            stats: CacheStats::default(),
        }
    }

    /// Gets an image by path and marks it most recently used.
    pub fn get(&mut self, path: &Path) -> Option<Arc<H>> {
        match self.cache.get(path) {
            Some(handle) => {
                self.stats.hits += 1;
                Some(Arc::clone(handle))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Inserts or replaces an image and marks it most recently used.
    ///
    /// A replaced handle is released before the new one is stored. A new key
    /// arriving at capacity first evicts the least recently used entry, which
    /// can never be the key being inserted.
    pub fn put(&mut self, path: PathBuf, handle: H) {
        if let Some(old) = self.cache.pop(&path) {
            drop(old);
            self.stats.replacements += 1;
            trace!(?path, "Replaced cached image");
        } else if self.cache.len() >= self.cache.cap().get() {
            if let Some((evicted, _)) = self.cache.pop_lru() {
                self.stats.evictions += 1;
                trace!(?evicted, "Evicted image from neighbor cache");
            }
        }

        self.cache.put(path, Arc::new(handle));
        self.stats.insertions += 1;
    }

    /// Checks if an image is cached for the given path without updating LRU order.
    #[must_use]
    pub fn has(&self, path: &Path) -> bool {
        self.cache.contains(path)
    }

    /// Gets an image without touching LRU order or statistics.
    #[must_use]
    pub fn peek(&self, path: &Path) -> Option<Arc<H>> {
        self.cache.peek(path).map(Arc::clone)
    }

    /// Releases the image cached for `path`, if any.
    pub fn remove(&mut self, path: &Path) {
        if self.cache.pop(path).is_some() {
            self.stats.removals += 1;
            trace!(?path, "Removed image from neighbor cache");
        }
    }

    /// Releases every cached image.
    pub fn clear(&mut self) {
        self.stats.cleared += self.cache.len() as u64;
        self.cache.clear();
    }

    /// Releases every image whose path fails `keep`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Path) -> bool,
    {
        let doomed: Vec<PathBuf> = self
            .cache
            .iter()
            .filter(|(path, _)| !keep(path))
            .map(|(path, _)| path.clone())
            .collect();
        for path in doomed {
            self.remove(&path);
        }
    }

    /// Cached paths from least to most recently used.
    #[must_use]
    pub fn resident_paths(&self) -> Vec<PathBuf> {
        self.cache.iter().rev().map(|(path, _)| path.clone()).collect()
    }

    /// Returns the current number of cached images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }

    /// Returns the current cache statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Gets the image for `path`, decoding and inserting it on a miss.
    ///
    /// Unlike window fills, a failure here is returned to the caller because
    /// it concerns the image that was asked for.
    pub fn fetch<L>(&mut self, path: &Path, loader: &L) -> Result<Arc<H>>
    where
        L: ImageLoader<Handle = H>,
    {
        if let Some(handle) = self.get(path) {
            return Ok(handle);
        }
        let handle = loader.load(path)?;
        self.put(path.to_path_buf(), handle);
        self.get(path)
            .ok_or_else(|| Error::NotFound(path.to_path_buf()))
    }

    /// Loads the whole window around the cursor of `list`.
    ///
    /// The cursor and the `radius` images ahead of it are loaded first, then
    /// the `radius` images behind it. When the list fits in the window every
    /// image is loaded. Paths already resident are left untouched.
    pub fn warm<L>(&mut self, list: &ImageList, radius: usize, loader: &L) -> WarmReport
    where
        L: ImageLoader<Handle = H>,
    {
        self.warm_except(list, radius, loader, |_| false)
    }

    /// [`warm`](Self::warm), leaving out every path for which `skip` is true
    /// (e.g. paths already being decoded in the background).
    pub fn warm_except<L, F>(&mut self, list: &ImageList, radius: usize, loader: &L, skip: F) -> WarmReport
    where
        L: ImageLoader<Handle = H>,
        F: Fn(&Path) -> bool,
    {
        let mut report = WarmReport::default();
        for index in list.window_indices(radius) {
            if let Some(path) = list.get(index) {
                report.absorb(self.load_missing(path, loader, &skip));
            }
        }
        debug!(
            loaded = report.loaded,
            failed = report.failures.len(),
            resident = self.len(),
            "Warmed neighbor cache"
        );
        report
    }

    /// Loads any window path that is not resident, e.g. after a removal or jump.
    pub fn refill<L>(&mut self, list: &ImageList, radius: usize, loader: &L) -> WarmReport
    where
        L: ImageLoader<Handle = H>,
    {
        self.warm(list, radius, loader)
    }

    pub fn refill_except<L, F>(&mut self, list: &ImageList, radius: usize, loader: &L, skip: F) -> WarmReport
    where
        L: ImageLoader<Handle = H>,
        F: Fn(&Path) -> bool,
    {
        self.warm_except(list, radius, loader, skip)
    }

    /// Slides the window after `list` has advanced one step in `direction`.
    ///
    /// The image that fell out at the trailing edge is released and the one
    /// that entered at the leading edge is loaded. Nothing happens while the
    /// whole list fits in the window.
    pub fn step<L>(
        &mut self,
        list: &ImageList,
        radius: usize,
        direction: Direction,
        loader: &L,
    ) -> WarmReport
    where
        L: ImageLoader<Handle = H>,
    {
        self.step_except(list, radius, direction, loader, |_| false)
    }

    /// [`step`](Self::step), not loading the entering path if `skip` is true for it.
    pub fn step_except<L, F>(
        &mut self,
        list: &ImageList,
        radius: usize,
        direction: Direction,
        loader: &L,
        skip: F,
    ) -> WarmReport
    where
        L: ImageLoader<Handle = H>,
        F: Fn(&Path) -> bool,
    {
        if list.window_edges(radius).is_none() {
            return WarmReport::default();
        }

        let reach = radius as isize;
        let forward = direction.offset();
        let leaving = list.offset_index(-forward * (reach + 1));
        let entering = list.offset_index(forward * reach);

        if let Some(path) = leaving.and_then(|index| list.get(index)) {
            self.remove(path);
        }
        match entering.and_then(|index| list.get(index)) {
            Some(path) => self.load_missing(path, loader, &skip),
            None => WarmReport::default(),
        }
    }

    fn load_missing<L, F>(&mut self, path: &Path, loader: &L, skip: &F) -> WarmReport
    where
        L: ImageLoader<Handle = H>,
        F: Fn(&Path) -> bool,
    {
        let mut report = WarmReport::default();
        if self.has(path) {
            return report;
        }
        if skip(path) {
            trace!(?path, "Skipping neighbor load");
            return report;
        }
        match loader.load(path) {
            Ok(handle) => {
                self.put(path.to_path_buf(), handle);
                report.loaded += 1;
            }
            Err(error) => {
                warn!(?path, %error, "Failed to load neighbor image");
                report.failures.push(LoadFailure {
                    path: path.to_path_buf(),
                    error,
                });
            }
        }
        report
    }
}

impl<H> std::fmt::Debug for NeighborCache<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeighborCache")
            .field("image_count", &self.cache.len())
            .field("capacity", &self.cache.cap())
            .field("stats", &self.stats)
            .finish()
    }
}
