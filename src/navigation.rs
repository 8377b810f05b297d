// SPDX-License-Identifier: MPL-2.0
//! Image navigation: the image list, the neighbor cache and the loader kept
//! in step with each other.
//!
//! Every action follows the same order: the list changes first, the cache
//! releases what left the window, then missing neighbors are loaded and the
//! current image is fetched for display. A decode failure for a neighbor is
//! reported in the returned [`View`] but never blocks the navigation itself.
//!
//! Synchronous and deferred navigation may be mixed: window fills skip paths
//! already claimed by a background decode, so no neighbor is decoded twice.

use crate::cache::{LoadFailure, NeighborCache, WarmReport};
use crate::config::{CacheRadius, Config, IMAGE_EXTENSIONS};
use crate::directory_scanner::{Direction, ImageList};
use crate::error::{Error, Result};
use crate::file_ops;
use crate::media::{Dimensions, ImageLoader, RotationAngle};
use crate::prefetch::{LoadTicket, PendingLoads};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// What should be on screen after an action.
#[derive(Debug)]
pub struct View<H> {
    pub path: PathBuf,
    pub index: usize,
    /// The decoded image, or why it could not be shown.
    pub image: Result<Arc<H>>,
    /// Rotation the renderer should apply.
    pub rotation: RotationAngle,
    /// Neighbors that failed to load during this action.
    pub failures: Vec<LoadFailure>,
}

/// Result of handing a background decode back to the navigator.
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptOutcome {
    Inserted,
    /// The result was no longer wanted and has been dropped.
    Stale,
    Failed(LoadFailure),
}

/// Snapshot of the navigation state for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigationInfo {
    pub current_index: Option<usize>,
    pub total_count: usize,
    pub at_first: bool,
    pub at_last: bool,
    /// Number of decoded images currently held by the cache.
    pub resident: usize,
}

/// Owns the image list and the neighbor cache around its cursor.
pub struct ImageNavigator<L: ImageLoader> {
    list: ImageList,
    cache: NeighborCache<L::Handle>,
    radius: CacheRadius,
    loader: Arc<L>,
    pending: PendingLoads,
    rotation: RotationAngle,
    extensions: &'static [&'static str],
}

impl<L: ImageLoader> ImageNavigator<L> {
    pub fn new(loader: L, radius: CacheRadius) -> Self {
        Self {
            list: ImageList::new(),
            cache: NeighborCache::new(radius.capacity()),
            radius,
            loader: Arc::new(loader),
            pending: PendingLoads::new(),
            rotation: RotationAngle::default(),
            extensions: IMAGE_EXTENSIONS,
        }
    }

    pub fn from_config(loader: L, config: &Config) -> Self {
        Self::new(loader, config.cache_radius())
    }

    /// Restricts directory listings to other extensions.
    #[must_use]
    pub fn with_extensions(mut self, extensions: &'static [&'static str]) -> Self {
        self.extensions = extensions;
        self
    }

    /// Opens the directory containing `path` and shows `path`.
    ///
    /// On error the previously opened directory stays untouched.
    pub fn open_file(&mut self, path: &Path) -> Result<View<L::Handle>> {
        let list = ImageList::scan_for_file(path, self.extensions)?;
        self.reset(list).ok_or(Error::Empty)
    }

    /// Opens `directory`, starting at `start_index` or the first image.
    ///
    /// Returns `Ok(None)` if the directory holds no images. On error the
    /// previously opened directory stays untouched.
    pub fn open_directory(
        &mut self,
        directory: &Path,
        start_index: Option<usize>,
    ) -> Result<Option<View<L::Handle>>> {
        let mut list = ImageList::rebuild(directory, self.extensions)?;
        if let Some(index) = start_index.filter(|_| !list.is_empty()) {
            list.set_position(index)?;
        }
        Ok(self.reset(list))
    }

    /// Steps to the neighbor in `direction`, wrapping at both ends.
    ///
    /// Returns `None` when no directory with images is open.
    pub fn navigate(&mut self, direction: Direction) -> Option<View<L::Handle>> {
        if self.list.advance(direction).is_err() {
            trace!("Ignoring navigation on an empty list");
            return None;
        }
        let pending = &self.pending;
        let report = self.cache.step_except(
            &self.list,
            self.radius.value(),
            direction,
            self.loader.as_ref(),
            |path| pending.is_loading(path),
        );
        self.show(report.failures)
    }

    pub fn next(&mut self) -> Option<View<L::Handle>> {
        self.navigate(Direction::Forward)
    }

    pub fn previous(&mut self) -> Option<View<L::Handle>> {
        self.navigate(Direction::Backward)
    }

    /// Steps without decoding anything.
    ///
    /// The image leaving the window is released; missing neighbors, the
    /// current one included, are left to [`request_prefetch`](Self::request_prefetch).
    pub fn navigate_deferred(&mut self, direction: Direction) -> Option<usize> {
        let position = self.list.advance(direction).ok()?;
        self.drop_outside_window();
        Some(position)
    }

    /// Jumps straight to `index`.
    pub fn go_to(&mut self, index: usize) -> Result<Option<View<L::Handle>>> {
        self.list.set_position(index)?;
        self.drop_outside_window();
        let report = self.refill_window();
        Ok(self.show(report.failures))
    }

    /// Removes `path` from the list and the cache, e.g. after the file was
    /// deleted or moved elsewhere.
    ///
    /// When `path` is the current image the cursor first moves on to the
    /// following one, so the viewer never points at a file that is gone.
    pub fn forget(&mut self, path: &Path) -> Result<Option<View<L::Handle>>> {
        self.list.index_of(path)?;
        if self.list.current() == Some(path) && self.list.len() > 1 {
            self.list.advance(Direction::Forward)?;
        }
        self.list.remove(path)?;
        self.cache.remove(path);
        self.pending.cancel(path);

        self.drop_outside_window();
        let report = self.refill_window();
        Ok(self.show(report.failures))
    }

    /// Deletes the current file and shows the one after it.
    pub fn delete_current(&mut self) -> Result<Option<View<L::Handle>>> {
        let path = self.current_path().ok_or(Error::Empty)?;
        file_ops::delete_file(&path)?;
        self.forget(&path)
    }

    /// Moves the current file into `dest_dir` and shows the one after it.
    ///
    /// Returns where the file ended up.
    pub fn move_current(&mut self, dest_dir: &Path) -> Result<(PathBuf, Option<View<L::Handle>>)> {
        let path = self.current_path().ok_or(Error::Empty)?;
        let target = file_ops::move_file(&path, dest_dir)?;
        let view = self.forget(&path)?;
        Ok((target, view))
    }

    pub fn rotate_left(&mut self) -> Option<View<L::Handle>> {
        self.rotation = self.rotation.rotate_left();
        self.current_view()
    }

    pub fn rotate_right(&mut self) -> Option<View<L::Handle>> {
        self.rotation = self.rotation.rotate_right();
        self.current_view()
    }

    pub fn rotation(&self) -> RotationAngle {
        self.rotation
    }

    /// The current image, decoding it if it is not resident.
    pub fn current_view(&mut self) -> Option<View<L::Handle>> {
        self.show(Vec::new())
    }

    /// The current image if it is already resident.
    pub fn cached_current(&self) -> Option<Arc<L::Handle>> {
        self.list.current().and_then(|path| self.cache.peek(path))
    }

    /// Claims every window path that is neither resident nor already being
    /// decoded. Each ticket should be fed to
    /// [`load_in_background`](crate::prefetch::load_in_background) and its
    /// result handed back through [`accept_loaded`](Self::accept_loaded).
    pub fn request_prefetch(&mut self) -> Vec<LoadTicket> {
        let mut tickets = Vec::new();
        for index in self.list.window_indices(self.radius.value()) {
            let Some(path) = self.list.get(index) else {
                continue;
            };
            if self.cache.has(path) {
                continue;
            }
            if let Some(ticket) = self.pending.begin(path) {
                tickets.push(ticket);
            }
        }
        tickets
    }

    /// Takes back a background decode.
    ///
    /// The result is inserted only if its ticket is current and its path is
    /// still inside the window. Everything else is dropped.
    pub fn accept_loaded(&mut self, ticket: LoadTicket, result: Result<L::Handle>) -> AcceptOutcome {
        let path = ticket.path();
        if !self.pending.finish(&ticket) {
            debug!(?path, generation = ticket.generation(), "Discarding stale decode");
            return AcceptOutcome::Stale;
        }
        if !self.list.window_contains(path, self.radius.value()) {
            debug!(?path, "Discarding decode that left the window");
            return AcceptOutcome::Stale;
        }
        if self.cache.has(path) {
            debug!(?path, "Discarding decode of an already resident image");
            return AcceptOutcome::Stale;
        }

        match result {
            Ok(handle) => {
                self.cache.put(path.to_path_buf(), handle);
                AcceptOutcome::Inserted
            }
            Err(error) => {
                warn!(?path, %error, "Background decode failed");
                AcceptOutcome::Failed(LoadFailure {
                    path: path.to_path_buf(),
                    error,
                })
            }
        }
    }

    pub fn info(&self) -> NavigationInfo {
        NavigationInfo {
            current_index: self.list.position(),
            total_count: self.list.len(),
            at_first: self.list.is_at_first(),
            at_last: self.list.is_at_last(),
            resident: self.cache.len(),
        }
    }

    pub fn list(&self) -> &ImageList {
        &self.list
    }

    pub fn cache(&self) -> &NeighborCache<L::Handle> {
        &self.cache
    }

    pub fn radius(&self) -> CacheRadius {
        self.radius
    }

    pub fn loader(&self) -> &Arc<L> {
        &self.loader
    }

    fn current_path(&self) -> Option<PathBuf> {
        self.list.current().map(Path::to_path_buf)
    }

    fn reset(&mut self, list: ImageList) -> Option<View<L::Handle>> {
        self.pending.invalidate();
        self.cache.clear();
        self.list = list;
        let report = self
            .cache
            .warm(&self.list, self.radius.value(), self.loader.as_ref());
        self.show(report.failures)
    }

    /// Loads missing window paths, leaving background decodes in flight alone.
    fn refill_window(&mut self) -> WarmReport {
        let pending = &self.pending;
        self.cache.refill_except(
            &self.list,
            self.radius.value(),
            self.loader.as_ref(),
            |path| pending.is_loading(path),
        )
    }

    fn drop_outside_window(&mut self) {
        let radius = self.radius.value();
        let list = &self.list;
        self.cache.retain(|path| list.window_contains(path, radius));
    }

    fn show(&mut self, failures: Vec<LoadFailure>) -> Option<View<L::Handle>> {
        let path = self.current_path()?;
        let index = self.list.position()?;
        if self.pending.is_loading(&path) && !self.cache.has(&path) {
            // Needed now: decode here and let the background result go stale.
            self.pending.cancel(&path);
        }
        let image = self.cache.fetch(&path, self.loader.as_ref());
        if let Err(error) = &image {
            warn!(?path, %error, "Failed to load current image");
        }
        Some(View {
            path,
            index,
            image,
            rotation: self.rotation,
            failures,
        })
    }
}

impl<L> ImageNavigator<L>
where
    L: ImageLoader,
    L::Handle: Dimensions,
{
    /// `"<file name> | <w>x<h> | <i>/<n>"`, the size left out while the
    /// current image is not resident.
    pub fn status_text(&self) -> Option<String> {
        let path = self.list.current()?;
        let index = self.list.position()?;
        let name = path.file_name()?.to_string_lossy();
        let count = self.list.len();

        match self.cached_current() {
            Some(handle) => {
                let (mut width, mut height) = handle.dimensions();
                if self.rotation.degrees() % 180 == 90 {
                    std::mem::swap(&mut width, &mut height);
                }
                Some(format!("{name} | {width}x{height} | {}/{count}", index + 1))
            }
            None => Some(format!("{name} | {}/{count}", index + 1)),
        }
    }
}

impl<L: ImageLoader> std::fmt::Debug for ImageNavigator<L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageNavigator")
            .field("list", &self.list)
            .field("cache", &self.cache)
            .field("radius", &self.radius)
            .field("pending", &self.pending)
            .field("rotation", &self.rotation)
            .finish_non_exhaustive()
    }
}
