// SPDX-License-Identifier: MPL-2.0
//! Directory scanner module for finding and ordering image files.
//!
//! This module scans a directory for supported image formats, filters them by
//! extension, and sorts them in natural order ("img2" before "img10"). The
//! resulting [`ImageList`] is navigated circularly.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// Step direction through an [`ImageList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Signed index offset of one step.
    pub fn offset(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

/// Naturally sorted list of image paths with a circular cursor.
///
/// `position` is `None` exactly when the list is empty; otherwise it is a
/// valid index into `image_files`. The list is rebuilt wholesale when a new
/// directory is opened and only shrinks in place (delete/move).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImageList {
    image_files: Vec<PathBuf>,
    position: Option<usize>,
}

impl ImageList {
    /// Creates a new empty ImageList.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from explicit paths, dropping duplicates and sorting naturally.
    /// The cursor starts on the first path.
    pub fn from_paths<I>(paths: I) -> Self
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let mut image_files: Vec<PathBuf> = paths.into_iter().collect();
        sort_naturally(&mut image_files);
        image_files.dedup();

        let position = if image_files.is_empty() { None } else { Some(0) };
        Self {
            image_files,
            position,
        }
    }

    /// Lists `directory` for files whose extension (ignoring case) is in
    /// `extensions`, sorted naturally. The cursor starts on the first file.
    ///
    /// Returns [`Error::DirectoryAccess`] if the directory cannot be listed. No
    /// partially scanned list is ever returned.
    pub fn rebuild(directory: &Path, extensions: &[&str]) -> Result<Self> {
        let directory = std::path::absolute(directory).map_err(|e| directory_error(directory, &e))?;
        let entries = std::fs::read_dir(&directory).map_err(|e| directory_error(&directory, &e))?;

        let mut image_files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| directory_error(&directory, &e))?;
            let path = entry.path();

            if path.is_file() && has_extension(&path, extensions) {
                image_files.push(path);
            }
        }

        let list = Self::from_paths(image_files);
        tracing::debug!(?directory, count = list.len(), "Rebuilt image list");
        Ok(list)
    }

    /// Rebuilds from the directory containing `file` and positions the cursor on it.
    ///
    /// Returns [`Error::NotFound`] if `file` is not a matching image of that directory.
    pub fn scan_for_file(file: &Path, extensions: &[&str]) -> Result<Self> {
        let file = std::path::absolute(file).map_err(|e| directory_error(file, &e))?;
        let parent = file
            .parent()
            .ok_or_else(|| Error::DirectoryAccess(format!("{}: no parent directory", file.display())))?;

        let mut list = Self::rebuild(parent, extensions)?;
        let index = list.index_of(&file)?;
        list.position = Some(index);
        Ok(list)
    }

    /// Returns the index of `path`.
    ///
    /// A miss means the caller holds a stale path and should rebuild.
    pub fn index_of(&self, path: &Path) -> Result<usize> {
        self.image_files
            .iter()
            .position(|p| p == path)
            .ok_or_else(|| Error::NotFound(path.to_path_buf()))
    }

    /// Moves the cursor one step, wrapping at both ends, and returns the new position.
    pub fn advance(&mut self, direction: Direction) -> Result<usize> {
        let next = self.offset_index(direction.offset()).ok_or(Error::Empty)?;
        self.position = Some(next);
        Ok(next)
    }

    /// Removes `path` from the list and returns the index it occupied.
    ///
    /// The cursor keeps pointing at the same image when an earlier entry is
    /// removed. When the current entry itself is removed the cursor stays on the
    /// same slot (now the following image) or wraps to 0 if it was the last.
    /// Callers that remove the image being viewed should `advance` first so the
    /// displayed index does not jump.
    pub fn remove(&mut self, path: &Path) -> Result<usize> {
        let index = self.index_of(path)?;
        self.image_files.remove(index);

        self.position = match self.position {
            _ if self.image_files.is_empty() => None,
            Some(pos) if index < pos => Some(pos - 1),
            Some(pos) if pos >= self.image_files.len() => Some(0),
            other => other,
        };
        Ok(index)
    }

    /// Indices `radius` steps behind and ahead of the cursor.
    ///
    /// Returns `None` when the whole list fits in the `2 * radius + 1` window,
    /// in which case nothing ever needs to be evicted while navigating.
    pub fn window_edges(&self, radius: usize) -> Option<(usize, usize)> {
        if self.image_files.len() <= radius.saturating_mul(2).saturating_add(1) {
            return None;
        }
        let radius = radius as isize;
        Some((self.offset_index(-radius)?, self.offset_index(radius)?))
    }

    /// Index `offset` steps away from the cursor, wrapping circularly.
    pub fn offset_index(&self, offset: isize) -> Option<usize> {
        let position = self.position?;
        let len = self.image_files.len() as isize;
        Some((position as isize + offset).rem_euclid(len) as usize)
    }

    /// Indices of the window around the cursor in warm-up order: the cursor
    /// and the `radius` images ahead of it first, then the `radius` images
    /// behind it from farthest to nearest. Small lists yield every index once.
    pub fn window_indices(&self, radius: usize) -> Vec<usize> {
        if self.position.is_none() {
            return Vec::new();
        }
        if self.window_edges(radius).is_none() {
            let mut indices: Vec<usize> = Vec::with_capacity(self.image_files.len());
            for offset in window_offsets(self.image_files.len()) {
                if let Some(index) = self.offset_index(offset) {
                    if !indices.contains(&index) {
                        indices.push(index);
                    }
                }
            }
            return indices;
        }

        window_offsets(radius)
            .filter_map(|offset| self.offset_index(offset))
            .collect()
    }

    /// Whether `path` lies inside the window of `radius` around the cursor.
    pub fn window_contains(&self, path: &Path, radius: usize) -> bool {
        self.window_indices(radius)
            .into_iter()
            .any(|index| self.image_files[index] == path)
    }

    /// Returns the current image path.
    pub fn current(&self) -> Option<&Path> {
        self.position
            .and_then(|idx| self.image_files.get(idx))
            .map(|p| p.as_path())
    }

    /// Returns the current index if set.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Sets the cursor directly. Out-of-range indices are rejected.
    pub fn set_position(&mut self, index: usize) -> Result<()> {
        if self.image_files.is_empty() {
            return Err(Error::Empty);
        }
        if index >= self.image_files.len() {
            return Err(Error::NotFound(PathBuf::from(format!("#{index}"))));
        }
        self.position = Some(index);
        Ok(())
    }

    /// Returns the path at the specified index.
    pub fn get(&self, index: usize) -> Option<&Path> {
        self.image_files.get(index).map(|p| p.as_path())
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.image_files
    }

    /// Returns the total number of images in the list.
    pub fn len(&self) -> usize {
        self.image_files.len()
    }

    /// Checks if the image list is empty.
    pub fn is_empty(&self) -> bool {
        self.image_files.is_empty()
    }

    /// Checks if we're at the first image (used for boundary indication).
    pub fn is_at_first(&self) -> bool {
        matches!(self.position, Some(0))
    }

    /// Checks if we're at the last image (used for boundary indication).
    pub fn is_at_last(&self) -> bool {
        matches!(self.position, Some(idx) if idx + 1 == self.image_files.len())
    }
}

/// Offsets `0..=radius` followed by `-radius..=-1`.
fn window_offsets(radius: usize) -> impl Iterator<Item = isize> {
    let radius = radius as isize;
    (0..=radius).chain(-radius..0)
}

fn directory_error(directory: &Path, err: &std::io::Error) -> Error {
    Error::DirectoryAccess(format!("{}: {}", directory.display(), err))
}

/// Checks the extension of `path` against `extensions`, ignoring ASCII case.
pub fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|allowed| allowed.eq_ignore_ascii_case(ext)))
}

/// Natural ordering of file names: digit runs compare by value.
///
/// Case is ignored first, then used as a tie-breaker, and full paths settle
/// anything left so the order is total.
pub fn natural_cmp(a: &Path, b: &Path) -> Ordering {
    let a_name = a.file_name().unwrap_or(a.as_os_str()).to_string_lossy();
    let b_name = b.file_name().unwrap_or(b.as_os_str()).to_string_lossy();

    natord::compare_ignore_case(&a_name, &b_name)
        .then_with(|| natord::compare(&a_name, &b_name))
        .then_with(|| a.cmp(b))
}

fn sort_naturally(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| natural_cmp(a, b));
}
