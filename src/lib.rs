// SPDX-License-Identifier: MPL-2.0
//! `simple_viewer` is the core of a minimal image viewer.
//!
//! It keeps a naturally ordered list of the images in a directory and a
//! bounded cache of decoded neighbors around the current image, so stepping
//! forward or backward shows the next picture without waiting on a decode.
//! Window chrome and rendering live outside this crate.

pub mod cache;
pub mod config;
pub mod directory_scanner;
pub mod error;
pub mod file_ops;
pub mod media;
pub mod navigation;
pub mod prefetch;

pub use cache::NeighborCache;
pub use directory_scanner::{Direction, ImageList};
pub use error::{Error, Result};
pub use navigation::{ImageNavigator, View};
