// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Cache**: Neighbor cache radius bounds
//! - **Animation**: Frame delay fallback for animated images
//! - **Files**: Extensions recognized as images

// ==========================================================================
// Cache Defaults
// ==========================================================================

/// Default number of images kept resident on each side of the current one.
pub const DEFAULT_CACHE_RADIUS: usize = 2;

/// Maximum cache radius. Larger windows decode too much on every open.
pub const MAX_CACHE_RADIUS: usize = 16;

// ==========================================================================
// Animation Defaults
// ==========================================================================

/// Frame delay used when an animated image does not specify one (in milliseconds).
pub const DEFAULT_ANIMATION_FRAME_MS: u64 = 100;

/// Shortest frame delay honored during playback (in milliseconds).
pub const MIN_ANIMATION_FRAME_MS: u64 = 10;

// ==========================================================================
// File Defaults
// ==========================================================================

/// Extensions (lowercase) that are listed when scanning a directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(DEFAULT_CACHE_RADIUS <= MAX_CACHE_RADIUS);
    assert!(MIN_ANIMATION_FRAME_MS > 0);
    assert!(DEFAULT_ANIMATION_FRAME_MS >= MIN_ANIMATION_FRAME_MS);
};
