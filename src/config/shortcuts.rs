// SPDX-License-Identifier: MPL-2.0
//! Keyboard shortcut table.
//!
//! Key names are plain strings ("Left", "R", "Escape") so the table can be
//! edited in `settings.toml` and matched against whatever key event source the
//! front-end uses.

use serde::{Deserialize, Serialize};

/// User-triggerable viewer actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Open,
    Previous,
    Next,
    RotateLeft,
    RotateRight,
    ToggleFullscreen,
    ExitFullscreen,
    Delete,
    MoveFile,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcuts {
    pub open: String,
    pub previous: String,
    pub next: String,
    pub rotate_left: String,
    pub rotate_right: String,
    pub toggle_fullscreen: String,
    pub exit_fullscreen: String,
    pub delete: String,
    pub move_file: String,
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            open: "O".into(),
            previous: "Left".into(),
            next: "Right".into(),
            rotate_left: "L".into(),
            rotate_right: "R".into(),
            toggle_fullscreen: "F".into(),
            exit_fullscreen: "Escape".into(),
            delete: "Delete".into(),
            move_file: "M".into(),
        }
    }
}

impl Shortcuts {
    fn bindings(&self) -> [(&str, Action); 9] {
        [
            (self.open.as_str(), Action::Open),
            (self.previous.as_str(), Action::Previous),
            (self.next.as_str(), Action::Next),
            (self.rotate_left.as_str(), Action::RotateLeft),
            (self.rotate_right.as_str(), Action::RotateRight),
            (self.toggle_fullscreen.as_str(), Action::ToggleFullscreen),
            (self.exit_fullscreen.as_str(), Action::ExitFullscreen),
            (self.delete.as_str(), Action::Delete),
            (self.move_file.as_str(), Action::MoveFile),
        ]
    }

    /// Resolves a key name to its action, ignoring ASCII case.
    ///
    /// When two actions share a key the first one in declaration order wins.
    pub fn action_for(&self, key: &str) -> Option<Action> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        self.bindings()
            .into_iter()
            .find(|(bound, _)| bound.eq_ignore_ascii_case(key))
            .map(|(_, action)| action)
    }

    /// Returns the key bound to `action`.
    pub fn key_for(&self, action: Action) -> &str {
        self.bindings()
            .into_iter()
            .find(|(_, bound)| *bound == action)
            .map(|(key, _)| key)
            .unwrap_or_default()
    }
}
