// SPDX-License-Identifier: MPL-2.0
//! Rotation angle domain type.

/// Clockwise rotation in quarter turns, always one of 0°, 90°, 180° or 270°.
///
/// ```
/// use simple_viewer::media::RotationAngle;
///
/// let angle = RotationAngle::default().rotate_left();
/// assert_eq!(angle.degrees(), 270);
/// assert_eq!(angle.rotate_right().degrees(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationAngle(u16);

impl RotationAngle {
    /// Normalizes any multiple of 90 (negative values turn counter-clockwise).
    /// Other values are rounded down to the previous quarter turn.
    pub fn from_degrees(degrees: i32) -> Self {
        let quarter_turns = degrees.div_euclid(90).rem_euclid(4);
        Self((quarter_turns * 90) as u16)
    }

    pub fn degrees(self) -> u16 {
        self.0
    }

    #[must_use]
    pub fn rotate_right(self) -> Self {
        Self((self.0 + 90) % 360)
    }

    #[must_use]
    pub fn rotate_left(self) -> Self {
        Self((self.0 + 270) % 360)
    }

    pub fn is_identity(self) -> bool {
        self.0 == 0
    }
}
