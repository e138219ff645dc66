//! Points in the protocol coordinate system (PCS)

use core::fmt;

use crate::config::{X_MAX, X_MIN, Y_MAX, Y_MIN};

/// Coordinate value marking an uninitialized point and the end of a point list
pub const NULL_COORD: i8 = i8::MIN;

/// A single point in the PCS, spanning (-7, -7) to (7, 7) with (0, 0) at the
/// center of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridPoint {
    pub x: i8,
    pub y: i8,
}

impl GridPoint {
    /// Sentinel terminating a point list
    pub const NULL: Self = Self { x: NULL_COORD, y: NULL_COORD };

    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.x == NULL_COORD || self.y == NULL_COORD
    }

    #[inline]
    pub fn in_bounds(&self) -> bool {
        (X_MIN..=X_MAX).contains(&self.x) && (Y_MIN..=Y_MAX).contains(&self.y)
    }

    /// True when a valve exists at this point (odd checkerboard)
    #[inline]
    pub fn is_valve_site(&self) -> bool {
        self.in_bounds() && (i16::from(self.x) + i16::from(self.y)) % 2 != 0
    }

    /// Pack the point into a single byte, upper nibble x and lower nibble y,
    /// each offset by its axis minimum.
    #[allow(clippy::cast_sign_loss)]
    pub fn to_byte(&self) -> u8 {
        ((self.x.wrapping_sub(X_MIN) as u8) << 4) | (self.y.wrapping_sub(Y_MIN) as u8 & 0x0F)
    }

    /// Inverse of [`Self::to_byte`]. Not bounds-checked, a nibble of 15 maps to
    /// coordinate 8.
    #[allow(clippy::cast_possible_wrap)]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            x: (byte >> 4) as i8 + X_MIN,
            y: (byte & 0x0F) as i8 + Y_MIN,
        }
    }
}

impl Default for GridPoint {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for GridPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
