//! Toroidal world extents and plate rectangles inside them.
//!
//! All wrap-around arithmetic lives here. Plates, the segmenter and the
//! erosion pass ask these types instead of doing their own modulo math.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building world geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    #[error("World dimensions must be positive, got {0}x{1}")]
    ZeroSized(usize, usize),
}

/// Fixed size of the toroidal world all plates move in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldDimension {
    width: usize,
    height: usize,
}

impl WorldDimension {
    pub fn new(width: usize, height: usize) -> Result<Self, WorldError> {
        if width == 0 || height == 0 {
            return Err(WorldError::ZeroSized(width, height));
        }
        Ok(Self { width, height })
    }

    /// A square world, the usual shape for generated maps.
    pub fn square(side: usize) -> Result<Self, WorldError> {
        Self::new(side, side)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Mean side length, rounded down.
    pub fn average_side(&self) -> usize {
        (self.width + self.height) / 2
    }

    #[inline]
    pub fn wrap_x(&self, x: usize) -> usize {
        x % self.width
    }

    #[inline]
    pub fn wrap_y(&self, y: usize) -> usize {
        y % self.height
    }

    /// Wraps a point into `[0, width) × [0, height)`.
    pub fn normalize(&self, x: usize, y: usize) -> (usize, usize) {
        (self.wrap_x(x), self.wrap_y(y))
    }

    /// Wraps a fractional horizontal position into `[0, width)`.
    pub fn wrap_position_x(&self, x: f32) -> f32 {
        wrap_f32(x, self.width as f32)
    }

    /// Wraps a fractional vertical position into `[0, height)`.
    pub fn wrap_position_y(&self, y: f32) -> f32 {
        wrap_f32(y, self.height as f32)
    }

    /// True if a fractional position lies inside the world.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && x < self.width as f32 && y >= 0.0 && y < self.height as f32
    }

    /// True if a plate of this width covers the whole world horizontally.
    pub fn spans_width(&self, width: usize) -> bool {
        width == self.width
    }

    /// True if a plate of this height covers the whole world vertically.
    pub fn spans_height(&self, height: usize) -> bool {
        height == self.height
    }

    /// Which edges of a `width × height` plate grid connect to each other.
    pub fn edge_wrap(&self, width: usize, height: usize) -> EdgeWrap {
        EdgeWrap {
            horizontal: self.spans_width(width),
            vertical: self.spans_height(height),
        }
    }

    /// Offset of world coordinate `x` from a horizontal span starting at
    /// `origin` with length `extent`, or `None` if `x` is not covered.
    fn offset_x(&self, origin: usize, extent: usize, x: usize) -> Option<usize> {
        offset_in(origin, extent, self.wrap_x(x), self.width)
    }

    fn offset_y(&self, origin: usize, extent: usize, y: usize) -> Option<usize> {
        offset_in(origin, extent, self.wrap_y(y), self.height)
    }
}

fn offset_in(origin: usize, extent: usize, coord: usize, period: usize) -> Option<usize> {
    let unwrapped = if coord < origin { coord + period } else { coord };
    let offset = unwrapped - origin;
    (offset < extent).then_some(offset)
}

fn wrap_f32(value: f32, period: f32) -> f32 {
    let wrapped = value.rem_euclid(period);
    // rem_euclid can round up to `period` for tiny negative inputs.
    if wrapped >= period {
        0.0
    } else {
        wrapped
    }
}

/// Whether a plate grid's opposite edges are neighbours.
///
/// Only plates as wide (or tall) as the world wrap; smaller plates have hard
/// edges in local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeWrap {
    pub horizontal: bool,
    pub vertical: bool,
}

impl EdgeWrap {
    /// Column west of `x`, if any.
    pub fn west(&self, x: usize, width: usize) -> Option<usize> {
        step_back(x, width, self.horizontal)
    }

    /// Column east of `x`, if any.
    pub fn east(&self, x: usize, width: usize) -> Option<usize> {
        step_forward(x, width, self.horizontal)
    }

    /// Row north of `y`, if any.
    pub fn north(&self, y: usize, height: usize) -> Option<usize> {
        step_back(y, height, self.vertical)
    }

    /// Row south of `y`, if any.
    pub fn south(&self, y: usize, height: usize) -> Option<usize> {
        step_forward(y, height, self.vertical)
    }
}

fn step_back(v: usize, len: usize, wraps: bool) -> Option<usize> {
    if v > 0 {
        Some(v - 1)
    } else if wraps {
        Some(len - 1)
    } else {
        None
    }
}

fn step_forward(v: usize, len: usize, wraps: bool) -> Option<usize> {
    if v + 1 < len {
        Some(v + 1)
    } else if wraps {
        Some(0)
    } else {
        None
    }
}

/// Integer rectangle a plate's grid occupies in the world.
///
/// `left`/`top` may be anywhere in the world; the rectangle wraps across the
/// world seam when `left + width` exceeds the world width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlateRect {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl PlateRect {
    pub fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self { left, top, width, height }
    }

    /// Last covered column, unwrapped.
    pub fn right(&self) -> usize {
        self.left + self.width - 1
    }

    /// Last covered row, unwrapped.
    pub fn bottom(&self) -> usize {
        self.top + self.height - 1
    }

    /// Translates a world point into local grid coordinates.
    pub fn to_local(&self, world: &WorldDimension, x: usize, y: usize) -> Option<(usize, usize)> {
        let lx = world.offset_x(self.left, self.width, x)?;
        let ly = world.offset_y(self.top, self.height, y)?;
        Some((lx, ly))
    }

    /// True if the world point falls inside the rectangle.
    pub fn contains(&self, world: &WorldDimension, x: usize, y: usize) -> bool {
        self.to_local(world, x, y).is_some()
    }
}

impl fmt::Display for PlateRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] {}x{}", self.left, self.top, self.width, self.height)
    }
}
