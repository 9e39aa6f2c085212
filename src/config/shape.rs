//! Height/width pairs used for images, filters, steps and blocks.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A `(height, width)` pair.
///
/// In configuration files a shape may be written either as a single
/// integer `n` (meaning `n × n`) or as a two-element array `[h, w]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ShapeRepr", into = "ShapeRepr")]
pub struct Shape {
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl Shape {
    /// Creates a shape from explicit height and width.
    pub const fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Creates a square shape.
    pub const fn square(side: usize) -> Self {
        Self::new(side, side)
    }

    /// Number of cells covered (height * width).
    #[inline]
    pub fn area(&self) -> usize {
        self.height * self.width
    }

    /// Returns true if either dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// Returns true if `self` fits inside `other` on both axes.
    #[inline]
    pub fn fits_within(&self, other: Shape) -> bool {
        self.height <= other.height && self.width <= other.width
    }

    /// Returns the shape as an `(h, w)` tuple, handy for ndarray constructors.
    #[inline]
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

impl From<usize> for Shape {
    fn from(side: usize) -> Self {
        Self::square(side)
    }
}

impl From<(usize, usize)> for Shape {
    fn from((height, width): (usize, usize)) -> Self {
        Self::new(height, width)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// On-disk representation: a bare integer or a `[h, w]` pair.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ShapeRepr {
    Square(usize),
    Pair([usize; 2]),
}

impl From<ShapeRepr> for Shape {
    fn from(repr: ShapeRepr) -> Self {
        match repr {
            ShapeRepr::Square(side) => Shape::square(side),
            ShapeRepr::Pair([height, width]) => Shape::new(height, width),
        }
    }
}

impl From<Shape> for ShapeRepr {
    fn from(shape: Shape) -> Self {
        ShapeRepr::Pair([shape.height, shape.width])
    }
}
