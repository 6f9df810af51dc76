//! # Grid Mathematics
//!
//! Positions, rectangles and grid snapping in canvas units.
//!
//! Every coordinate the generator emits is a canvas coordinate that sits on
//! a multiple of the grid size (or half of it, for door midpoints). Renderers
//! that prefer whole cells can convert with [`Rect::to_cells`].

use serde::{Deserialize, Serialize};

/// A 2D point on the canvas.
///
/// # Examples
///
/// ```
/// use delver::Position;
///
/// let pos = Position::new(30, 60);
/// assert_eq!(pos.manhattan_distance(Position::new(0, 0)), 90);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Manhattan distance to another position.
    pub fn manhattan_distance(self, other: Position) -> u32 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as u32
    }
}

/// An axis-aligned bounding box with its origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Creates a new rectangle.
    ///
    /// # Examples
    ///
    /// ```
    /// use delver::Rect;
    ///
    /// let rect = Rect::new(30, 30, 90, 90);
    /// assert_eq!(rect.right(), 120);
    /// assert_eq!(rect.bottom(), 120);
    /// ```
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Gets the center of the rectangle, rounded toward the top-left.
    pub fn center(&self) -> Position {
        Position::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Checks whether `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Checks if this rectangle overlaps with another one.
    ///
    /// Rectangles that only share an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.x >= other.right()
            || other.x >= self.right()
            || self.y >= other.bottom()
            || other.y >= self.bottom())
    }

    /// Shrinks the rectangle by `margin` on every side.
    pub fn inset(&self, margin: i32) -> Rect {
        Rect::new(
            self.x + margin,
            self.y + margin,
            self.width - 2 * margin,
            self.height - 2 * margin,
        )
    }

    /// Converts a canvas rectangle to whole grid cells.
    pub fn to_cells(&self, grid_size: i32) -> Rect {
        Rect::new(
            self.x / grid_size,
            self.y / grid_size,
            self.width / grid_size,
            self.height / grid_size,
        )
    }
}

/// Snaps a value down to the nearest multiple of `grid_size`.
///
/// # Examples
///
/// ```
/// use delver::snap_to_grid;
///
/// assert_eq!(snap_to_grid(400, 30), 390);
/// assert_eq!(snap_to_grid(300, 30), 300);
/// ```
pub fn snap_to_grid(value: i32, grid_size: i32) -> i32 {
    value.div_euclid(grid_size) * grid_size
}
