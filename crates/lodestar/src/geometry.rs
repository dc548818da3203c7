//! Geometric primitives used by the layout engine.

/// A point in the 2-D layout plane.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Position {
    x: f64,
    y: f64,
}

impl Position {
    /// Creates a new position with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate
    pub fn y(self) -> f64 {
        self.y
    }

    /// Adds another position component-wise
    pub fn add_point(self, other: Position) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Subtracts another position component-wise
    pub fn sub_point(self, other: Position) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Multiplies both coordinates by `factor`
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor)
    }

    /// Euclidean length of the vector from the origin to this position
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns true if both coordinates are finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
