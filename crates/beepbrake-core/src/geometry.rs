//! Rectangles, sizes and points shared by the detection pipeline
//!
//! Integer types follow the pixel grid the cascade works on; the calibrated
//! geometry keeps the fractional values it was derived with.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer size in pixels
///
/// Signed on purpose: configuration may carry zero or negative dimensions,
/// which calibration rejects instead of the type silently hiding them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    /// True when both dimensions are strictly positive
    pub fn is_positive(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Fractional size, as produced by scaling a template
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SizeF {
    pub width: f64,
    pub height: f64,
}

impl SizeF {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Truncate to whole pixels
    pub fn to_size(&self) -> Size {
        Size::new(self.width as i32, self.height as i32)
    }
}

impl fmt::Display for SizeF {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

impl PointF {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One bounding rectangle reported by a detection call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Candidate {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Candidate {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Area of the rectangle, widened so large frames cannot overflow
    pub fn area(&self) -> i64 {
        self.size().area()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} at ({}, {})", self.width, self.height, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_area() {
        assert_eq!(Candidate::new(3, 4, 10, 12).area(), 120);
        assert_eq!(Candidate::new(0, 0, 0, 12).area(), 0);
    }

    #[test]
    fn test_area_does_not_overflow() {
        let big = Candidate::new(0, 0, i32::MAX, 2);
        assert_eq!(big.area(), i64::from(i32::MAX) * 2);
    }

    #[test]
    fn test_truncating_size() {
        assert_eq!(SizeF::new(480.9, 33.2).to_size(), Size::new(480, 33));
        assert!(!Size::new(0, 20).is_positive());
        assert!(Size::new(1, 1).is_positive());
    }
}
