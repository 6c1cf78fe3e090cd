//! Foundation types: rounding helpers, points, rectangles, and the
//! cooperative cancellation token shared by the animated algorithms.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// ============================================================================
// Rounding and conversion functions
// ============================================================================

/// Round a double to the nearest integer (round half away from zero).
#[inline]
pub fn iround(v: f64) -> i32 {
    if v < 0.0 {
        (v - 0.5) as i32
    } else {
        (v + 0.5) as i32
    }
}

/// Floor a double to the nearest integer toward negative infinity.
#[inline]
pub fn ifloor(v: f64) -> i32 {
    let i = v as i32;
    i - (i as f64 > v) as i32
}

/// Ceiling of a double as a signed integer.
#[inline]
pub fn iceil(v: f64) -> i32 {
    v.ceil() as i32
}

// ============================================================================
// Point
// ============================================================================

/// A 2D point with generic coordinate type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointBase<T: Copy> {
    pub x: T,
    pub y: T,
}

impl<T: Copy> PointBase<T> {
    pub fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

/// Point with `i32` coordinates.
pub type PointI = PointBase<i32>;
/// Point with `f64` coordinates.
pub type PointD = PointBase<f64>;

impl PointD {
    /// Euclidean distance to another point.
    pub fn distance(&self, other: &PointD) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// ============================================================================
// Rect
// ============================================================================

/// A rectangle defined by two corner points, `(x1, y1)` the minimum corner
/// and `(x2, y2)` the maximum corner once normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T: Copy> {
    pub x1: T,
    pub y1: T,
    pub x2: T,
    pub y2: T,
}

impl<T: Copy + PartialOrd> Rect<T> {
    pub fn new(x1: T, y1: T, x2: T, y2: T) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Normalize so that x1 <= x2 and y1 <= y2, swapping if needed.
    pub fn normalize(&mut self) -> &Self {
        if self.x1 > self.x2 {
            core::mem::swap(&mut self.x1, &mut self.x2);
        }
        if self.y1 > self.y2 {
            core::mem::swap(&mut self.y1, &mut self.y2);
        }
        self
    }

    /// Returns `true` if the rectangle is valid (non-empty).
    pub fn is_valid(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    /// Returns `true` if the point (x, y) is inside the rectangle.
    pub fn hit_test(&self, x: T, y: T) -> bool {
        x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
    }
}

/// Rectangle with `i32` coordinates.
pub type RectI = Rect<i32>;
/// Rectangle with `f64` coordinates.
pub type RectD = Rect<f64>;

// ============================================================================
// CancelToken
// ============================================================================

/// Cooperative stop signal for animated algorithms.
///
/// Cloning yields another handle to the same flag. The animated fills check
/// the token at every suspension point and stop cleanly, leaving the buffer
/// in a valid (partially filled) state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. All clones observe the change.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iround_ties_away_from_zero() {
        assert_eq!(iround(0.5), 1);
        assert_eq!(iround(-0.5), -1);
        assert_eq!(iround(2.4), 2);
        assert_eq!(iround(2.6), 3);
        assert_eq!(iround(-2.4), -2);
        assert_eq!(iround(-2.6), -3);
    }

    #[test]
    fn test_ifloor_negative() {
        assert_eq!(ifloor(1.9), 1);
        assert_eq!(ifloor(-0.1), -1);
        assert_eq!(ifloor(-2.0), -2);
    }

    #[test]
    fn test_iceil() {
        assert_eq!(iceil(1.1), 2);
        assert_eq!(iceil(3.0), 3);
        assert_eq!(iceil(-1.5), -1);
    }

    #[test]
    fn test_rect_normalize() {
        let mut r = Rect::new(10, 20, 2, 4);
        r.normalize();
        assert_eq!(r, Rect::new(2, 4, 10, 20));
        assert!(r.is_valid());
    }

    #[test]
    fn test_rect_hit_test() {
        let r = RectD::new(10.0, 10.0, 100.0, 100.0);
        assert!(r.hit_test(10.0, 10.0));
        assert!(r.hit_test(55.0, 99.0));
        assert!(!r.hit_test(9.9, 55.0));
        assert!(!r.hit_test(55.0, 100.1));
    }

    #[test]
    fn test_point_distance() {
        let a = PointD::new(0.0, 0.0);
        let b = PointD::new(3.0, 4.0);
        assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_cancel_token_shared_flag() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }
}
