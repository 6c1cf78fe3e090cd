//! Drawing surface abstraction.
//!
//! [`Surface`] is the seam between the algorithms and whatever actually
//! presents pixels: pixel get/set with the crate bounds policy, rectangular
//! buffer hand-off, polyline stroking, rect filling, and clearing.
//! [`MemorySurface`] is the in-memory implementation every demo and test
//! runs against; a windowing front end wraps one and blits its buffer.

use crate::basics::{iround, PointD};
use crate::color::Rgba8;
use crate::line_raster::rasterize_bresenham;
use crate::raster_buffer::RasterBuffer;

// ============================================================================
// StrokeStyle
// ============================================================================

/// Styling for polyline strokes.
#[derive(Debug, Clone, Copy)]
pub struct StrokeStyle {
    pub color: Rgba8,
    /// Stroke the implied edge from the last point back to the first.
    pub close: bool,
}

impl StrokeStyle {
    pub fn new(color: Rgba8) -> Self {
        Self {
            color,
            close: false,
        }
    }

    pub fn closed(color: Rgba8) -> Self {
        Self { color, close: true }
    }
}

// ============================================================================
// Surface
// ============================================================================

/// A pixel surface the algorithms draw on.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Color at (x, y), or `None` outside the surface.
    fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba8>;

    /// Write a pixel; out-of-bounds writes are ignored.
    fn set_pixel(&mut self, x: i32, y: i32, c: Rgba8);

    /// Copy a region out of the surface into a caller-owned buffer.
    fn read_buffer(&self, x: i32, y: i32, w: u32, h: u32) -> RasterBuffer;

    /// Blit a buffer back onto the surface at (x, y).
    fn write_buffer(&mut self, buf: &RasterBuffer, x: i32, y: i32);

    /// Stroke straight 1-px segments between consecutive points.
    fn stroke_polyline(&mut self, points: &[PointD], style: &StrokeStyle);

    /// Fill a w×h rectangle with its top-left at (x, y).
    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, c: Rgba8);

    /// Reset the whole surface to fully transparent.
    fn clear(&mut self);
}

// ============================================================================
// MemorySurface
// ============================================================================

/// In-memory surface backed by an owned [`RasterBuffer`].
#[derive(Debug, Clone)]
pub struct MemorySurface {
    buf: RasterBuffer,
}

impl MemorySurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buf: RasterBuffer::new(width, height),
        }
    }

    /// The backing buffer (e.g. for presentation or pixel assertions).
    pub fn buffer(&self) -> &RasterBuffer {
        &self.buf
    }

    pub fn into_buffer(self) -> RasterBuffer {
        self.buf
    }
}

impl Surface for MemorySurface {
    fn width(&self) -> u32 {
        self.buf.width()
    }

    fn height(&self) -> u32 {
        self.buf.height()
    }

    fn get_pixel(&self, x: i32, y: i32) -> Option<Rgba8> {
        self.buf.get(x, y)
    }

    fn set_pixel(&mut self, x: i32, y: i32, c: Rgba8) {
        self.buf.set(x, y, c);
    }

    fn read_buffer(&self, x: i32, y: i32, w: u32, h: u32) -> RasterBuffer {
        self.buf.read_rect(x, y, w, h)
    }

    fn write_buffer(&mut self, buf: &RasterBuffer, x: i32, y: i32) {
        self.buf.write_rect(buf, x, y);
    }

    fn stroke_polyline(&mut self, points: &[PointD], style: &StrokeStyle) {
        if points.is_empty() {
            return;
        }
        let mut stroke_edge = |a: &PointD, b: &PointD| {
            let a = crate::basics::PointI::new(iround(a.x), iround(a.y));
            let b = crate::basics::PointI::new(iround(b.x), iround(b.y));
            for p in rasterize_bresenham(a, b) {
                self.buf.set(p.x, p.y, style.color);
            }
        };
        for pair in points.windows(2) {
            stroke_edge(&pair[0], &pair[1]);
        }
        if style.close && points.len() > 1 {
            stroke_edge(&points[points.len() - 1], &points[0]);
        }
    }

    fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, c: Rgba8) {
        for dy in 0..h as i32 {
            for dx in 0..w as i32 {
                self.buf.set(x + dx, y + dy, c);
            }
        }
    }

    fn clear(&mut self) {
        self.buf.clear();
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_policy_matches_buffer() {
        let mut s = MemorySurface::new(8, 8);
        s.set_pixel(3, 4, Rgba8::WHITE);
        assert_eq!(s.get_pixel(3, 4), Some(Rgba8::WHITE));
        assert_eq!(s.get_pixel(8, 0), None);
        s.set_pixel(-1, -1, Rgba8::WHITE); // ignored
        assert_eq!(s.get_pixel(0, 0), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut s = MemorySurface::new(4, 4);
        s.fill_rect(2, 2, 10, 10, Rgba8::BLACK);
        assert_eq!(s.get_pixel(2, 2), Some(Rgba8::BLACK));
        assert_eq!(s.get_pixel(3, 3), Some(Rgba8::BLACK));
        assert_eq!(s.get_pixel(1, 1), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_stroke_open_polyline() {
        let mut s = MemorySurface::new(10, 10);
        let pts = [
            PointD::new(0.0, 0.0),
            PointD::new(4.0, 0.0),
            PointD::new(4.0, 4.0),
        ];
        s.stroke_polyline(&pts, &StrokeStyle::new(Rgba8::WHITE));
        for x in 0..=4 {
            assert_eq!(s.get_pixel(x, 0), Some(Rgba8::WHITE));
        }
        for y in 0..=4 {
            assert_eq!(s.get_pixel(4, y), Some(Rgba8::WHITE));
        }
        // Open polyline: the closing edge is not drawn.
        assert_eq!(s.get_pixel(2, 2), Some(Rgba8::TRANSPARENT));
    }

    #[test]
    fn test_stroke_closed_polyline() {
        let mut s = MemorySurface::new(10, 10);
        let pts = [
            PointD::new(1.0, 1.0),
            PointD::new(7.0, 1.0),
            PointD::new(7.0, 7.0),
            PointD::new(1.0, 7.0),
        ];
        s.stroke_polyline(&pts, &StrokeStyle::closed(Rgba8::BLACK));
        // Left edge comes from the closing segment.
        for y in 1..=7 {
            assert_eq!(s.get_pixel(1, y), Some(Rgba8::BLACK));
        }
    }

    #[test]
    fn test_buffer_roundtrip() {
        let mut s = MemorySurface::new(6, 6);
        s.fill_rect(0, 0, 6, 6, Rgba8::WHITE);
        let region = s.read_buffer(1, 1, 3, 3);
        assert_eq!(region.get(0, 0), Some(Rgba8::WHITE));
        let mut blank = RasterBuffer::new(2, 2);
        blank.fill(Rgba8::BLACK);
        s.write_buffer(&blank, 4, 4);
        assert_eq!(s.get_pixel(4, 4), Some(Rgba8::BLACK));
        assert_eq!(s.get_pixel(5, 5), Some(Rgba8::BLACK));
        assert_eq!(s.get_pixel(3, 3), Some(Rgba8::WHITE));
    }
}
