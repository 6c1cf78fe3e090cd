//! Line clipping against a rectangular window.
//!
//! Two algorithms over the same [`ClipResult`] contract: Cohen–Sutherland
//! (4-bit outcodes with iterative boundary clipping) and Liang–Barsky
//! (parametric interval shrinking). Each clipped segment reports its
//! visible part (0 or 1) and invisible parts (0–2); laid end to end along
//! the original parameter range they reconstruct the original span.
//!
//! ```text
//!        |        |
//!  1001  |  1000  | 1010
//!        |        |
//! -------+--------+-------- window.y2
//!        |        |
//!  0001  |  0000  | 0010
//!        |        |
//! -------+--------+-------- window.y1
//!        |        |
//!  0101  |  0100  | 0110
//!        |        |
//!   window.x1   window.x2
//! ```

use log::debug;

use crate::basics::{PointD, RectD};
use crate::color::Rgba8;
use crate::surface::{StrokeStyle, Surface};

/// Axis-aligned clip window; `(x1, y1)` is the minimum corner.
pub type ClipWindow = RectD;

// ============================================================================
// Outcodes
// ============================================================================

pub const OUTCODE_INSIDE: u8 = 0;
pub const OUTCODE_LEFT: u8 = 1;
pub const OUTCODE_RIGHT: u8 = 2;
pub const OUTCODE_BOTTOM: u8 = 4;
pub const OUTCODE_TOP: u8 = 8;

/// Compute the Cohen–Sutherland outcode for (x, y). Points exactly on a
/// boundary count as inside; only strictly-greater violates the max side.
#[inline]
pub fn outcode(x: f64, y: f64, window: &ClipWindow) -> u8 {
    let mut code = OUTCODE_INSIDE;
    if x < window.x1 {
        code |= OUTCODE_LEFT;
    } else if x > window.x2 {
        code |= OUTCODE_RIGHT;
    }
    if y < window.y1 {
        code |= OUTCODE_BOTTOM;
    } else if y > window.y2 {
        code |= OUTCODE_TOP;
    }
    code
}

// ============================================================================
// Segments and results
// ============================================================================

/// Directed line segment; endpoint order is preserved for clip reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub a: PointD,
    pub b: PointD,
}

impl LineSegment {
    pub fn new(a: PointD, b: PointD) -> Self {
        Self { a, b }
    }

    pub fn length(&self) -> f64 {
        self.a.distance(&self.b)
    }
}

/// Which clipping algorithm to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipAlgorithm {
    CohenSutherland,
    LiangBarsky,
}

/// Classification of a clipped segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    FullyVisible,
    FullyInvisible,
    Partial,
}

/// Outcome of clipping one segment: the untouched original, the visible
/// part inside the window (if any), and up to two invisible leftover parts
/// between the original endpoints and their clipped counterparts.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipResult {
    pub original: LineSegment,
    pub visible: Option<LineSegment>,
    pub invisible: Vec<LineSegment>,
}

impl ClipResult {
    pub fn visibility(&self) -> Visibility {
        match (&self.visible, self.invisible.is_empty()) {
            (None, _) => Visibility::FullyInvisible,
            (Some(_), true) => Visibility::FullyVisible,
            (Some(_), false) => Visibility::Partial,
        }
    }
}

// ============================================================================
// Cohen–Sutherland
// ============================================================================

fn cohen_sutherland(segment: &LineSegment, window: &ClipWindow) -> ClipResult {
    let (mut x0, mut y0) = (segment.a.x, segment.a.y);
    let (mut x1, mut y1) = (segment.b.x, segment.b.y);

    let mut code0 = outcode(x0, y0, window);
    let mut code1 = outcode(x1, y1, window);
    let mut accept = false;

    loop {
        if code0 | code1 == 0 {
            accept = true;
            break;
        }
        if code0 & code1 != 0 {
            break;
        }

        // Clip the endpoint that is outside, first endpoint preferred,
        // against one boundary per iteration: TOP, BOTTOM, RIGHT, LEFT.
        let out = if code0 != 0 { code0 } else { code1 };
        let (x, y) = if out & OUTCODE_TOP != 0 {
            (
                x0 + (x1 - x0) * (window.y2 - y0) / (y1 - y0),
                window.y2,
            )
        } else if out & OUTCODE_BOTTOM != 0 {
            (
                x0 + (x1 - x0) * (window.y1 - y0) / (y1 - y0),
                window.y1,
            )
        } else if out & OUTCODE_RIGHT != 0 {
            (
                window.x2,
                y0 + (y1 - y0) * (window.x2 - x0) / (x1 - x0),
            )
        } else {
            (
                window.x1,
                y0 + (y1 - y0) * (window.x1 - x0) / (x1 - x0),
            )
        };

        if out == code0 {
            x0 = x;
            y0 = y;
            code0 = outcode(x0, y0, window);
        } else {
            x1 = x;
            y1 = y;
            code1 = outcode(x1, y1, window);
        }
    }

    if !accept {
        return ClipResult {
            original: *segment,
            visible: None,
            invisible: vec![*segment],
        };
    }

    let clipped = LineSegment::new(PointD::new(x0, y0), PointD::new(x1, y1));
    let mut invisible = Vec::new();
    if x0 != segment.a.x || y0 != segment.a.y {
        invisible.push(LineSegment::new(segment.a, clipped.a));
    }
    if x1 != segment.b.x || y1 != segment.b.y {
        invisible.push(LineSegment::new(clipped.b, segment.b));
    }

    ClipResult {
        original: *segment,
        visible: Some(clipped),
        invisible,
    }
}

// ============================================================================
// Liang–Barsky
// ============================================================================

/// One boundary test: shrink [t0, t1] or reject. A zero directional
/// component is acceptable only while the offset `q` is non-negative.
fn clip_test(p: f64, q: f64, t0: &mut f64, t1: &mut f64) -> bool {
    if p == 0.0 {
        return q >= 0.0;
    }
    let r = q / p;
    if p < 0.0 {
        if r > *t1 {
            return false;
        }
        if r > *t0 {
            *t0 = r;
        }
    } else {
        if r < *t0 {
            return false;
        }
        if r < *t1 {
            *t1 = r;
        }
    }
    true
}

fn liang_barsky(segment: &LineSegment, window: &ClipWindow) -> ClipResult {
    let (x0, y0) = (segment.a.x, segment.a.y);
    let dx = segment.b.x - x0;
    let dy = segment.b.y - y0;

    let mut t0 = 0.0;
    let mut t1 = 1.0;

    let inside = clip_test(-dx, x0 - window.x1, &mut t0, &mut t1)
        && clip_test(dx, window.x2 - x0, &mut t0, &mut t1)
        && clip_test(-dy, y0 - window.y1, &mut t0, &mut t1)
        && clip_test(dy, window.y2 - y0, &mut t0, &mut t1);

    if !inside {
        return ClipResult {
            original: *segment,
            visible: None,
            invisible: vec![*segment],
        };
    }

    let va = PointD::new(x0 + t0 * dx, y0 + t0 * dy);
    let vb = PointD::new(x0 + t1 * dx, y0 + t1 * dy);

    let mut invisible = Vec::new();
    if t0 > 0.0 {
        invisible.push(LineSegment::new(segment.a, va));
    }
    if t1 < 1.0 {
        invisible.push(LineSegment::new(vb, segment.b));
    }

    ClipResult {
        original: *segment,
        visible: Some(LineSegment::new(va, vb)),
        invisible,
    }
}

// ============================================================================
// Entry points
// ============================================================================

/// Clip one segment against `window` with the chosen algorithm.
pub fn clip(segment: &LineSegment, window: &ClipWindow, algorithm: ClipAlgorithm) -> ClipResult {
    debug_assert!(window.is_valid());
    match algorithm {
        ClipAlgorithm::CohenSutherland => cohen_sutherland(segment, window),
        ClipAlgorithm::LiangBarsky => liang_barsky(segment, window),
    }
}

/// Clip a whole batch.
pub fn clip_all(
    segments: &[LineSegment],
    window: &ClipWindow,
    algorithm: ClipAlgorithm,
) -> Vec<ClipResult> {
    segments
        .iter()
        .map(|s| clip(s, window, algorithm))
        .collect()
}

/// The fixed illustrative batch for a given window: one segment crossing
/// fully through, one fully inside, one fully outside.
pub fn demo_segments(window: &ClipWindow) -> [LineSegment; 3] {
    let cy = (window.y1 + window.y2) / 2.0;
    let w = window.x2 - window.x1;
    let h = window.y2 - window.y1;

    [
        LineSegment::new(
            PointD::new(window.x1 - w * 0.5, cy),
            PointD::new(window.x2 + w * 0.5, cy),
        ),
        LineSegment::new(
            PointD::new(window.x1 + w * 0.1, window.y1 + h * 0.1),
            PointD::new(window.x2 - w * 0.1, window.y2 - h * 0.1),
        ),
        LineSegment::new(
            PointD::new(window.x1 - w * 0.3, window.y1 - h * 0.3),
            PointD::new(window.x1 - w * 0.1, window.y1 - h * 0.1),
        ),
    ]
}

// ============================================================================
// Demo render
// ============================================================================

/// Per-batch classification tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipStats {
    pub total: usize,
    pub fully_visible: usize,
    pub fully_invisible: usize,
    pub partial: usize,
}

const WINDOW_COLOR: Rgba8 = Rgba8::BLACK;
const ORIGINAL_COLOR: Rgba8 = Rgba8 {
    r: 153,
    g: 153,
    b: 153,
    a: 255,
};
const INVISIBLE_COLOR: Rgba8 = Rgba8 {
    r: 255,
    g: 0,
    b: 0,
    a: 255,
};
const VISIBLE_COLOR: Rgba8 = Rgba8 {
    r: 0,
    g: 255,
    b: 0,
    a: 255,
};

fn stroke_segment<S: Surface>(surface: &mut S, segment: &LineSegment, color: Rgba8) {
    surface.stroke_polyline(&[segment.a, segment.b], &StrokeStyle::new(color));
}

/// Clip the demo batch against `window` and draw the result: window frame
/// in black, originals in gray, invisible parts in red, visible parts in
/// green (drawn last, on top).
pub fn render_clip_demo<S: Surface>(
    surface: &mut S,
    window: &ClipWindow,
    algorithm: ClipAlgorithm,
) -> ClipStats {
    surface.clear();
    surface.fill_rect(0, 0, surface.width(), surface.height(), Rgba8::WHITE);

    surface.stroke_polyline(
        &[
            PointD::new(window.x1, window.y1),
            PointD::new(window.x2, window.y1),
            PointD::new(window.x2, window.y2),
            PointD::new(window.x1, window.y2),
        ],
        &StrokeStyle::closed(WINDOW_COLOR),
    );

    let results = clip_all(&demo_segments(window), window, algorithm);

    for r in &results {
        stroke_segment(surface, &r.original, ORIGINAL_COLOR);
    }
    for r in &results {
        for part in &r.invisible {
            stroke_segment(surface, part, INVISIBLE_COLOR);
        }
    }
    for r in &results {
        if let Some(part) = &r.visible {
            stroke_segment(surface, part, VISIBLE_COLOR);
        }
    }

    let mut stats = ClipStats {
        total: results.len(),
        ..ClipStats::default()
    };
    for r in &results {
        match r.visibility() {
            Visibility::FullyVisible => stats.fully_visible += 1,
            Visibility::FullyInvisible => stats.fully_invisible += 1,
            Visibility::Partial => stats.partial += 1,
        }
    }
    debug!(
        "clip batch ({:?}): {} visible / {} invisible / {} partial of {}",
        algorithm, stats.fully_visible, stats.fully_invisible, stats.partial, stats.total
    );
    stats
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn window() -> ClipWindow {
        ClipWindow::new(10.0, 10.0, 100.0, 100.0)
    }

    fn seg(ax: f64, ay: f64, bx: f64, by: f64) -> LineSegment {
        LineSegment::new(PointD::new(ax, ay), PointD::new(bx, by))
    }

    fn close(a: &PointD, b: &PointD) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn test_outcodes() {
        let w = window();
        assert_eq!(outcode(50.0, 50.0, &w), OUTCODE_INSIDE);
        assert_eq!(outcode(5.0, 50.0, &w), OUTCODE_LEFT);
        assert_eq!(outcode(110.0, 50.0, &w), OUTCODE_RIGHT);
        assert_eq!(outcode(50.0, 5.0, &w), OUTCODE_BOTTOM);
        assert_eq!(outcode(50.0, 110.0, &w), OUTCODE_TOP);
        assert_eq!(outcode(5.0, 110.0, &w), OUTCODE_LEFT | OUTCODE_TOP);
        // Boundary points are inside: max-side comparisons are strict.
        assert_eq!(outcode(10.0, 100.0, &w), OUTCODE_INSIDE);
        assert_eq!(outcode(100.0, 10.0, &w), OUTCODE_INSIDE);
    }

    #[test]
    fn test_fully_visible_segment() {
        let w = window();
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let r = clip(&seg(20.0, 20.0, 80.0, 90.0), &w, algorithm);
            assert_eq!(r.visibility(), Visibility::FullyVisible, "{algorithm:?}");
            let v = r.visible.unwrap();
            assert!(close(&v.a, &PointD::new(20.0, 20.0)));
            assert!(close(&v.b, &PointD::new(80.0, 90.0)));
            assert!(r.invisible.is_empty());
        }
    }

    #[test]
    fn test_fully_invisible_segment() {
        let w = window();
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let r = clip(&seg(0.0, 0.0, 5.0, 8.0), &w, algorithm);
            assert_eq!(r.visibility(), Visibility::FullyInvisible, "{algorithm:?}");
            assert_eq!(r.invisible.len(), 1);
            assert_eq!(r.invisible[0], r.original);
        }
    }

    #[test]
    fn test_crossing_segment_clips_both_ends() {
        let w = window();
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let r = clip(&seg(0.0, 50.0, 120.0, 50.0), &w, algorithm);
            assert_eq!(r.visibility(), Visibility::Partial, "{algorithm:?}");
            let v = r.visible.unwrap();
            assert!(close(&v.a, &PointD::new(10.0, 50.0)));
            assert!(close(&v.b, &PointD::new(100.0, 50.0)));
            assert_eq!(r.invisible.len(), 2);
            // Invisible parts connect the original endpoints to the
            // clipped ones: no gaps, no overlap.
            assert!(close(&r.invisible[0].a, &r.original.a));
            assert!(close(&r.invisible[0].b, &v.a));
            assert!(close(&r.invisible[1].a, &v.b));
            assert!(close(&r.invisible[1].b, &r.original.b));
        }
    }

    #[test]
    fn test_one_end_inside() {
        let w = window();
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let r = clip(&seg(50.0, 50.0, 200.0, 50.0), &w, algorithm);
            assert_eq!(r.visibility(), Visibility::Partial);
            let v = r.visible.unwrap();
            assert!(close(&v.a, &PointD::new(50.0, 50.0)));
            assert!(close(&v.b, &PointD::new(100.0, 50.0)));
            assert_eq!(r.invisible.len(), 1);
        }
    }

    #[test]
    fn test_diagonal_corner_cut() {
        let w = window();
        // Crosses the bottom-left corner region diagonally.
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let r = clip(&seg(0.0, 30.0, 30.0, 0.0), &w, algorithm);
            // Touches (10, 20) .. (20, 10): inside the window.
            assert_eq!(r.visibility(), Visibility::Partial, "{algorithm:?}");
            let v = r.visible.unwrap();
            assert!(close(&v.a, &PointD::new(10.0, 20.0)));
            assert!(close(&v.b, &PointD::new(20.0, 10.0)));
        }
    }

    #[test]
    fn test_degenerate_outside_point_segment() {
        let w = window();
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let r = clip(&seg(0.0, 0.0, 0.0, 0.0), &w, algorithm);
            assert_eq!(r.visibility(), Visibility::FullyInvisible, "{algorithm:?}");
        }
    }

    #[test]
    fn test_algorithms_agree() {
        let w = window();
        let cases = [
            seg(0.0, 0.0, 120.0, 120.0),
            seg(0.0, 60.0, 60.0, 0.0),
            seg(-20.0, 55.0, 55.0, 130.0),
            seg(12.0, 12.0, 95.0, 40.0),
            seg(110.0, 0.0, 150.0, 80.0),
            seg(50.0, -20.0, 50.0, 140.0),
            seg(10.0, 10.0, 100.0, 100.0),
        ];
        for s in &cases {
            let cs = clip(s, &w, ClipAlgorithm::CohenSutherland);
            let lb = clip(s, &w, ClipAlgorithm::LiangBarsky);
            assert_eq!(cs.visibility(), lb.visibility(), "{s:?}");
            match (&cs.visible, &lb.visible) {
                (Some(a), Some(b)) => {
                    assert!(close(&a.a, &b.a), "{s:?}: {a:?} vs {b:?}");
                    assert!(close(&a.b, &b.b), "{s:?}: {a:?} vs {b:?}");
                }
                (None, None) => {}
                other => panic!("visibility mismatch for {s:?}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_parts_reconstruct_original_span() {
        let w = window();
        let cases = [
            seg(0.0, 50.0, 120.0, 50.0),
            seg(-20.0, 55.0, 55.0, 130.0),
            seg(12.0, 12.0, 95.0, 40.0),
            seg(0.0, 0.0, 120.0, 120.0),
        ];
        for s in &cases {
            for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
                let r = clip(s, &w, algorithm);
                let total: f64 = r.invisible.iter().map(LineSegment::length).sum::<f64>()
                    + r.visible.as_ref().map_or(0.0, LineSegment::length);
                assert!(
                    (total - s.length()).abs() < EPS,
                    "{algorithm:?} {s:?}: parts sum {total}, original {}",
                    s.length()
                );
            }
        }
    }

    #[test]
    fn test_demo_batch_classification() {
        let w = window();
        let batch = demo_segments(&w);
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let results = clip_all(&batch, &w, algorithm);
            let classes: Vec<Visibility> = results.iter().map(ClipResult::visibility).collect();
            assert_eq!(
                classes,
                vec![
                    Visibility::Partial,
                    Visibility::FullyVisible,
                    Visibility::FullyInvisible
                ],
                "{algorithm:?}"
            );
        }
    }

    #[test]
    fn test_render_clip_demo_stats() {
        use crate::surface::MemorySurface;
        let mut s = MemorySurface::new(200, 160);
        let w = ClipWindow::new(40.0, 40.0, 160.0, 120.0);
        for algorithm in [ClipAlgorithm::CohenSutherland, ClipAlgorithm::LiangBarsky] {
            let stats = render_clip_demo(&mut s, &w, algorithm);
            assert_eq!(
                stats,
                ClipStats {
                    total: 3,
                    fully_visible: 1,
                    fully_invisible: 1,
                    partial: 1,
                }
            );
        }
        // The crossing segment's visible midline is drawn in green.
        assert_eq!(s.get_pixel(100, 80), Some(VISIBLE_COLOR));
    }
}
