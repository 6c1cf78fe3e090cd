//! Seed (flood) fill — naive frontier-stack and span-based variants.
//!
//! Both variants recolor the connected region of uniform color around a
//! seed point, parameterized by 4- or 8-connectivity, and report
//! [`FillStats`]. The naive variant pushes every neighbor of every filled
//! pixel; the span variant recolors whole horizontal runs and pushes one
//! representative per contiguous run on the rows above and below. Same
//! final region either way; frontier growth and animation granularity
//! differ.
//!
//! The fill runs as a manual stepping object owning its working buffer;
//! the driver re-presents between steps (a coalesced pixel batch for the
//! naive variant, one span for the span variant) and checks a
//! [`CancelToken`] at every suspension point.

use std::time::Instant;

use log::debug;

use crate::basics::{CancelToken, PointI};
use crate::color::Rgba8;
use crate::raster_buffer::RasterBuffer;
use crate::surface::{StrokeStyle, Surface};

/// Pixels recolored per naive-variant step before the buffer is
/// re-presented.
const NAIVE_BATCH: u64 = 50;

// ============================================================================
// Algorithm selection
// ============================================================================

/// Neighbor set considered adjacent during region fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Four,
    Eight,
}

impl Connectivity {
    fn offsets(self) -> &'static [(i32, i32)] {
        match self {
            Connectivity::Four => &[(1, 0), (-1, 0), (0, 1), (0, -1)],
            Connectivity::Eight => &[
                (1, 0),
                (-1, 0),
                (0, 1),
                (0, -1),
                (1, 1),
                (1, -1),
                (-1, 1),
                (-1, -1),
            ],
        }
    }
}

/// Seed fill algorithm variant. Each carries a fixed, distinct replacement
/// color so results are visually distinguishable side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedFillAlgorithm {
    Naive4,
    Naive8,
    Span4,
    Span8,
}

impl SeedFillAlgorithm {
    pub fn connectivity(self) -> Connectivity {
        match self {
            SeedFillAlgorithm::Naive4 | SeedFillAlgorithm::Span4 => Connectivity::Four,
            SeedFillAlgorithm::Naive8 | SeedFillAlgorithm::Span8 => Connectivity::Eight,
        }
    }

    pub fn replacement_color(self) -> Rgba8 {
        match self {
            SeedFillAlgorithm::Naive4 => Rgba8::new_opaque(0, 0, 255),
            SeedFillAlgorithm::Naive8 => Rgba8::new_opaque(255, 0, 0),
            SeedFillAlgorithm::Span4 => Rgba8::new_opaque(0, 255, 0),
            SeedFillAlgorithm::Span8 => Rgba8::new_opaque(255, 255, 0),
        }
    }

    fn is_span(self) -> bool {
        matches!(self, SeedFillAlgorithm::Span4 | SeedFillAlgorithm::Span8)
    }
}

// ============================================================================
// FillStats
// ============================================================================

/// Statistics of one fill invocation; never mutated after return.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FillStats {
    pub pixels_filled: u64,
    pub max_frontier: usize,
    pub elapsed_seconds: f64,
}

// ============================================================================
// SeedFill stepping object
// ============================================================================

/// One in-flight fill. Owns the working buffer for the duration of the run
/// and hands it back through [`SeedFill::finish`].
pub struct SeedFill {
    buf: RasterBuffer,
    frontier: Vec<(i32, i32)>,
    target: Rgba8,
    replacement: Rgba8,
    connectivity: Connectivity,
    span: bool,
    pixels_filled: u64,
    max_frontier: usize,
    started: Instant,
    noop: bool,
}

impl SeedFill {
    /// Begin a fill at `seed`. The target color is whatever the buffer
    /// holds there; if it already equals the variant's replacement color
    /// (or the seed is out of bounds) the fill is a completed no-op.
    pub fn new(buf: RasterBuffer, seed: PointI, algorithm: SeedFillAlgorithm) -> Self {
        let replacement = algorithm.replacement_color();
        let target = buf.get(seed.x, seed.y);
        let noop = match target {
            Some(t) => t == replacement,
            None => true,
        };
        Self {
            buf,
            frontier: if noop { Vec::new() } else { vec![(seed.x, seed.y)] },
            target: target.unwrap_or_default(),
            replacement,
            connectivity: algorithm.connectivity(),
            span: algorithm.is_span(),
            pixels_filled: 0,
            max_frontier: 0,
            started: Instant::now(),
            noop,
        }
    }

    /// The working buffer, for presentation between steps.
    pub fn buffer(&self) -> &RasterBuffer {
        &self.buf
    }

    /// Perform one unit of progress: a coalesced batch of pixels (naive)
    /// or one span (span variant). Returns `false` once the frontier is
    /// exhausted.
    pub fn step(&mut self) -> bool {
        if self.span {
            self.step_span()
        } else {
            self.step_naive()
        }
    }

    /// Consume the fill, returning the buffer and final statistics.
    pub fn finish(self) -> (RasterBuffer, FillStats) {
        let stats = FillStats {
            pixels_filled: self.pixels_filled,
            max_frontier: self.max_frontier,
            elapsed_seconds: if self.noop {
                0.0
            } else {
                self.started.elapsed().as_secs_f64()
            },
        };
        (self.buf, stats)
    }

    fn step_naive(&mut self) -> bool {
        let mut filled_this_step = 0;
        while let Some((x, y)) = self.frontier.pop() {
            // Covers both out-of-bounds and already-recolored pixels.
            if self.buf.get(x, y) != Some(self.target) {
                continue;
            }
            self.buf.set(x, y, self.replacement);
            self.pixels_filled += 1;
            filled_this_step += 1;

            for &(dx, dy) in self.connectivity.offsets() {
                self.frontier.push((x + dx, y + dy));
            }
            self.max_frontier = self.max_frontier.max(self.frontier.len());

            if filled_this_step == NAIVE_BATCH {
                break;
            }
        }
        filled_this_step > 0
    }

    fn step_span(&mut self) -> bool {
        while let Some((seed_x, seed_y)) = self.frontier.pop() {
            if self.buf.get(seed_x, seed_y) != Some(self.target) {
                continue;
            }

            let mut left = seed_x;
            while left > 0 && self.buf.get(left - 1, seed_y) == Some(self.target) {
                left -= 1;
            }
            let width = self.buf.width() as i32;
            let mut right = seed_x;
            while right < width - 1 && self.buf.get(right + 1, seed_y) == Some(self.target) {
                right += 1;
            }

            for x in left..=right {
                self.buf.set(x, seed_y, self.replacement);
                self.pixels_filled += 1;
            }

            let height = self.buf.height() as i32;
            match self.connectivity {
                Connectivity::Four => {
                    if seed_y > 0 {
                        self.push_runs(left, right, seed_y - 1);
                    }
                    if seed_y < height - 1 {
                        self.push_runs(left, right, seed_y + 1);
                    }
                }
                Connectivity::Eight => {
                    // One pixel wider on each side so diagonal contact counts.
                    for dy in [-1, 1] {
                        let ny = seed_y + dy;
                        if ny >= 0 && ny < height {
                            self.push_runs((left - 1).max(0), (right + 1).min(width - 1), ny);
                        }
                    }
                }
            }
            self.max_frontier = self.max_frontier.max(self.frontier.len());
            return true;
        }
        false
    }

    /// Push one representative point per contiguous target-colored run in
    /// `[left, right]` on row `y`.
    fn push_runs(&mut self, left: i32, right: i32, y: i32) {
        let mut x = left;
        while x <= right {
            if self.buf.get(x, y) == Some(self.target) {
                let run_start = x;
                while x <= right && self.buf.get(x, y) == Some(self.target) {
                    x += 1;
                }
                self.frontier.push((run_start, y));
            } else {
                x += 1;
            }
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Fill the region of uniform color around `seed` on `surface`, presenting
/// the buffer at every suspension point and honoring `cancel`.
pub fn fill<S: Surface>(
    surface: &mut S,
    seed: PointI,
    algorithm: SeedFillAlgorithm,
    cancel: &CancelToken,
) -> FillStats {
    let buf = surface.read_buffer(0, 0, surface.width(), surface.height());
    let mut run = SeedFill::new(buf, seed, algorithm);

    while !cancel.is_cancelled() && run.step() {
        surface.write_buffer(run.buffer(), 0, 0);
    }

    let (buf, stats) = run.finish();
    surface.write_buffer(&buf, 0, 0);
    debug!(
        "seed fill {:?} at ({},{}): {} pixels, max frontier {}, {:.3}s",
        algorithm, seed.x, seed.y, stats.pixels_filled, stats.max_frontier, stats.elapsed_seconds
    );
    stats
}

// ============================================================================
// Playground scene
// ============================================================================

/// Draw the fixed fill-demo scene: a white background with black outlined
/// shapes forming several enclosed regions.
pub fn draw_playground<S: Surface>(surface: &mut S) {
    use crate::basics::PointD;

    let w = surface.width();
    let h = surface.height();
    surface.fill_rect(0, 0, w, h, Rgba8::WHITE);

    let style = StrokeStyle::new(Rgba8::BLACK);
    let closed = StrokeStyle::closed(Rgba8::BLACK);

    // Outer frame.
    surface.stroke_polyline(
        &[
            PointD::new(100.0, 100.0),
            PointD::new(500.0, 100.0),
            PointD::new(500.0, 400.0),
            PointD::new(100.0, 400.0),
        ],
        &closed,
    );

    // Circle, stroked as a 64-segment polyline.
    let circle: Vec<PointD> = (0..64)
        .map(|i| {
            let t = (i as f64) / 64.0 * std::f64::consts::TAU;
            PointD::new(250.0 + 40.0 * t.cos(), 200.0 + 40.0 * t.sin())
        })
        .collect();
    surface.stroke_polyline(&circle, &closed);

    // Small rectangle.
    surface.stroke_polyline(
        &[
            PointD::new(350.0, 250.0),
            PointD::new(430.0, 250.0),
            PointD::new(430.0, 310.0),
            PointD::new(350.0, 310.0),
        ],
        &closed,
    );

    // Triangle.
    surface.stroke_polyline(
        &[
            PointD::new(200.0, 350.0),
            PointD::new(250.0, 320.0),
            PointD::new(300.0, 350.0),
        ],
        &closed,
    );

    // Interior lines that split the frame into sub-regions.
    surface.stroke_polyline(
        &[PointD::new(150.0, 150.0), PointD::new(150.0, 350.0)],
        &style,
    );
    surface.stroke_polyline(
        &[PointD::new(300.0, 120.0), PointD::new(450.0, 180.0)],
        &style,
    );
    surface.stroke_polyline(
        &[PointD::new(180.0, 180.0), PointD::new(180.0, 220.0)],
        &style,
    );
    surface.stroke_polyline(
        &[PointD::new(220.0, 180.0), PointD::new(220.0, 220.0)],
        &style,
    );
}

// ============================================================================
// Tests
// ============================================================================
