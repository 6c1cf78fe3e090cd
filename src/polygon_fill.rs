//! Polygon scan conversion — two animated fill algorithms.
//!
//! [`ScanlineFill`] is the classic parity fill: per integer scanline it
//! gathers edge intersections under the half-open rule, sorts them, and
//! fills between consecutive pairs. [`EdgeFlagFill`] produces the same
//! parity effect without an intersection list: rightward pixel-inversion
//! scans are triggered at pass-through vertices and then row by row along
//! every non-horizontal edge, using each pixel's current alpha as the
//! inside/outside memory. The toggle rule is deliberately sensitive to
//! whatever is already opaque on the buffer, so a run must start from a
//! transparent interior.
//!
//! Both algorithms are manual stepping objects: `step()` performs one scan
//! row of visual progress, and the driving loop re-presents, paces, and
//! checks a [`CancelToken`] between rows.

use log::trace;

use crate::basics::{iceil, ifloor, CancelToken, PointD};
use crate::color::Rgba8;
use crate::raster_buffer::RasterBuffer;
use crate::surface::{StrokeStyle, Surface};

/// Polygon outline stroke color.
pub const OUTLINE_COLOR: Rgba8 = Rgba8::WHITE;
/// Scanline/parity fill color (green).
pub const SCANLINE_FILL_COLOR: Rgba8 = Rgba8 {
    r: 0,
    g: 255,
    b: 0,
    a: 255,
};
/// Edge-flag inversion fill color (blue).
pub const EDGE_FILL_COLOR: Rgba8 = Rgba8 {
    r: 0,
    g: 0,
    b: 255,
    a: 255,
};

// ============================================================================
// Polygon
// ============================================================================

/// Closed ordered vertex sequence; the edge from the last vertex back to
/// the first is implied. Immutable for the lifetime of a fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<PointD>,
}

impl Polygon {
    pub fn new(vertices: Vec<PointD>) -> Self {
        debug_assert!(!vertices.is_empty());
        Self { vertices }
    }

    pub fn vertices(&self) -> &[PointD] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edge `i`: from vertex `i` to vertex `i + 1` (wrapping).
    fn edge(&self, i: usize) -> (PointD, PointD) {
        let n = self.vertices.len();
        (self.vertices[i], self.vertices[(i + 1) % n])
    }

    /// (min, max) of the vertex y coordinates.
    pub fn y_bounds(&self) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in &self.vertices {
            min = min.min(v.y);
            max = max.max(v.y);
        }
        (min, max)
    }
}

/// The fixed 7-vertex demo polygon.
pub fn demo_polygon() -> Polygon {
    Polygon::new(vec![
        PointD::new(100.0, 80.0),
        PointD::new(250.0, 50.0),
        PointD::new(400.0, 100.0),
        PointD::new(450.0, 250.0),
        PointD::new(350.0, 350.0),
        PointD::new(150.0, 300.0),
        PointD::new(50.0, 150.0),
    ])
}

/// Which fill algorithm to animate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonFillAlgorithm {
    Scanline,
    EdgeFlag,
}

/// Stroke every polygon edge, including the closing edge.
pub fn stroke_outline<S: Surface>(surface: &mut S, polygon: &Polygon) {
    surface.stroke_polyline(polygon.vertices(), &StrokeStyle::closed(OUTLINE_COLOR));
}

// ============================================================================
// Scanline / parity fill
// ============================================================================

/// Animated scanline fill; each `step()` draws one scanline directly onto
/// the surface it is given.
#[derive(Debug, Clone)]
pub struct ScanlineFill {
    polygon: Polygon,
    color: Rgba8,
    y: i32,
    y_end: i32,
}

impl ScanlineFill {
    pub fn new(polygon: &Polygon, color: Rgba8) -> Self {
        let (min_y, max_y) = polygon.y_bounds();
        Self {
            polygon: polygon.clone(),
            color,
            y: ifloor(min_y),
            y_end: iceil(max_y),
        }
    }

    /// Fill one scanline. Returns `false` once all rows are done.
    pub fn step<S: Surface>(&mut self, surface: &mut S) -> bool {
        if self.y > self.y_end {
            return false;
        }
        let y = self.y as f64;

        let mut xs: Vec<f64> = Vec::new();
        for i in 0..self.polygon.len() {
            let (p1, p2) = self.polygon.edge(i);
            // Half-open rule: each edge contributes at its lower-y end and
            // not at its upper-y end, so shared vertices count once.
            if (p1.y <= y && y < p2.y) || (p2.y <= y && y < p1.y) {
                xs.push(p1.x + (p2.x - p1.x) * (y - p1.y) / (p2.y - p1.y));
            }
        }
        xs.sort_by(f64::total_cmp);

        for pair in xs.chunks_exact(2) {
            let xa = ifloor(pair[0]);
            let xb = ifloor(pair[1]);
            if xb >= xa {
                surface.fill_rect(xa, self.y, (xb - xa + 1) as u32, 1, self.color);
            }
        }

        trace!("scanline fill: row {} ({} crossings)", self.y, xs.len());
        self.y += 1;
        true
    }
}

// ============================================================================
// Edge-flag inversion fill
// ============================================================================

/// A non-horizontal polygon edge prepared for row walking, lower-y
/// endpoint first.
#[derive(Debug, Clone, Copy)]
struct WalkEdge {
    x1: f64,
    y1: f64,
    slope: f64,
    y_start: i32,
    y_end: i32,
}

#[derive(Debug, Clone, Copy)]
enum EdgePhase {
    VertexPass,
    EdgeWalk { edge: usize, y: i32 },
    Done,
}

/// Animated edge-flag fill. Owns its working buffer for the duration of
/// the run; the driver presents [`EdgeFlagFill::buffer`] after the vertex
/// pass and after every edge row.
#[derive(Debug, Clone)]
pub struct EdgeFlagFill {
    buf: RasterBuffer,
    seeds: Vec<(i32, i32)>,
    edges: Vec<WalkEdge>,
    color: Rgba8,
    phase: EdgePhase,
}

impl EdgeFlagFill {
    /// Begin a fill over `buf`, which must hold the surface content the
    /// outline was stroked into.
    pub fn new(buf: RasterBuffer, polygon: &Polygon, color: Rgba8) -> Self {
        let n = polygon.len();

        // Pass-through vertices: neither a local extremum in y nor adjacent
        // to a horizontal edge. Each one triggers an initial inversion scan
        // that establishes the inside/outside state at that row.
        let mut seeds = Vec::new();
        for i in 0..n {
            let v = polygon.vertices()[i];
            let p = polygon.vertices()[(i + n - 1) % n];
            let nx = polygon.vertices()[(i + 1) % n];
            if p.y == v.y || v.y == nx.y {
                continue;
            }
            let is_max = p.y < v.y && nx.y < v.y;
            let is_min = p.y > v.y && nx.y > v.y;
            if !is_max && !is_min {
                seeds.push((ifloor(v.x), ifloor(v.y)));
            }
        }

        let mut edges = Vec::new();
        for i in 0..n {
            let (mut a, mut b) = polygon.edge(i);
            if a.y == b.y {
                continue;
            }
            if a.y > b.y {
                core::mem::swap(&mut a, &mut b);
            }
            edges.push(WalkEdge {
                x1: a.x,
                y1: a.y,
                slope: (b.x - a.x) / (b.y - a.y),
                y_start: ifloor(a.y),
                y_end: ifloor(b.y),
            });
        }

        Self {
            buf,
            seeds,
            edges,
            color,
            phase: EdgePhase::VertexPass,
        }
    }

    /// The working buffer, for presentation between steps.
    pub fn buffer(&self) -> &RasterBuffer {
        &self.buf
    }

    /// Consume the fill, returning the buffer in its current state.
    pub fn into_buffer(self) -> RasterBuffer {
        self.buf
    }

    /// Toggle every pixel from (start_x, y) to the right buffer edge:
    /// transparent pixels become the fill color, opaque pixels become
    /// transparent. The buffer's current alpha is the only state consulted.
    fn invert_right(&mut self, start_x: i32, y: i32) {
        if y < 0 || y >= self.buf.height() as i32 {
            return;
        }
        for x in start_x.max(0)..self.buf.width() as i32 {
            match self.buf.get(x, y) {
                Some(c) if c.is_transparent() => self.buf.set(x, y, self.color),
                Some(_) => self.buf.set(x, y, Rgba8::TRANSPARENT),
                None => {}
            }
        }
    }

    fn first_walk_phase(&self) -> EdgePhase {
        match self.edges.first() {
            Some(e) => EdgePhase::EdgeWalk {
                edge: 0,
                y: e.y_start,
            },
            None => EdgePhase::Done,
        }
    }

    /// Perform one unit of progress: the whole vertex pass on the first
    /// call, then one edge row per call. Returns `false` once complete.
    pub fn step(&mut self) -> bool {
        match self.phase {
            EdgePhase::VertexPass => {
                for i in 0..self.seeds.len() {
                    let (sx, sy) = self.seeds[i];
                    self.invert_right(sx, sy);
                }
                trace!("edge-flag fill: vertex pass ({} seeds)", self.seeds.len());
                self.phase = self.first_walk_phase();
                true
            }
            EdgePhase::EdgeWalk { edge, y } => {
                let e = self.edges[edge];
                let x = e.x1 + (y as f64 - e.y1) * e.slope;
                self.invert_right(ifloor(x), y);
                trace!("edge-flag fill: edge {edge} row {y}");

                self.phase = if y < e.y_end {
                    EdgePhase::EdgeWalk { edge, y: y + 1 }
                } else if edge + 1 < self.edges.len() {
                    EdgePhase::EdgeWalk {
                        edge: edge + 1,
                        y: self.edges[edge + 1].y_start,
                    }
                } else {
                    EdgePhase::Done
                };
                true
            }
            EdgePhase::Done => false,
        }
    }
}

// ============================================================================
// Driver
// ============================================================================

/// Run a complete animated polygon fill: outline, all fill steps (checking
/// `cancel` and re-presenting at every suspension point), outline again.
pub fn fill_polygon<S: Surface>(
    surface: &mut S,
    polygon: &Polygon,
    algorithm: PolygonFillAlgorithm,
    cancel: &CancelToken,
) {
    stroke_outline(surface, polygon);

    match algorithm {
        PolygonFillAlgorithm::Scanline => {
            let mut fill = ScanlineFill::new(polygon, SCANLINE_FILL_COLOR);
            while !cancel.is_cancelled() && fill.step(surface) {}
        }
        PolygonFillAlgorithm::EdgeFlag => {
            let buf = surface.read_buffer(0, 0, surface.width(), surface.height());
            let mut fill = EdgeFlagFill::new(buf, polygon, EDGE_FILL_COLOR);
            while !cancel.is_cancelled() && fill.step() {
                surface.write_buffer(fill.buffer(), 0, 0);
            }
        }
    }

    stroke_outline(surface, polygon);
}

// ============================================================================
// Tests
// ============================================================================
