//! rasterlab-viewer — interactive window driver for the rasterlab demos.
//!
//! Keys:
//!   1..5   select a demo (lines, convolution, polygon fill, seed fill,
//!          clipping)
//!   Space  cycle the algorithm variant within the current demo
//!   Esc    quit (cancels a running animation)

use std::time::Duration;

use log::info;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use thiserror::Error;

use rasterlab::basics::PointI;
use rasterlab::clip::{render_clip_demo, ClipAlgorithm, ClipWindow};
use rasterlab::color::Rgba8;
use rasterlab::convolve::{render_filtered, FilterKind};
use rasterlab::line_raster::render_comparison;
use rasterlab::polygon_fill::{
    demo_polygon, stroke_outline, EdgeFlagFill, PolygonFillAlgorithm, ScanlineFill,
    EDGE_FILL_COLOR, SCANLINE_FILL_COLOR,
};
use rasterlab::seed_fill::{draw_playground, SeedFill, SeedFillAlgorithm};
use rasterlab::surface::{MemorySurface, Surface};

const WIDTH: usize = 600;
const HEIGHT: usize = 450;
const STEP_DELAY: Duration = Duration::from_millis(5);
const CLIP_MARGIN: f64 = 80.0;
const SEED: PointI = PointI { x: 300, y: 200 };

#[derive(Debug, Error)]
enum ViewerError {
    #[error("window init failed: {0}")]
    WindowInit(minifb::Error),
    #[error("window update failed: {0}")]
    WindowUpdate(minifb::Error),
}

/// Currently selected demo with its algorithm variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    Lines,
    Convolution(FilterKind),
    PolygonFill(PolygonFillAlgorithm),
    SeedFill(SeedFillAlgorithm),
    Clipping(ClipAlgorithm),
}

impl Demo {
    /// Next algorithm variant within the same demo.
    fn cycled(self) -> Demo {
        match self {
            Demo::Lines => Demo::Lines,
            Demo::Convolution(kind) => Demo::Convolution(match kind {
                FilterKind::Original => FilterKind::Uniform2,
                FilterKind::Uniform2 => FilterKind::Uniform4,
                FilterKind::Uniform4 => FilterKind::Pyramid3,
                FilterKind::Pyramid3 => FilterKind::Pyramid5,
                FilterKind::Pyramid5 => FilterKind::Original,
            }),
            Demo::PolygonFill(a) => Demo::PolygonFill(match a {
                PolygonFillAlgorithm::Scanline => PolygonFillAlgorithm::EdgeFlag,
                PolygonFillAlgorithm::EdgeFlag => PolygonFillAlgorithm::Scanline,
            }),
            Demo::SeedFill(a) => Demo::SeedFill(match a {
                SeedFillAlgorithm::Naive4 => SeedFillAlgorithm::Naive8,
                SeedFillAlgorithm::Naive8 => SeedFillAlgorithm::Span4,
                SeedFillAlgorithm::Span4 => SeedFillAlgorithm::Span8,
                SeedFillAlgorithm::Span8 => SeedFillAlgorithm::Naive4,
            }),
            Demo::Clipping(a) => Demo::Clipping(match a {
                ClipAlgorithm::CohenSutherland => ClipAlgorithm::LiangBarsky,
                ClipAlgorithm::LiangBarsky => ClipAlgorithm::CohenSutherland,
            }),
        }
    }
}

struct Viewer {
    window: Window,
    surface: MemorySurface,
    pixels: Vec<u32>,
    demo: Demo,
}

impl Viewer {
    fn new() -> Result<Self, ViewerError> {
        let window = Window::new("rasterlab", WIDTH, HEIGHT, WindowOptions::default())
            .map_err(ViewerError::WindowInit)?;
        Ok(Self {
            window,
            surface: MemorySurface::new(WIDTH as u32, HEIGHT as u32),
            pixels: vec![0; WIDTH * HEIGHT],
            demo: Demo::Lines,
        })
    }

    /// Blit the surface to the window, compositing alpha over white.
    fn present(&mut self) -> Result<(), ViewerError> {
        for (i, px) in self.surface.buffer().data().chunks_exact(4).enumerate() {
            let a = px[3] as u32;
            let r = (px[0] as u32 * a + 255 * (255 - a)) / 255;
            let g = (px[1] as u32 * a + 255 * (255 - a)) / 255;
            let b = (px[2] as u32 * a + 255 * (255 - a)) / 255;
            self.pixels[i] = (r << 16) | (g << 8) | b;
        }
        self.window
            .update_with_buffer(&self.pixels, WIDTH, HEIGHT)
            .map_err(ViewerError::WindowUpdate)
    }

    fn keep_running(&self) -> bool {
        self.window.is_open() && !self.window.is_key_down(Key::Escape)
    }

    /// One animation suspension point: present, pace, poll events.
    fn pace(&mut self) -> Result<(), ViewerError> {
        self.present()?;
        std::thread::sleep(STEP_DELAY);
        Ok(())
    }

    fn run(&mut self) -> Result<(), ViewerError> {
        self.show()?;
        while self.keep_running() {
            self.present()?;
            if let Some(demo) = self.poll_selection() {
                self.demo = demo;
                self.show()?;
            }
        }
        Ok(())
    }

    fn poll_selection(&self) -> Option<Demo> {
        let pressed = |key| self.window.is_key_pressed(key, KeyRepeat::No);
        if pressed(Key::Key1) {
            Some(Demo::Lines)
        } else if pressed(Key::Key2) {
            Some(Demo::Convolution(FilterKind::Original))
        } else if pressed(Key::Key3) {
            Some(Demo::PolygonFill(PolygonFillAlgorithm::Scanline))
        } else if pressed(Key::Key4) {
            Some(Demo::SeedFill(SeedFillAlgorithm::Naive4))
        } else if pressed(Key::Key5) {
            Some(Demo::Clipping(ClipAlgorithm::CohenSutherland))
        } else if pressed(Key::Space) {
            Some(self.demo.cycled())
        } else {
            None
        }
    }

    fn show(&mut self) -> Result<(), ViewerError> {
        info!("demo: {:?}", self.demo);
        match self.demo {
            Demo::Lines => self.show_lines(),
            Demo::Convolution(kind) => {
                render_filtered(&mut self.surface, kind);
                self.present()
            }
            Demo::PolygonFill(algorithm) => self.show_polygon(algorithm),
            Demo::SeedFill(algorithm) => self.show_seed_fill(algorithm),
            Demo::Clipping(algorithm) => {
                let window = ClipWindow::new(
                    CLIP_MARGIN,
                    CLIP_MARGIN,
                    WIDTH as f64 - CLIP_MARGIN,
                    HEIGHT as f64 - CLIP_MARGIN,
                );
                let stats = render_clip_demo(&mut self.surface, &window, algorithm);
                info!(
                    "clip ({algorithm:?}): {} visible / {} invisible / {} partial",
                    stats.fully_visible, stats.fully_invisible, stats.partial
                );
                self.present()
            }
        }
    }

    fn show_lines(&mut self) -> Result<(), ViewerError> {
        self.surface.clear();
        self.surface
            .fill_rect(0, 0, WIDTH as u32, HEIGHT as u32, Rgba8::WHITE);
        // Shallow, diagonal, and steep segments for octant comparison.
        render_comparison(&mut self.surface, PointI::new(40, 100), PointI::new(560, 180));
        render_comparison(&mut self.surface, PointI::new(100, 400), PointI::new(300, 200));
        render_comparison(&mut self.surface, PointI::new(450, 60), PointI::new(500, 420));
        self.present()
    }

    fn show_polygon(&mut self, algorithm: PolygonFillAlgorithm) -> Result<(), ViewerError> {
        let polygon = demo_polygon();
        self.surface.clear();
        stroke_outline(&mut self.surface, &polygon);

        match algorithm {
            PolygonFillAlgorithm::Scanline => {
                let mut fill = ScanlineFill::new(&polygon, SCANLINE_FILL_COLOR);
                while self.keep_running() && fill.step(&mut self.surface) {
                    self.pace()?;
                }
            }
            PolygonFillAlgorithm::EdgeFlag => {
                let buf =
                    self.surface
                        .read_buffer(0, 0, self.surface.width(), self.surface.height());
                let mut fill = EdgeFlagFill::new(buf, &polygon, EDGE_FILL_COLOR);
                while self.keep_running() && fill.step() {
                    self.surface.write_buffer(fill.buffer(), 0, 0);
                    self.pace()?;
                }
            }
        }

        stroke_outline(&mut self.surface, &polygon);
        self.present()
    }

    fn show_seed_fill(&mut self, algorithm: SeedFillAlgorithm) -> Result<(), ViewerError> {
        draw_playground(&mut self.surface);
        self.present()?;

        let buf = self
            .surface
            .read_buffer(0, 0, self.surface.width(), self.surface.height());
        let mut fill = SeedFill::new(buf, SEED, algorithm);
        while self.keep_running() && fill.step() {
            self.surface.write_buffer(fill.buffer(), 0, 0);
            self.pace()?;
        }
        let (buf, stats) = fill.finish();
        self.surface.write_buffer(&buf, 0, 0);
        info!(
            "seed fill ({algorithm:?}): {} pixels, max frontier {}, {:.3}s",
            stats.pixels_filled, stats.max_frontier, stats.elapsed_seconds
        );
        self.present()
    }
}

fn main() -> Result<(), ViewerError> {
    env_logger::init();
    Viewer::new()?.run()
}
