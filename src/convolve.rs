//! Image convolution filtering.
//!
//! A [`Kernel`] is a square matrix of real weights applied per RGB channel.
//! Source samples falling outside the buffer are skipped rather than padded
//! or clamped, so near-border output is under-weighted by the kernel's own
//! normalization — that boundary artifact is part of the contract. Alpha is
//! passed through unfiltered.
//!
//! [`generate_test_image`] builds the fixed three-region test card (gray
//! ramp, checkerboard, stripes) the filters are demonstrated on.

use crate::basics::iround;
use crate::color::Rgba8;
use crate::raster_buffer::RasterBuffer;
use crate::surface::Surface;

// ============================================================================
// Kernel
// ============================================================================

/// Square convolution kernel with f64 weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    side: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Build a kernel from row-major weights; `weights.len()` must equal
    /// `side * side`.
    pub fn from_weights(side: usize, weights: Vec<f64>) -> Self {
        debug_assert!(side > 0);
        debug_assert_eq!(weights.len(), side * side);
        Self { side, weights }
    }

    /// 2×2 box filter, weights 1/4.
    pub fn uniform2() -> Self {
        Self::from_weights(2, vec![1.0 / 4.0; 4])
    }

    /// 4×4 box filter, weights 1/16.
    pub fn uniform4() -> Self {
        Self::from_weights(4, vec![1.0 / 16.0; 16])
    }

    /// 3×3 pyramid (separable triangle) filter.
    pub fn pyramid3() -> Self {
        #[rustfmt::skip]
        let w = [
            1.0, 2.0, 1.0,
            2.0, 4.0, 2.0,
            1.0, 2.0, 1.0,
        ];
        Self::from_weights(3, w.iter().map(|v| v / 16.0).collect())
    }

    /// 5×5 pyramid filter. The 1/25 denominator is part of the contract:
    /// the weights sum to 81/25, so this filter brightens.
    pub fn pyramid5() -> Self {
        #[rustfmt::skip]
        let w = [
            1.0, 2.0, 3.0, 2.0, 1.0,
            2.0, 4.0, 6.0, 4.0, 2.0,
            3.0, 6.0, 9.0, 6.0, 3.0,
            2.0, 4.0, 6.0, 4.0, 2.0,
            1.0, 2.0, 3.0, 2.0, 1.0,
        ];
        Self::from_weights(5, w.iter().map(|v| v / 25.0).collect())
    }

    pub fn side(&self) -> usize {
        self.side
    }

    /// Offset of the kernel center, `floor(side / 2)`.
    pub fn center_offset(&self) -> usize {
        self.side / 2
    }

    #[inline]
    pub fn get(&self, mx: usize, my: usize) -> f64 {
        self.weights[my * self.side + mx]
    }

    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

// ============================================================================
// Test image
// ============================================================================

const CHECKER_TILE: i32 = 20;
const STRIPE_WIDTH: i32 = 5;

/// Generate the fixed test card: left third a horizontal grayscale ramp,
/// middle third a 20-px checkerboard, right third 5-px gray stripes.
/// Fully opaque everywhere.
pub fn generate_test_image(width: u32, height: u32) -> RasterBuffer {
    let mut img = RasterBuffer::new(width, height);
    let third = width as f64 / 3.0;

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let fx = x as f64;
            let c = if fx < third {
                Rgba8::gray(((fx / third) * 255.0).floor() as u32)
            } else if fx < 2.0 * third {
                if (x / CHECKER_TILE + y / CHECKER_TILE) % 2 != 0 {
                    Rgba8::BLACK
                } else {
                    Rgba8::WHITE
                }
            } else if (x / STRIPE_WIDTH) % 2 != 0 {
                Rgba8::gray(64)
            } else {
                Rgba8::gray(192)
            };
            img.set(x, y, c);
        }
    }
    img
}

// ============================================================================
// Kernel application
// ============================================================================

/// Convolve `image` with `kernel`, producing a buffer of the same
/// dimensions. Out-of-bounds source samples are skipped; each RGB channel
/// is rounded to nearest and clamped to [0, 255]; alpha is copied through.
pub fn apply_kernel(image: &RasterBuffer, kernel: &Kernel) -> RasterBuffer {
    let mut out = image.clone();
    let side = kernel.side() as i32;
    let off = kernel.center_offset() as i32;

    for y in 0..image.height() as i32 {
        for x in 0..image.width() as i32 {
            let mut r = 0.0;
            let mut g = 0.0;
            let mut b = 0.0;
            for my in 0..side {
                for mx in 0..side {
                    let Some(src) = image.get(x + mx - off, y + my - off) else {
                        continue;
                    };
                    let w = kernel.get(mx as usize, my as usize);
                    r += src.r as f64 * w;
                    g += src.g as f64 * w;
                    b += src.b as f64 * w;
                }
            }
            let a = image.get(x, y).map_or(0, |c| c.a);
            out.set(
                x,
                y,
                Rgba8 {
                    r: iround(r).clamp(0, 255) as u8,
                    g: iround(g).clamp(0, 255) as u8,
                    b: iround(b).clamp(0, 255) as u8,
                    a,
                },
            );
        }
    }
    out
}

// ============================================================================
// Demo render
// ============================================================================

/// Which predefined filter to show over the test image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    /// The unfiltered test image.
    Original,
    Uniform2,
    Uniform4,
    Pyramid3,
    Pyramid5,
}

impl FilterKind {
    /// The predefined kernel for this filter, or `None` for the passthrough.
    pub fn kernel(self) -> Option<Kernel> {
        match self {
            FilterKind::Original => None,
            FilterKind::Uniform2 => Some(Kernel::uniform2()),
            FilterKind::Uniform4 => Some(Kernel::uniform4()),
            FilterKind::Pyramid3 => Some(Kernel::pyramid3()),
            FilterKind::Pyramid5 => Some(Kernel::pyramid5()),
        }
    }
}

/// Draw the test image, optionally convolved, onto the whole surface.
pub fn render_filtered<S: Surface>(surface: &mut S, kind: FilterKind) {
    let image = generate_test_image(surface.width(), surface.height());
    let shown = match kind.kernel() {
        Some(kernel) => apply_kernel(&image, &kernel),
        None => image,
    };
    surface.write_buffer(&shown, 0, 0);
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_tables() {
        let k = Kernel::uniform2();
        assert_eq!(k.side(), 2);
        assert_eq!(k.center_offset(), 1);
        assert_eq!(k.get(0, 0), 0.25);

        let k = Kernel::pyramid3();
        assert_eq!(k.center_offset(), 1);
        assert_eq!(k.get(1, 1), 4.0 / 16.0);
        assert!((k.sum() - 1.0).abs() < 1e-12);

        let k = Kernel::pyramid5();
        assert_eq!(k.center_offset(), 2);
        assert_eq!(k.get(2, 2), 9.0 / 25.0);
        assert!((k.sum() - 81.0 / 25.0).abs() < 1e-12);

        assert!((Kernel::uniform4().sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_test_image_regions() {
        let img = generate_test_image(300, 60);
        // Ramp third: gray proportional to x.
        assert_eq!(img.get(0, 10), Some(Rgba8::gray(0)));
        assert_eq!(img.get(99, 10), Some(Rgba8::gray(252)));
        // Checkerboard third: tile (5,0) is odd -> black, tile (6,0) even -> white.
        assert_eq!(img.get(100, 10), Some(Rgba8::BLACK));
        assert_eq!(img.get(120, 10), Some(Rgba8::WHITE));
        assert_eq!(img.get(120, 20), Some(Rgba8::BLACK));
        // Stripe third: stripe 41 odd -> 64, stripe 42 even -> 192.
        assert_eq!(img.get(205, 10), Some(Rgba8::gray(64)));
        assert_eq!(img.get(210, 10), Some(Rgba8::gray(192)));
    }

    #[test]
    fn test_test_image_fully_opaque() {
        let img = generate_test_image(90, 30);
        for y in 0..30 {
            for x in 0..90 {
                assert_eq!(img.get(x, y).map(|c| c.a), Some(255));
            }
        }
    }

    #[test]
    fn test_apply_preserves_dimensions_and_range() {
        let img = generate_test_image(60, 40);
        for kernel in [
            Kernel::uniform2(),
            Kernel::uniform4(),
            Kernel::pyramid3(),
            Kernel::pyramid5(),
        ] {
            let out = apply_kernel(&img, &kernel);
            assert_eq!(out.width(), 60);
            assert_eq!(out.height(), 40);
            // u8 channels are in range by construction; check alpha passthrough.
            for y in 0..40 {
                for x in 0..60 {
                    assert_eq!(out.get(x, y).map(|c| c.a), Some(255));
                }
            }
        }
    }

    #[test]
    fn test_unit_sum_kernel_is_identity_on_uniform_image() {
        let mut img = RasterBuffer::new(20, 20);
        img.fill(Rgba8::new_opaque(37, 141, 200));
        for kernel in [Kernel::uniform2(), Kernel::uniform4(), Kernel::pyramid3()] {
            let out = apply_kernel(&img, &kernel);
            // Far enough from the border every sample lands in bounds.
            for y in 4..16 {
                for x in 4..16 {
                    assert_eq!(out.get(x, y), Some(Rgba8::new_opaque(37, 141, 200)));
                }
            }
        }
    }

    #[test]
    fn test_border_under_weighting() {
        let mut img = RasterBuffer::new(10, 10);
        img.fill(Rgba8::WHITE);
        let out = apply_kernel(&img, &Kernel::pyramid3());
        // Corner keeps only the 2×2 sub-kernel [4,2;2,1]/16 = 9/16 of the mass.
        let corner = out.get(0, 0).unwrap();
        assert_eq!(corner.r, ((255.0 * 9.0 / 16.0) + 0.5) as u8);
        // Interior is untouched.
        assert_eq!(out.get(5, 5), Some(Rgba8::WHITE));
    }

    #[test]
    fn test_render_filtered_passthrough() {
        use crate::surface::MemorySurface;
        let mut s = MemorySurface::new(90, 30);
        render_filtered(&mut s, FilterKind::Original);
        assert_eq!(s.buffer(), &generate_test_image(90, 30));
    }
}
