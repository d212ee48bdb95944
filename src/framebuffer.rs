//! Core framebuffer for pixel rendering.
//!
//! Provides a SIMD-aligned RGBA pixel buffer that arcs are composited into,
//! plus the post-effects (blur, saturation) the scroll stages drive.

use crate::color::Rgba;
use crate::error::{Error, Result};
use trueno::Vector;

/// Alignment for SIMD operations (64 bytes for AVX-512).
const SIMD_ALIGNMENT: usize = 64;

/// SIMD-aligned framebuffer for efficient pixel operations.
///
/// Rows are padded to a multiple of 64 bytes so that each row starts on a
/// SIMD-friendly boundary.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// RGBA pixels in row-major order, row 0 at the top.
    pixels: Vec<u8>,
    /// Stride in bytes (may include padding for alignment).
    stride: usize,
}

impl Framebuffer {
    /// Create a new, fully transparent framebuffer.
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is zero.
    ///
    /// # Example
    ///
    /// ```
    /// use citation_arcs::framebuffer::Framebuffer;
    ///
    /// let fb = Framebuffer::new(800, 600).unwrap();
    /// assert_eq!(fb.width(), 800);
    /// assert_eq!(fb.height(), 600);
    /// ```
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }

        let row_bytes = (width as usize) * 4;
        let stride = (row_bytes + SIMD_ALIGNMENT - 1) & !(SIMD_ALIGNMENT - 1);
        let size = stride * (height as usize);

        let mut pixels = Vec::with_capacity(size + SIMD_ALIGNMENT);
        pixels.resize(size, 0);

        Ok(Self { width, height, pixels, stride })
    }

    /// Get the width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Get the height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Get the stride (row width in bytes, including any padding).
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Get the total number of pixels.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Get a row of pixels as a slice.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = (y as usize) * self.stride;
        let end = start + (self.width as usize) * 4;
        Some(&self.pixels[start..end])
    }

    /// Clear the framebuffer to a solid color.
    ///
    /// Fills 16 pixels (64 bytes) per copy so the compiler can vectorize
    /// the row fill.
    pub fn clear(&mut self, color: Rgba) {
        let [r, g, b, a] = color.to_array();

        let pattern: [u8; 64] = {
            let mut p = [0u8; 64];
            for px in p.chunks_exact_mut(4) {
                px.copy_from_slice(&[r, g, b, a]);
            }
            p
        };

        let row_bytes = (self.width as usize) * 4;
        for row in self.pixels.chunks_exact_mut(self.stride) {
            let row = &mut row[..row_bytes];

            let mut offset = 0;
            while offset + 64 <= row.len() {
                row[offset..offset + 64].copy_from_slice(&pattern);
                offset += 64;
            }
            for chunk in row[offset..].chunks_exact_mut(4) {
                chunk.copy_from_slice(&[r, g, b, a]);
            }
        }
    }

    /// Get the color at a specific pixel coordinate.
    ///
    /// Returns `None` if the coordinates are out of bounds.
    #[must_use]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let idx = self.pixel_index(x, y);
        Some(Rgba::from_array([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]))
    }

    /// Set the color at a specific pixel coordinate.
    ///
    /// Does nothing if the coordinates are out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height {
            return;
        }

        let idx = self.pixel_index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color.to_array());
    }

    /// Blend a color at a specific pixel coordinate using alpha blending.
    ///
    /// Uses the "over" compositing operation:
    /// `out = src * src_alpha + dst * dst_alpha * (1 - src_alpha)`.
    /// A fully transparent source leaves the pixel untouched.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x >= self.width || y >= self.height || color.a == 0 {
            return;
        }

        let idx = self.pixel_index(x, y);
        let src_a = f32::from(color.a) / 255.0;
        let dst_a = f32::from(self.pixels[idx + 3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        let blend = |src: u8, dst: u8| -> u8 {
            let out = (f32::from(src) * src_a + f32::from(dst) * dst_a * (1.0 - src_a)) / out_a;
            out.round().clamp(0.0, 255.0) as u8
        };

        self.pixels[idx] = blend(color.r, self.pixels[idx]);
        self.pixels[idx + 1] = blend(color.g, self.pixels[idx + 1]);
        self.pixels[idx + 2] = blend(color.b, self.pixels[idx + 2]);
        self.pixels[idx + 3] = (out_a * 255.0).round() as u8;
    }

    /// Apply the CSS `saturate()` filter to every pixel.
    ///
    /// An amount of 1.0 is a no-op.
    pub fn saturate(&mut self, amount: f32) {
        if (amount - 1.0).abs() < f32::EPSILON {
            return;
        }

        let row_bytes = (self.width as usize) * 4;
        for row in self.pixels.chunks_exact_mut(self.stride) {
            for chunk in row[..row_bytes].chunks_exact_mut(4) {
                let px = Rgba::from_array([chunk[0], chunk[1], chunk[2], chunk[3]]);
                chunk.copy_from_slice(&px.saturate(amount).to_array());
            }
        }
    }

    /// Apply a separable Gaussian blur with standard deviation `sigma` pixels.
    ///
    /// Channels are blurred premultiplied; edges clamp to the nearest pixel.
    /// A sigma below 0.05 px is a no-op.
    pub fn gaussian_blur(&mut self, sigma: f32) {
        if !sigma.is_finite() || sigma < 0.05 {
            return;
        }

        let kernel = gaussian_kernel(sigma);
        let radius = (kernel.len() / 2) as i64;
        let (w, h) = (self.width as usize, self.height as usize);

        // Premultiplied f32 working copy, tightly packed.
        let mut work: Vec<f32> = Vec::with_capacity(w * h * 4);
        for y in 0..self.height {
            if let Some(row) = self.row(y) {
                for chunk in row.chunks_exact(4) {
                    let a = f32::from(chunk[3]) / 255.0;
                    work.extend_from_slice(&[
                        f32::from(chunk[0]) * a,
                        f32::from(chunk[1]) * a,
                        f32::from(chunk[2]) * a,
                        f32::from(chunk[3]),
                    ]);
                }
            }
        }

        let mut tmp = vec![0.0f32; work.len()];
        let clamp = |v: i64, len: usize| v.clamp(0, len as i64 - 1) as usize;

        // Horizontal pass
        for y in 0..h {
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, weight) in kernel.iter().enumerate() {
                    let sx = clamp(x as i64 + k as i64 - radius, w);
                    let src = (y * w + sx) * 4;
                    for c in 0..4 {
                        acc[c] += work[src + c] * weight;
                    }
                }
                tmp[(y * w + x) * 4..(y * w + x) * 4 + 4].copy_from_slice(&acc);
            }
        }

        // Vertical pass
        for y in 0..h {
            for x in 0..w {
                let mut acc = [0.0f32; 4];
                for (k, weight) in kernel.iter().enumerate() {
                    let sy = clamp(y as i64 + k as i64 - radius, h);
                    let src = (sy * w + x) * 4;
                    for c in 0..4 {
                        acc[c] += tmp[src + c] * weight;
                    }
                }
                work[(y * w + x) * 4..(y * w + x) * 4 + 4].copy_from_slice(&acc);
            }
        }

        for y in 0..h {
            for x in 0..w {
                let src = (y * w + x) * 4;
                let alpha = work[src + 3];
                let unpremultiply = |v: f32| {
                    if alpha > 0.0 {
                        (v * 255.0 / alpha).round().clamp(0.0, 255.0) as u8
                    } else {
                        0
                    }
                };
                let color = Rgba::new(
                    unpremultiply(work[src]),
                    unpremultiply(work[src + 1]),
                    unpremultiply(work[src + 2]),
                    alpha.round().clamp(0.0, 255.0) as u8,
                );
                self.set_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Count pixels for which `predicate` holds.
    #[must_use]
    pub fn count_pixels(&self, predicate: impl Fn(Rgba) -> bool) -> usize {
        (0..self.height)
            .filter_map(|y| self.row(y))
            .flat_map(|row| row.chunks_exact(4))
            .filter(|c| predicate(Rgba::from_array([c[0], c[1], c[2], c[3]])))
            .count()
    }

    /// Get statistics about the framebuffer using SIMD-accelerated reduction.
    ///
    /// Returns (min_luminance, max_luminance, avg_luminance).
    #[must_use]
    pub fn luminance_stats(&self) -> (f32, f32, f32) {
        let mut luminances = Vec::with_capacity(self.pixel_count());

        for y in 0..self.height {
            if let Some(row) = self.row(y) {
                for chunk in row.chunks_exact(4) {
                    // ITU-R BT.709 luminance formula
                    let lum = 0.2126 * f32::from(chunk[0])
                        + 0.7152 * f32::from(chunk[1])
                        + 0.0722 * f32::from(chunk[2]);
                    luminances.push(lum);
                }
            }
        }

        let vec = Vector::from_vec(luminances);

        let min = vec.min().unwrap_or(0.0);
        let max = vec.max().unwrap_or(255.0);
        let mean = vec.mean().unwrap_or(127.5);

        (min, max, mean)
    }

    /// Calculate the byte index for a pixel coordinate.
    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * self.stride + (x as usize) * 4
    }

    /// Get pixel data as a compact buffer without stride padding.
    ///
    /// PNG and other encoders expect tightly-packed rows.
    #[must_use]
    pub fn to_compact_pixels(&self) -> Vec<u8> {
        let row_bytes = (self.width as usize) * 4;

        if self.stride == row_bytes {
            return self.pixels[..row_bytes * (self.height as usize)].to_vec();
        }

        let mut compact = Vec::with_capacity(row_bytes * (self.height as usize));
        for y in 0..self.height {
            let start = (y as usize) * self.stride;
            compact.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        compact
    }
}

/// Normalized 1-D Gaussian kernel covering ±3 sigma.
fn gaussian_kernel(sigma: f32) -> Vec<f32> {
    let radius = (sigma * 3.0).ceil().max(1.0) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius).map(|i| (-((i * i) as f32) / denom).exp()).collect();
    let sum: f32 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= sum;
    }
    kernel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_framebuffer() {
        let fb = Framebuffer::new(100, 50).unwrap();
        assert_eq!(fb.width(), 100);
        assert_eq!(fb.height(), 50);
        assert_eq!(fb.pixel_count(), 5000);
        assert!(fb.stride() >= 400);
        assert_eq!(fb.stride() % SIMD_ALIGNMENT, 0);
    }

    #[test]
    fn test_invalid_dimensions() {
        assert!(Framebuffer::new(0, 100).is_err());
        assert!(Framebuffer::new(100, 0).is_err());
    }

    #[test]
    fn test_clear() {
        let mut fb = Framebuffer::new(37, 9).unwrap();
        fb.clear(Rgba::RED);
        assert_eq!(fb.count_pixels(|p| p == Rgba::RED), 37 * 9);
    }

    #[test]
    fn test_set_get_pixel() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.set_pixel(5, 5, Rgba::BLUE);
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::BLUE));
        assert_eq!(fb.get_pixel(100, 100), None);
    }

    #[test]
    fn test_blend_pixel() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::WHITE);

        fb.blend_pixel(5, 5, Rgba::new(255, 0, 0, 128));

        let result = fb.get_pixel(5, 5).unwrap();
        assert_eq!(result.r, 255);
        assert_eq!(result.g, 127);
        assert_eq!(result.b, 127);
        assert_eq!(result.a, 255);
    }

    #[test]
    fn test_blend_transparent_is_noop() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.clear(Rgba::rgb(13, 77, 201));
        fb.blend_pixel(1, 1, Rgba::RED.with_alpha(0));
        assert_eq!(fb.get_pixel(1, 1), Some(Rgba::rgb(13, 77, 201)));
    }

    #[test]
    fn test_blend_onto_transparent() {
        let mut fb = Framebuffer::new(4, 4).unwrap();
        fb.blend_pixel(0, 0, Rgba::new(0, 0, 255, 64));
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::new(0, 0, 255, 64)));
    }

    #[test]
    fn test_saturate_zero_grays_everything() {
        let mut fb = Framebuffer::new(8, 8).unwrap();
        fb.clear(Rgba::BLUE);
        fb.saturate(0.0);
        let p = fb.get_pixel(3, 3).unwrap();
        assert_eq!(p.r, p.g);
        assert_eq!(p.g, p.b);
    }

    #[test]
    fn test_blur_uniform_image_unchanged() {
        let mut fb = Framebuffer::new(16, 16).unwrap();
        fb.clear(Rgba::rgb(90, 120, 200));
        fb.gaussian_blur(2.0);
        assert_eq!(fb.count_pixels(|p| p == Rgba::rgb(90, 120, 200)), 256);
    }

    #[test]
    fn test_blur_spreads_single_pixel() {
        let mut fb = Framebuffer::new(21, 21).unwrap();
        fb.clear(Rgba::WHITE);
        fb.set_pixel(10, 10, Rgba::BLACK);
        fb.gaussian_blur(1.5);

        let center = fb.get_pixel(10, 10).unwrap();
        let neighbor = fb.get_pixel(11, 10).unwrap();
        assert!(center.r > 0, "center should lighten");
        assert!(neighbor.r < 255, "neighbor should darken");
        assert_eq!(fb.get_pixel(0, 0), Some(Rgba::WHITE));
    }

    #[test]
    fn test_blur_tiny_sigma_noop() {
        let mut fb = Framebuffer::new(5, 5).unwrap();
        fb.clear(Rgba::WHITE);
        fb.set_pixel(2, 2, Rgba::BLACK);
        fb.gaussian_blur(0.0);
        assert_eq!(fb.get_pixel(2, 2), Some(Rgba::BLACK));
    }

    #[test]
    fn test_gaussian_kernel_normalized() {
        let kernel = gaussian_kernel(1.7);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(kernel.len() % 2, 1);
    }

    #[test]
    fn test_luminance_stats() {
        let mut fb = Framebuffer::new(10, 10).unwrap();
        fb.clear(Rgba::rgb(128, 128, 128));

        let (min, max, mean) = fb.luminance_stats();
        assert!((min - max).abs() < 1.0);
        assert!((mean - min).abs() < 1.0);
    }

    #[test]
    fn test_compact_pixels_len() {
        let fb = Framebuffer::new(3, 2).unwrap();
        assert_eq!(fb.to_compact_pixels().len(), 3 * 2 * 4);
    }
}
