//! Arc rasterization.

use super::geometry::{ArcGeometry, Direction};
use super::instance::InstanceBuffer;
use crate::color::Rgba;
use crate::data::{CitationData, CitationPair};
use crate::error::{Error, Result};
use crate::framebuffer::Framebuffer;
use crate::params::{RenderParameters, Viewport};
use crate::scale::AxisRange;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

/// How arcs are rasterized.
///
/// Both encodings evaluate the same stroke function per pixel and produce
/// identical images; they differ only in which pixels are visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Visit only the pixels inside each arc's bounding quad.
    #[default]
    InstancedQuad,
    /// Visit every pixel of the viewport for every arc.
    FullScreen,
}

impl FromStr for Encoding {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "quad" | "instanced-quad" => Ok(Self::InstancedQuad),
            "full-screen" | "fullscreen" => Ok(Self::FullScreen),
            other => Err(Error::invalid_parameter("encoding", format!("unknown encoding '{other}'"))),
        }
    }
}

/// Colors used when compositing arcs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcStyle {
    /// Color of arcs drawn above the axis (`source < target`).
    pub upper: Rgba,
    /// Color of arcs drawn below the axis (`source > target`).
    pub lower: Rgba,
    /// Surface clear color; `None` leaves the surface transparent.
    pub background: Option<Rgba>,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self { upper: Rgba::BLUE, lower: Rgba::RED, background: Some(Rgba::WHITE) }
    }
}

impl ArcStyle {
    /// Stroke color for a direction.
    #[must_use]
    pub fn color(&self, direction: Direction) -> Rgba {
        match direction {
            Direction::Upper => self.upper,
            Direction::Lower => self.lower,
        }
    }
}

/// Draws one antialiased semicircular arc per citation pair.
///
/// The renderer owns only the write-once instance buffer. Everything that
/// changes between frames is passed to [`ArcRenderer::render`].
///
/// # Example
///
/// ```
/// use citation_arcs::prelude::*;
///
/// let data = CitationData::from_pairs(vec![
///     CitationPair::new(10.0, 50.0),
///     CitationPair::new(50.0, 10.0),
/// ]);
/// let renderer = ArcRenderer::from_data(&data);
/// let params = RenderParameters::for_axis(&data.axis);
/// let fb = renderer.render(&data.axis, &params, Viewport::new(320, 200)).unwrap();
/// assert_eq!(fb.width(), 320);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ArcRenderer {
    instances: InstanceBuffer,
    style: ArcStyle,
    encoding: Encoding,
}

impl ArcRenderer {
    /// Upload pairs into a new renderer.
    #[must_use]
    pub fn new(pairs: &[CitationPair]) -> Self {
        Self { instances: InstanceBuffer::from_pairs(pairs), ..Self::default() }
    }

    /// Upload loaded citation data.
    #[must_use]
    pub fn from_data(data: &CitationData) -> Self {
        Self::new(&data.pairs)
    }

    /// Set the arc colors.
    #[must_use]
    pub fn style(mut self, style: ArcStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the rasterization encoding.
    #[must_use]
    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// The uploaded instances.
    #[must_use]
    pub fn instances(&self) -> &InstanceBuffer {
        &self.instances
    }

    /// Current arc colors.
    #[must_use]
    pub fn arc_style(&self) -> &ArcStyle {
        &self.style
    }

    /// Geometry of every arc the given parameters would draw, in upload order.
    #[must_use]
    pub fn visible_arcs(&self, axis: &AxisRange, params: &RenderParameters) -> Vec<ArcGeometry> {
        self.instances.iter().filter_map(|inst| ArcGeometry::resolve(inst, axis, params)).collect()
    }

    /// Render into a new framebuffer of the viewport's size.
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-sized viewport or invalid parameters.
    pub fn render(&self, axis: &AxisRange, params: &RenderParameters, viewport: Viewport) -> Result<Framebuffer> {
        viewport.validate()?;
        let mut fb = Framebuffer::new(viewport.width, viewport.height)?;
        if let Some(bg) = self.style.background {
            fb.clear(bg);
        }
        self.render_into(&mut fb, axis, params)?;
        Ok(fb)
    }

    /// Composite arcs over an existing framebuffer.
    ///
    /// Returns the number of arcs drawn.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters fail validation.
    pub fn render_into(&self, fb: &mut Framebuffer, axis: &AxisRange, params: &RenderParameters) -> Result<usize> {
        params.validate()?;

        let arcs = self.visible_arcs(axis, params);
        for arc in &arcs {
            let color = self.style.color(arc.direction);
            match self.encoding {
                Encoding::InstancedQuad => draw_quad(fb, arc, params, color),
                Encoding::FullScreen => draw_full_screen(fb, arc, params, color),
            }
        }

        debug!(
            instances = self.instances.len(),
            drawn = arcs.len(),
            encoding = ?self.encoding,
            width = fb.width(),
            height = fb.height(),
            "rendered arcs"
        );
        Ok(arcs.len())
    }
}

/// Normalized coordinates of a pixel center.
#[inline]
fn pixel_to_uv(px: u32, py: u32, width: u32, height: u32) -> (f32, f32) {
    let u = (px as f32 + 0.5) / width as f32;
    let v = 1.0 - (py as f32 + 0.5) / height as f32;
    (u, v)
}

#[inline]
fn shade(fb: &mut Framebuffer, px: u32, py: u32, arc: &ArcGeometry, params: &RenderParameters, color: Rgba) {
    let (u, v) = pixel_to_uv(px, py, fb.width(), fb.height());
    let coverage = arc.coverage(u, v, params);
    if coverage > 0.0 {
        fb.blend_pixel(px, py, color.with_coverage(coverage * params.line_alpha));
    }
}

fn draw_quad(fb: &mut Framebuffer, arc: &ArcGeometry, params: &RenderParameters, color: Rgba) {
    let (w, h) = (fb.width(), fb.height());
    let bounds = arc.bounds(params);

    // Pixel centers inside the quad, widened by one pixel each way.
    let clamp_x = |x: f32| (x as i64).clamp(0, i64::from(w) - 1) as u32;
    let clamp_y = |y: f32| (y as i64).clamp(0, i64::from(h) - 1) as u32;
    let x0 = clamp_x((bounds.u_min * w as f32 - 0.5).floor() - 1.0);
    let x1 = clamp_x((bounds.u_max * w as f32 - 0.5).ceil() + 1.0);
    let y0 = clamp_y(((1.0 - bounds.v_max) * h as f32 - 0.5).floor() - 1.0);
    let y1 = clamp_y(((1.0 - bounds.v_min) * h as f32 - 0.5).ceil() + 1.0);

    for py in y0..=y1 {
        for px in x0..=x1 {
            shade(fb, px, py, arc, params, color);
        }
    }
}

fn draw_full_screen(fb: &mut Framebuffer, arc: &ArcGeometry, params: &RenderParameters, color: Rgba) {
    for py in 0..fb.height() {
        for px in 0..fb.width() {
            shade(fb, px, py, arc, params, color);
        }
    }
}
