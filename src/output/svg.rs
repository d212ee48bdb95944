//! SVG output encoder.
//!
//! The arc raster is embedded as a base64 PNG; axis labels and the control
//! panel are emitted as vector text on top of it.

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::viewer::Frame;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Vertical gap between control panel lines, as a multiple of font size.
const CONTROL_LINE_HEIGHT: f32 = 1.4;
/// Control panel font size in pixels.
const CONTROL_FONT_PX: f32 = 12.0;

/// SVG encoder for framebuffer and overlay output.
#[derive(Debug, Clone)]
pub struct SvgEncoder {
    width: u32,
    height: u32,
    background: Option<Rgba>,
    elements: Vec<SvgElement>,
}

/// An SVG element.
///
/// Field names match SVG attribute names.
#[derive(Debug, Clone)]
#[allow(missing_docs)]
pub enum SvgElement {
    /// Text
    Text { x: f32, y: f32, text: String, font_size: f32, fill: Rgba, anchor: TextAnchor, opacity: f32 },
    /// Embedded raster image (base64 PNG)
    Image { x: f32, y: f32, width: f32, height: f32, data: String },
}

/// Text anchor position for SVG text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Align text start at position
    #[default]
    Start,
    /// Center text at position
    Middle,
    /// Align text end at position
    End,
}

impl TextAnchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

impl SvgEncoder {
    /// Create a new SVG encoder with given dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, background: Some(Rgba::WHITE), elements: Vec::new() }
    }

    /// Create from a framebuffer (embeds as raster image).
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_framebuffer(fb: &Framebuffer) -> Result<Self> {
        let mut encoder = Self::new(fb.width(), fb.height());
        encoder.background = None;

        let png_bytes = super::PngEncoder::to_bytes(fb)?;
        let data = format!("data:image/png;base64,{}", STANDARD.encode(&png_bytes));
        encoder.elements.push(SvgElement::Image {
            x: 0.0,
            y: 0.0,
            width: fb.width() as f32,
            height: fb.height() as f32,
            data,
        });

        Ok(encoder)
    }

    /// Create from a viewer frame: raster arcs, axis labels along the
    /// vertical center, and the control panel when it is visible.
    ///
    /// # Errors
    ///
    /// Returns an error if PNG encoding fails.
    pub fn from_frame(frame: &Frame) -> Result<Self> {
        let mut encoder = Self::from_framebuffer(&frame.image)?;
        let height = frame.image.height();
        let center = height as f32 / 2.0;

        if frame.axis_opacity > 0.0 {
            for label in &frame.labels {
                let font_size = label.font_size_px(height);
                if font_size <= 0.0 {
                    continue;
                }
                encoder.add_element(SvgElement::Text {
                    x: label.x,
                    y: center + font_size / 3.0,
                    text: label.text(),
                    font_size,
                    fill: Rgba::BLACK,
                    anchor: TextAnchor::Start,
                    opacity: frame.axis_opacity,
                });
            }
        }

        if let Some(controls) = &frame.controls {
            for (i, slider) in controls.iter().enumerate() {
                encoder.add_element(SvgElement::Text {
                    x: CONTROL_FONT_PX,
                    y: CONTROL_FONT_PX * CONTROL_LINE_HEIGHT * (i + 1) as f32,
                    text: slider.label(),
                    font_size: CONTROL_FONT_PX,
                    fill: Rgba::BLACK,
                    anchor: TextAnchor::Start,
                    opacity: frame.controls_opacity,
                });
            }
        }

        Ok(encoder)
    }

    /// Add a raw element.
    pub fn add_element(&mut self, element: SvgElement) {
        self.elements.push(element);
    }

    /// Elements added so far.
    #[must_use]
    pub fn elements(&self) -> &[SvgElement] {
        &self.elements
    }

    /// Render to SVG string.
    #[must_use]
    pub fn render(&self) -> String {
        let mut svg = String::with_capacity(4096);

        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#,
            w = self.width,
            h = self.height
        );

        if let Some(bg) = self.background {
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{}"/>"#, rgba_to_css(bg));
        }

        for element in &self.elements {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(self.render().as_bytes())?;
        Ok(())
    }
}

fn rgba_to_css(color: Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!("rgba({},{},{},{:.3})", color.r, color.g, color.b, f32::from(color.a) / 255.0)
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn element_to_svg(element: &SvgElement) -> String {
    match element {
        SvgElement::Text { x, y, text, font_size, fill, anchor, opacity } => {
            let opacity_attr =
                if *opacity < 1.0 { format!(r#" opacity="{:.3}""#, opacity.max(0.0)) } else { String::new() };
            format!(
                r#"<text x="{x}" y="{y}" font-size="{font_size}" fill="{}" text-anchor="{}" font-family="sans-serif"{opacity_attr}>{}</text>"#,
                rgba_to_css(*fill),
                anchor.as_str(),
                escape_xml(text)
            )
        }
        SvgElement::Image { x, y, width, height, data } => {
            format!(r#"<image x="{x}" y="{y}" width="{width}" height="{height}" xlink:href="{data}"/>"#)
        }
    }
}
