//! WebAssembly bindings.
//!
//! Renders citation arc diagrams to PNG bytes in the browser, either one
//! shot or through an event-driven viewer the page forwards resize, scroll
//! and slider events into.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { render_arcs_png, ArcViewer } from 'citation-arcs';
//!
//! await init();
//!
//! const png = render_arcs_png(json, 1280, 720);
//! const blob = new Blob([png], { type: 'image/png' });
//! document.getElementById('arcs').src = URL.createObjectURL(blob);
//!
//! const viewer = new ArcViewer(json, innerWidth, innerHeight, document.body.scrollHeight);
//! addEventListener('scroll', () => viewer.scroll(scrollY));
//! requestAnimationFrame(function draw() {
//!     const frame = viewer.frame();
//!     if (frame) { /* show frame */ }
//!     requestAnimationFrame(draw);
//! });
//! ```

use wasm_bindgen::prelude::*;

use crate::arc::{ArcRenderer, ArcStyle, Encoding};
use crate::config::Config;
use crate::data::{parse_records, CitationData};
use crate::output::PngEncoder;
use crate::params::{ParamId, RenderParameters, Viewport};
use crate::stages::StageSequencer;
use crate::viewer::Viewer;

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {}

/// Options for one-shot rendering.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct ArcOptions {
    width: u32,
    height: u32,
    upper: String,
    lower: String,
    background: String,
    line_alpha: Option<f32>,
    line_thickness: Option<f32>,
    full_screen: bool,
}

#[wasm_bindgen]
impl ArcOptions {
    /// Create default options.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        let config = Config::default();
        Self {
            width: config.viewport.width,
            height: config.viewport.height,
            upper: config.colors.upper,
            lower: config.colors.lower,
            background: config.background,
            line_alpha: None,
            line_thickness: None,
            full_screen: false,
        }
    }

    /// Set width in pixels.
    #[wasm_bindgen]
    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    /// Set height in pixels.
    #[wasm_bindgen]
    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    /// Set the upper arc color (`#RRGGBB`).
    #[wasm_bindgen]
    pub fn upper(mut self, color: &str) -> Self {
        self.upper = color.to_string();
        self
    }

    /// Set the lower arc color (`#RRGGBB`).
    #[wasm_bindgen]
    pub fn lower(mut self, color: &str) -> Self {
        self.lower = color.to_string();
        self
    }

    /// Set the background (`#RRGGBB` or `transparent`).
    #[wasm_bindgen]
    pub fn background(mut self, color: &str) -> Self {
        self.background = color.to_string();
        self
    }

    /// Override the global stroke alpha.
    #[wasm_bindgen]
    pub fn line_alpha(mut self, alpha: f32) -> Self {
        self.line_alpha = Some(alpha);
        self
    }

    /// Override the stroke thickness.
    #[wasm_bindgen]
    pub fn line_thickness(mut self, thickness: f32) -> Self {
        self.line_thickness = Some(thickness);
        self
    }

    /// Evaluate every arc over the full viewport instead of its quad.
    #[wasm_bindgen]
    pub fn full_screen(mut self, enabled: bool) -> Self {
        self.full_screen = enabled;
        self
    }
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcOptions {
    fn style(&self) -> Result<ArcStyle, JsValue> {
        let config = Config {
            background: self.background.clone(),
            colors: crate::config::ColorConfig { upper: self.upper.clone(), lower: self.lower.clone() },
            ..Config::default()
        };
        config.style().map_err(js_err)
    }

    fn apply(&self, params: &mut RenderParameters) {
        if let Some(alpha) = self.line_alpha {
            params.line_alpha = alpha;
        }
        if let Some(thickness) = self.line_thickness {
            params.line_thickness = thickness;
        }
    }

    fn encoding(&self) -> Encoding {
        if self.full_screen {
            Encoding::FullScreen
        } else {
            Encoding::InstancedQuad
        }
    }
}

fn load(json: &str) -> Result<CitationData, JsValue> {
    let records = parse_records(json).map_err(js_err)?;
    Ok(CitationData::from_records(&records))
}

/// Render citation JSON to PNG with default styling.
///
/// # Arguments
///
/// * `json` - Array of `{ "self": [...], "citedBy": [...] }` records
/// * `width`, `height` - Output size in pixels
#[wasm_bindgen]
pub fn render_arcs_png(json: &str, width: u32, height: u32) -> Result<Vec<u8>, JsValue> {
    render_arcs_with(json, ArcOptions::new().width(width).height(height))
}

/// Render citation JSON to PNG with explicit options.
#[wasm_bindgen]
pub fn render_arcs_with(json: &str, options: ArcOptions) -> Result<Vec<u8>, JsValue> {
    let data = load(json)?;
    let mut params = RenderParameters::for_axis(&data.axis);
    options.apply(&mut params);

    let renderer = ArcRenderer::from_data(&data).style(options.style()?).encoding(options.encoding());
    let fb = renderer.render(&data.axis, &params, Viewport::new(options.width, options.height)).map_err(js_err)?;

    PngEncoder::to_bytes(&fb).map_err(js_err)
}

/// Scroll-driven viewer for the browser.
#[wasm_bindgen]
#[derive(Debug)]
pub struct ArcViewer {
    inner: Viewer,
}

#[wasm_bindgen]
impl ArcViewer {
    /// Load citation JSON into a viewer with the standard scroll stages.
    #[wasm_bindgen(constructor)]
    pub fn new(json: &str, width: u32, height: u32, scroll_height: f32) -> Result<ArcViewer, JsValue> {
        let data = load(json)?;
        let config = Config::default();
        let font_scale = RenderParameters::default().axis_font_scale;
        let stages = StageSequencer::standard(&config.stage_settings(data.axis.highest, font_scale));

        let mut inner = Viewer::new(&data, Viewport::new(width, height)).with_stages(stages);
        inner.set_scroll_height(scroll_height);
        web_sys::console::log_1(&format!("citation-arcs: {} arcs loaded", data.pairs.len()).into());
        Ok(Self { inner })
    }

    /// Forward a window resize.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.inner.resize(width, height);
    }

    /// Forward a scroll event.
    pub fn scroll(&mut self, scroll_y: f32) {
        self.inner.scroll(scroll_y);
    }

    /// Forward a document height change.
    pub fn set_scroll_height(&mut self, scroll_height: f32) {
        self.inner.set_scroll_height(scroll_height);
    }

    /// Forward raw slider input for the parameter called `name`.
    pub fn set_control(&mut self, name: &str, raw: &str) -> Result<f32, JsValue> {
        let id: ParamId = name.parse().map_err(js_err)?;
        self.inner.set_control(id, raw).map_err(js_err)
    }

    /// PNG bytes of the next frame, or `undefined` if nothing changed.
    pub fn frame(&mut self) -> Result<Option<js_sys::Uint8Array>, JsValue> {
        let Some(frame) = self.inner.frame().map_err(js_err)? else {
            return Ok(None);
        };
        let bytes = PngEncoder::to_bytes(&frame.image).map_err(js_err)?;
        Ok(Some(js_sys::Uint8Array::from(bytes.as_slice())))
    }

    /// Axis label opacity of the current state.
    pub fn axis_opacity(&self) -> f32 {
        self.inner.visual().axis_opacity
    }

    /// Whether the control panel should be shown.
    pub fn controls_visible(&self) -> bool {
        self.inner.visual().controls_visible
    }
}
