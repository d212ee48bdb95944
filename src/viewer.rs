//! Event-driven viewer.
//!
//! [`Viewer`] holds everything that changes while a user resizes, scrolls,
//! and drags sliders. Each event handler updates state and requests a
//! frame; any number of requests before the next [`Viewer::frame`] call
//! collapse into a single render.

use crate::arc::ArcRenderer;
use crate::axis::{axis_labels, AxisLabel};
use crate::controls::{apply_input, build_controls, Slider};
use crate::data::CitationData;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::params::{ParamId, RenderParameters, Viewport};
use crate::scale::AxisRange;
use crate::stages::{ScrollMetrics, StageSequencer, VisualState};
use tracing::debug;

/// Coalesces redraw requests into at most one pending frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameScheduler {
    pending: bool,
    requests: u64,
}

impl FrameScheduler {
    /// Ask for a redraw on the next frame.
    pub fn request_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }

    /// Whether a frame is waiting.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Consume the pending request, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Total requests seen, including coalesced ones.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests
    }
}

/// One rendered frame and the overlays drawn on top of it.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Arcs with post-effects applied.
    pub image: Framebuffer,
    /// Axis labels.
    pub labels: Vec<AxisLabel>,
    /// Axis label opacity.
    pub axis_opacity: f32,
    /// Control panel, present only while it is visible.
    pub controls: Option<Vec<Slider>>,
    /// Control panel opacity.
    pub controls_opacity: f32,
    /// Number of arcs drawn.
    pub arcs_drawn: usize,
}

/// Interactive arc-diagram state.
#[derive(Debug, Clone)]
pub struct Viewer {
    renderer: ArcRenderer,
    axis: AxisRange,
    params: RenderParameters,
    viewport: Viewport,
    visual: VisualState,
    scroll: ScrollMetrics,
    stages: Option<StageSequencer>,
    labels: Vec<AxisLabel>,
    scheduler: FrameScheduler,
    frames_rendered: u64,
}

impl Viewer {
    /// Create a viewer over loaded data. The first frame is already requested.
    #[must_use]
    pub fn new(data: &CitationData, viewport: Viewport) -> Self {
        let params = RenderParameters::for_axis(&data.axis);
        let mut viewer = Self {
            renderer: ArcRenderer::from_data(data),
            axis: data.axis,
            params,
            viewport,
            visual: VisualState::default(),
            scroll: ScrollMetrics { viewport_height: viewport.height as f32, ..ScrollMetrics::default() },
            stages: None,
            labels: Vec::new(),
            scheduler: FrameScheduler::default(),
            frames_rendered: 0,
        };
        viewer.rebuild_labels();
        viewer.scheduler.request_frame();
        viewer
    }

    /// Replace the renderer (style, encoding) while keeping its instances.
    #[must_use]
    pub fn with_renderer(mut self, renderer: ArcRenderer) -> Self {
        self.renderer = renderer;
        self.scheduler.request_frame();
        self
    }

    /// Replace the render parameters.
    #[must_use]
    pub fn with_params(mut self, params: RenderParameters) -> Self {
        self.params = params;
        self.rebuild_labels();
        self.scheduler.request_frame();
        self
    }

    /// Drive the visual state from scroll position through `stages`.
    #[must_use]
    pub fn with_stages(mut self, stages: StageSequencer) -> Self {
        self.stages = Some(stages);
        self.apply_scroll();
        self
    }

    /// Current render parameters.
    #[must_use]
    pub fn params(&self) -> &RenderParameters {
        &self.params
    }

    /// Current visual state.
    #[must_use]
    pub fn visual(&self) -> &VisualState {
        &self.visual
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Axis range of the loaded data.
    #[must_use]
    pub fn axis(&self) -> &AxisRange {
        &self.axis
    }

    /// Current axis labels.
    #[must_use]
    pub fn labels(&self) -> &[AxisLabel] {
        &self.labels
    }

    /// The frame scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    /// Number of frames actually rendered.
    #[must_use]
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// Handle a viewport resize.
    ///
    /// Stages are not re-dispatched; slider values stay until the next scroll.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.scroll.viewport_height = height as f32;
        self.rebuild_labels();
        self.scheduler.request_frame();
    }

    /// Set the total document height used for scroll staging.
    pub fn set_scroll_height(&mut self, scroll_height: f32) {
        self.scroll.scroll_height = scroll_height;
        self.apply_scroll();
    }

    /// Handle a scroll to `scroll_y` pixels.
    pub fn scroll(&mut self, scroll_y: f32) {
        self.scroll.scroll_y = scroll_y;
        self.apply_scroll();
    }

    /// Jump straight to a relative scroll position in `[0, 1]`.
    pub fn scroll_to_fraction(&mut self, fraction: f32) {
        let range = (self.scroll.scroll_height - self.scroll.viewport_height).max(0.0);
        if range <= 0.0 {
            self.scroll.scroll_height = self.scroll.viewport_height * 2.0;
        }
        let range = (self.scroll.scroll_height - self.scroll.viewport_height).max(1.0);
        self.scroll(fraction.clamp(0.0, 1.0) * range);
    }

    /// Handle raw slider input. Returns the stored value.
    ///
    /// # Errors
    ///
    /// Returns an error if `raw` does not parse; state is unchanged then.
    pub fn set_control(&mut self, id: ParamId, raw: &str) -> Result<f32> {
        let value = apply_input(&mut self.params, id, raw)?;
        if id.affects_axis() {
            self.rebuild_labels();
        }
        self.scheduler.request_frame();
        Ok(value)
    }

    /// Slider descriptors for the current parameters.
    #[must_use]
    pub fn controls(&self) -> Vec<Slider> {
        build_controls(&self.params, &self.axis)
    }

    /// Render if a frame is pending.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails; the request is consumed either way.
    pub fn frame(&mut self) -> Result<Option<Frame>> {
        if !self.scheduler.take() {
            return Ok(None);
        }
        self.render().map(Some)
    }

    /// Render unconditionally, clearing any pending request.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid viewport or parameters.
    pub fn render(&mut self) -> Result<Frame> {
        self.scheduler.take();

        let mut image = Framebuffer::new(self.viewport.width, self.viewport.height)?;
        if let Some(bg) = self.renderer.arc_style().background {
            image.clear(bg);
        }
        let arcs_drawn = self.renderer.render_into(&mut image, &self.axis, &self.params)?;
        image.gaussian_blur(self.visual.blur_px);
        image.saturate(self.visual.saturation);

        self.frames_rendered += 1;
        debug!(frame = self.frames_rendered, arcs_drawn, "frame rendered");

        Ok(Frame {
            image,
            labels: self.labels.clone(),
            axis_opacity: self.visual.axis_opacity,
            controls: self.visual.controls_visible.then(|| self.controls()),
            controls_opacity: self.visual.controls_opacity,
            arcs_drawn,
        })
    }

    fn rebuild_labels(&mut self) {
        self.labels =
            axis_labels(self.viewport.width, self.params.axis_spacing, &self.axis, self.params.axis_font_scale);
    }

    fn apply_scroll(&mut self) {
        let Some(stages) = &self.stages else {
            return;
        };
        let font_scale = self.params.axis_font_scale;
        stages.dispatch(self.scroll.relative(), &mut self.visual, &mut self.params);
        if (font_scale - self.params.axis_font_scale).abs() > f32::EPSILON {
            self.rebuild_labels();
        }
        self.scheduler.request_frame();
    }
}

impl batuta_common::display::WithDimensions for Viewer {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.resize(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CitationPair;
    use crate::stages::StageSettings;
    use batuta_common::display::WithDimensions;

    fn data() -> CitationData {
        CitationData::from_pairs(vec![
            CitationPair::new(10.0, 50.0),
            CitationPair::new(50.0, 10.0),
            CitationPair::new(20.0, 20.0),
            CitationPair::new(12.0, 18.0),
        ])
    }

    fn stages(data: &CitationData) -> StageSequencer {
        StageSequencer::standard(&StageSettings {
            highest: data.axis.highest,
            sweep_distance: 10.0,
            narrow_distance: 20.0,
            font_scale: 2.0,
        })
    }

    #[test]
    fn test_initial_frame_pending() {
        let mut viewer = Viewer::new(&data(), Viewport::new(64, 32));
        assert!(viewer.scheduler().is_pending());
        let frame = viewer.frame().unwrap().unwrap();
        assert_eq!(frame.arcs_drawn, 3);
        assert!(viewer.frame().unwrap().is_none());
    }

    #[test]
    fn test_requests_coalesce() {
        let mut viewer = Viewer::new(&data(), Viewport::new(64, 32));
        viewer.frame().unwrap();

        viewer.resize(80, 40);
        viewer.set_control(ParamId::LineAlpha, "0.5").unwrap();
        viewer.set_control(ParamId::LineThickness, "0.01").unwrap();
        viewer.resize(100, 50);

        assert!(viewer.frame().unwrap().is_some());
        assert!(viewer.frame().unwrap().is_none());
        assert_eq!(viewer.frames_rendered(), 2);
        assert!(viewer.scheduler().requests() >= 5);
    }

    #[test]
    fn test_resize_changes_frame_size_and_labels() {
        let mut viewer = Viewer::new(&data(), Viewport::new(500, 100));
        assert_eq!(viewer.labels().len(), 2);

        viewer.set_dimensions(1000, 200);
        assert_eq!(viewer.labels().len(), 4);
        let frame = viewer.frame().unwrap().unwrap();
        assert_eq!(frame.image.width(), 1000);
        assert_eq!(frame.image.height(), 200);
    }

    #[test]
    fn test_axis_spacing_control_rebuilds_labels() {
        let mut viewer = Viewer::new(&data(), Viewport::new(1000, 100));
        viewer.set_control(ParamId::AxisSpacing, "99.6").unwrap();
        assert_eq!(viewer.labels().len(), 10);
    }

    #[test]
    fn test_bad_control_input_keeps_state() {
        let mut viewer = Viewer::new(&data(), Viewport::new(10, 10));
        viewer.frame().unwrap();
        let before = *viewer.params();

        assert!(viewer.set_control(ParamId::LineAlpha, "nope").is_err());
        assert_eq!(*viewer.params(), before);
        assert!(!viewer.scheduler().is_pending());
    }

    #[test]
    fn test_scroll_stages_drive_distance_band() {
        let d = data();
        let mut viewer = Viewer::new(&d, Viewport::new(64, 32)).with_stages(stages(&d));
        viewer.set_scroll_height(32.0 + 800.0);

        // Halfway through the min-distance sweep: only arcs spanning >= 5 remain.
        viewer.scroll(4.5 / 8.0 * 800.0);
        assert!((viewer.params().min_distance - 5.0).abs() < 1e-3);
        let frame = viewer.frame().unwrap().unwrap();
        assert_eq!(frame.arcs_drawn, 3);

        // Start of the page: everything blurred, gray, no axis.
        viewer.scroll(0.0);
        assert!((viewer.visual().saturation - 0.0).abs() < f32::EPSILON);
        let frame = viewer.frame().unwrap().unwrap();
        assert!(frame.controls.is_none());
        assert!(frame.axis_opacity.abs() < f32::EPSILON);
    }

    #[test]
    fn test_resize_keeps_slider_values() {
        let d = data();
        let mut viewer = Viewer::new(&d, Viewport::new(64, 32)).with_stages(stages(&d));
        viewer.scroll_to_fraction(1.0);
        viewer.frame().unwrap();

        viewer.set_control(ParamId::MaxDistance, "10").unwrap();
        viewer.resize(64, 33);
        assert!((viewer.params().max_distance - 10.0).abs() < f32::EPSILON);
        assert!(viewer.visual().controls_visible);

        let frame = viewer.frame().unwrap().unwrap();
        assert_eq!(frame.image.height(), 33);
        assert_eq!(frame.arcs_drawn, 1);
    }

    #[test]
    fn test_sub_pixel_axis_spacing_stays_bounded() {
        let d = data();
        let params = RenderParameters { axis_spacing: 1e-9, ..RenderParameters::for_axis(&d.axis) };
        let viewer = Viewer::new(&d, Viewport::new(64, 32)).with_params(params);
        assert_eq!(viewer.labels().len(), 64);
    }

    #[test]
    fn test_controls_revealed_at_end() {
        let d = data();
        let mut viewer = Viewer::new(&d, Viewport::new(64, 32)).with_stages(stages(&d));
        viewer.scroll_to_fraction(1.0);

        let frame = viewer.frame().unwrap().unwrap();
        let controls = frame.controls.unwrap();
        assert_eq!(controls.len(), crate::params::PARAM_SPECS.len());
        assert!((frame.controls_opacity - 1.0).abs() < f32::EPSILON);
    }
}
