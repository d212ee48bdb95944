//! Scroll-driven stage sequencing.
//!
//! The page's scroll range is split into equal stages. Each stage maps its
//! own progress in `[0, 1]` to a [`StageDelta`]: stages already scrolled
//! past report 1, stages not yet reached report 0.

use crate::params::RenderParameters;

/// Scroll position within the page.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollMetrics {
    /// Current vertical scroll offset, in pixels.
    pub scroll_y: f32,
    /// Total height of the scrollable document, in pixels.
    pub scroll_height: f32,
    /// Height of the visible viewport, in pixels.
    pub viewport_height: f32,
}

impl ScrollMetrics {
    /// Fraction of the scrollable range already scrolled, clamped to `[0, 1]`.
    ///
    /// A document no taller than the viewport reports 0.
    #[must_use]
    pub fn relative(&self) -> f32 {
        let range = self.scroll_height - self.viewport_height;
        if range <= 0.0 || !range.is_finite() {
            return 0.0;
        }
        (self.scroll_y / range).clamp(0.0, 1.0)
    }
}

/// Changes a stage applies to the visual state. `None` leaves a field alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StageDelta {
    /// Gaussian blur radius in pixels.
    pub blur_px: Option<f32>,
    /// Saturation factor (1.0 = unchanged, 0.0 = grayscale).
    pub saturation: Option<f32>,
    /// Axis label opacity.
    pub axis_opacity: Option<f32>,
    /// Axis label font scale.
    pub axis_font_scale: Option<f32>,
    /// Lower edge of the visible distance band.
    pub min_distance: Option<f32>,
    /// Upper edge of the visible distance band.
    pub max_distance: Option<f32>,
    /// Whether the control panel is shown.
    pub controls_visible: Option<bool>,
    /// Control panel opacity.
    pub controls_opacity: Option<f32>,
}

/// Everything the stages drive, besides the render parameters they share.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Blur applied to the rendered frame.
    pub blur_px: f32,
    /// Saturation applied to the rendered frame.
    pub saturation: f32,
    /// Axis label opacity.
    pub axis_opacity: f32,
    /// Whether the control panel is shown.
    pub controls_visible: bool,
    /// Control panel opacity.
    pub controls_opacity: f32,
}

impl Default for VisualState {
    fn default() -> Self {
        Self { blur_px: 0.0, saturation: 1.0, axis_opacity: 1.0, controls_visible: false, controls_opacity: 0.0 }
    }
}

impl VisualState {
    /// Merge a delta into this state and into `params`.
    pub fn apply(&mut self, delta: &StageDelta, params: &mut RenderParameters) {
        if let Some(v) = delta.blur_px {
            self.blur_px = v;
        }
        if let Some(v) = delta.saturation {
            self.saturation = v;
        }
        if let Some(v) = delta.axis_opacity {
            self.axis_opacity = v;
        }
        if let Some(v) = delta.axis_font_scale {
            params.axis_font_scale = v;
        }
        if let Some(v) = delta.min_distance {
            params.min_distance = v;
        }
        if let Some(v) = delta.max_distance {
            params.max_distance = v;
        }
        if let Some(v) = delta.controls_visible {
            self.controls_visible = v;
        }
        if let Some(v) = delta.controls_opacity {
            self.controls_opacity = v;
        }
    }
}

/// Maximum blur while the first stage is barely entered.
pub const MAX_BLUR_PX: f32 = 3.0;

/// One scroll stage and the transition it drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stage {
    /// Desaturated, blurred intro that sharpens as it scrolls.
    Blur,
    /// Pause with no change.
    Hold,
    /// Color fades in; the intro blur is cleared.
    Saturate,
    /// Axis labels fade and grow in.
    AxisFadeIn {
        /// Font scale reached at full progress.
        font_scale: f32,
    },
    /// Short-range arcs are hidden progressively.
    MinDistanceSweep {
        /// Minimum distance reached at full progress.
        sweep: f32,
    },
    /// The short-range cut is released while long-range arcs are cut.
    Narrow {
        /// Minimum distance at the start of the stage.
        sweep: f32,
        /// Largest distance on the axis.
        highest: f32,
        /// How far the maximum distance drops over the stage.
        narrow: f32,
    },
    /// Arcs are revealed again from short to long.
    MaxDistanceSweep {
        /// Largest distance on the axis.
        highest: f32,
    },
    /// The control panel appears.
    ControlsReveal,
}

impl Stage {
    /// The delta this stage applies at `progress` (0-1).
    #[must_use]
    pub fn effect(&self, progress: f32) -> StageDelta {
        let p = progress.clamp(0.0, 1.0);
        match *self {
            Self::Blur => StageDelta {
                blur_px: Some(if p > 0.0 { (1.0 / p).min(MAX_BLUR_PX) } else { MAX_BLUR_PX }),
                saturation: Some(0.0),
                ..StageDelta::default()
            },
            Self::Hold => StageDelta::default(),
            Self::Saturate => StageDelta {
                blur_px: Some(0.0),
                saturation: Some((p * 2.0).min(1.0)),
                ..StageDelta::default()
            },
            Self::AxisFadeIn { font_scale } => {
                let factor = (p * 2.0).min(1.0);
                StageDelta {
                    axis_opacity: Some(factor),
                    axis_font_scale: Some(factor * font_scale),
                    ..StageDelta::default()
                }
            }
            Self::MinDistanceSweep { sweep } => StageDelta { min_distance: Some(p * sweep), ..StageDelta::default() },
            Self::Narrow { sweep, highest, narrow } => StageDelta {
                min_distance: Some(if p > 0.0 { sweep - p * sweep } else { 0.0 }),
                max_distance: Some(highest - p * narrow),
                ..StageDelta::default()
            },
            Self::MaxDistanceSweep { highest } => StageDelta {
                max_distance: Some(if p > 0.0 { p * highest } else { highest }),
                ..StageDelta::default()
            },
            Self::ControlsReveal => StageDelta {
                controls_visible: Some(p > 0.0),
                controls_opacity: Some(p),
                ..StageDelta::default()
            },
        }
    }
}

/// Distances used by the default stage list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageSettings {
    /// Largest distance on the axis.
    pub highest: f32,
    /// Minimum distance reached by the sweep stage.
    pub sweep_distance: f32,
    /// How far the narrow stage lowers the maximum distance.
    pub narrow_distance: f32,
    /// Axis font scale after the fade-in.
    pub font_scale: f32,
}

/// Position of the scroll within the stage list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StagePosition {
    /// Index of the current stage.
    pub index: usize,
    /// Progress within the current stage.
    pub progress: f32,
}

/// Ordered stages dispatched by scroll position.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSequencer {
    stages: Vec<Stage>,
}

impl StageSequencer {
    /// Sequence the given stages.
    #[must_use]
    pub fn new(stages: Vec<Stage>) -> Self {
        Self { stages }
    }

    /// The eight-stage scrollytelling sequence.
    #[must_use]
    pub fn standard(settings: &StageSettings) -> Self {
        Self::new(vec![
            Stage::Blur,
            Stage::Hold,
            Stage::Saturate,
            Stage::AxisFadeIn { font_scale: settings.font_scale },
            Stage::MinDistanceSweep { sweep: settings.sweep_distance },
            Stage::Narrow {
                sweep: settings.sweep_distance,
                highest: settings.highest,
                narrow: settings.narrow_distance,
            },
            Stage::MaxDistanceSweep { highest: settings.highest },
            Stage::ControlsReveal,
        ])
    }

    /// The stages in order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether there are no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Current stage and progress within it for a relative scroll in `[0, 1]`.
    ///
    /// The final stage absorbs `relative == 1`. Returns `None` without stages.
    #[must_use]
    pub fn position(&self, relative: f32) -> Option<StagePosition> {
        if self.stages.is_empty() {
            return None;
        }
        let n = self.stages.len() as f32;
        let scaled = relative.clamp(0.0, 1.0) * n;
        let index = (scaled.floor() as usize).min(self.stages.len() - 1);
        Some(StagePosition { index, progress: (scaled - index as f32).clamp(0.0, 1.0) })
    }

    /// Progress of every stage: 1 before the current one, 0 after it.
    #[must_use]
    pub fn progress(&self, relative: f32) -> Vec<f32> {
        let Some(pos) = self.position(relative) else {
            return Vec::new();
        };
        (0..self.stages.len())
            .map(|i| match i.cmp(&pos.index) {
                std::cmp::Ordering::Less => 1.0,
                std::cmp::Ordering::Greater => 0.0,
                std::cmp::Ordering::Equal => pos.progress,
            })
            .collect()
    }

    /// Apply every stage in order, then the current stage once more so its
    /// values win over the reset values of the stages after it.
    pub fn dispatch(&self, relative: f32, visual: &mut VisualState, params: &mut RenderParameters) {
        let Some(pos) = self.position(relative) else {
            return;
        };
        for (stage, progress) in self.stages.iter().zip(self.progress(relative)) {
            visual.apply(&stage.effect(progress), params);
        }
        visual.apply(&self.stages[pos.index].effect(pos.progress), params);
    }
}
