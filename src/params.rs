//! Render parameters and their static control table.
//!
//! [`RenderParameters`] is the per-frame state read by the arc renderer.
//! [`PARAM_SPECS`] declares, for each tunable parameter, whether it is
//! integer- or float-valued and which slider range it uses.

use crate::error::{Error, Result};
use crate::scale::AxisRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Fail unless both sides are at least one pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] for a zero-sized viewport.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }
        Ok(())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Scalar state controlling how arcs and the axis are drawn.
///
/// Line widths are in normalized viewport units (1.0 = full viewport).
/// Distances are in h-index units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParameters {
    /// Stroke width of each arc.
    pub line_thickness: f32,
    /// Global opacity multiplier (0.0-1.0).
    pub line_alpha: f32,
    /// Antialiasing transition width on each side of the stroke.
    pub line_smoothness: f32,
    /// Arcs spanning less than this value difference are hidden.
    pub min_distance: f32,
    /// Arcs spanning more than this value difference are hidden.
    pub max_distance: f32,
    /// Horizontal spacing between axis labels, in pixels.
    pub axis_spacing: f32,
    /// Axis label font size, percent of viewport height. Also sets the gap
    /// between the upper and lower arc halves.
    pub axis_font_scale: f32,
}

impl Default for RenderParameters {
    fn default() -> Self {
        Self {
            line_thickness: 0.0015,
            line_alpha: 0.1,
            line_smoothness: 0.001,
            min_distance: 0.0,
            max_distance: f32::MAX,
            axis_spacing: 250.0,
            axis_font_scale: 2.0,
        }
    }
}

impl RenderParameters {
    /// Defaults with the distance band opened to the full axis span.
    #[must_use]
    pub fn for_axis(axis: &AxisRange) -> Self {
        Self { max_distance: axis.span(), ..Self::default() }
    }

    /// Read a parameter by id.
    #[must_use]
    pub fn get(&self, id: ParamId) -> f32 {
        match id {
            ParamId::LineThickness => self.line_thickness,
            ParamId::LineAlpha => self.line_alpha,
            ParamId::LineSmoothness => self.line_smoothness,
            ParamId::MinDistance => self.min_distance,
            ParamId::MaxDistance => self.max_distance,
            ParamId::AxisSpacing => self.axis_spacing,
            ParamId::AxisFontScale => self.axis_font_scale,
        }
    }

    /// Write a parameter by id, without validation.
    pub fn set(&mut self, id: ParamId, value: f32) {
        match id {
            ParamId::LineThickness => self.line_thickness = value,
            ParamId::LineAlpha => self.line_alpha = value,
            ParamId::LineSmoothness => self.line_smoothness = value,
            ParamId::MinDistance => self.min_distance = value,
            ParamId::MaxDistance => self.max_distance = value,
            ParamId::AxisSpacing => self.axis_spacing = value,
            ParamId::AxisFontScale => self.axis_font_scale = value,
        }
    }

    /// Half-height of the gap between the upper and lower arc baselines,
    /// in normalized viewport units.
    #[must_use]
    pub fn baseline_shift(&self) -> f32 {
        self.axis_font_scale / 200.0
    }

    /// Whether an arc spanning `distance` passes the distance band.
    #[must_use]
    pub fn distance_visible(&self, distance: f32) -> bool {
        distance >= self.min_distance && distance <= self.max_distance
    }

    /// Reject values the renderer cannot draw.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        for spec in PARAM_SPECS {
            let value = self.get(spec.id);
            if value.is_nan() {
                return Err(Error::invalid_parameter(spec.name, "must be a number"));
            }
        }

        for (id, value) in [
            (ParamId::LineThickness, self.line_thickness),
            (ParamId::LineSmoothness, self.line_smoothness),
            (ParamId::AxisFontScale, self.axis_font_scale),
            (ParamId::MinDistance, self.min_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::invalid_parameter(id.name(), "must be finite and non-negative"));
            }
        }

        if !(0.0..=1.0).contains(&self.line_alpha) {
            return Err(Error::invalid_parameter(ParamId::LineAlpha.name(), "must be within [0, 1]"));
        }

        if self.axis_spacing <= 0.0 || !self.axis_spacing.is_finite() {
            return Err(Error::invalid_parameter(ParamId::AxisSpacing.name(), "must be positive"));
        }

        Ok(())
    }
}

/// Identifies one tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamId {
    /// [`RenderParameters::line_thickness`]
    LineThickness,
    /// [`RenderParameters::line_alpha`]
    LineAlpha,
    /// [`RenderParameters::line_smoothness`]
    LineSmoothness,
    /// [`RenderParameters::min_distance`]
    MinDistance,
    /// [`RenderParameters::max_distance`]
    MaxDistance,
    /// [`RenderParameters::axis_spacing`]
    AxisSpacing,
    /// [`RenderParameters::axis_font_scale`]
    AxisFontScale,
}

impl ParamId {
    /// The parameter's declared spec.
    #[must_use]
    pub fn spec(self) -> &'static ParamSpec {
        PARAM_SPECS.iter().find(|s| s.id == self).unwrap_or(&PARAM_SPECS[0])
    }

    /// The parameter's snake_case name.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.spec().name
    }

    /// Whether the parameter takes part in axis-label layout.
    #[must_use]
    pub fn affects_axis(self) -> bool {
        matches!(self, Self::AxisSpacing | Self::AxisFontScale)
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParamId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PARAM_SPECS
            .iter()
            .find(|spec| spec.name == s)
            .map(|spec| spec.id)
            .ok_or_else(|| Error::invalid_parameter(s, "unknown parameter"))
    }
}

/// Whether a parameter holds whole numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    /// Input is rounded to the nearest integer.
    Integer,
    /// Input is stored as parsed.
    Float,
}

/// Declared slider range for a parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamRange {
    /// No declared range: derive one from the current value.
    FromValue,
    /// A fixed `[min, max]` range with `step`.
    Fixed {
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
        /// Slider step.
        step: f32,
    },
    /// `[0, axis span]`, stepping by `step`.
    AxisSpan {
        /// Slider step.
        step: f32,
    },
}

/// Static metadata for one tunable parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpec {
    /// Parameter id.
    pub id: ParamId,
    /// Display and lookup name.
    pub name: &'static str,
    /// Integer or float.
    pub kind: ParamKind,
    /// Declared slider range.
    pub range: ParamRange,
}

/// Every tunable parameter, in control-panel order.
pub const PARAM_SPECS: &[ParamSpec] = &[
    ParamSpec {
        id: ParamId::AxisFontScale,
        name: "axis_font_scale",
        kind: ParamKind::Float,
        range: ParamRange::FromValue,
    },
    ParamSpec {
        id: ParamId::LineThickness,
        name: "line_thickness",
        kind: ParamKind::Float,
        range: ParamRange::FromValue,
    },
    ParamSpec {
        id: ParamId::LineAlpha,
        name: "line_alpha",
        kind: ParamKind::Float,
        range: ParamRange::FromValue,
    },
    ParamSpec {
        id: ParamId::LineSmoothness,
        name: "line_smoothness",
        kind: ParamKind::Float,
        range: ParamRange::FromValue,
    },
    ParamSpec {
        id: ParamId::MaxDistance,
        name: "max_distance",
        kind: ParamKind::Integer,
        range: ParamRange::AxisSpan { step: 1.0 },
    },
    ParamSpec {
        id: ParamId::MinDistance,
        name: "min_distance",
        kind: ParamKind::Integer,
        range: ParamRange::AxisSpan { step: 1.0 },
    },
    ParamSpec {
        id: ParamId::AxisSpacing,
        name: "axis_spacing",
        kind: ParamKind::Integer,
        range: ParamRange::Fixed { min: 50.0, max: 1000.0, step: 10.0 },
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(RenderParameters::default().validate().is_ok());
    }

    #[test]
    fn test_for_axis_opens_band() {
        let params = RenderParameters::for_axis(&AxisRange::new(10.0, 50.0));
        assert!((params.max_distance - 40.0).abs() < f32::EPSILON);
        assert!(params.distance_visible(0.0));
        assert!(params.distance_visible(40.0));
        assert!(!params.distance_visible(40.5));
    }

    #[test]
    fn test_validate_rejects_bad_alpha() {
        let params = RenderParameters { line_alpha: 1.5, ..RenderParameters::default() };
        let err = params.validate().unwrap_err();
        assert!(err.to_string().contains("line_alpha"));
    }

    #[test]
    fn test_validate_rejects_nan() {
        let params = RenderParameters { line_smoothness: f32::NAN, ..RenderParameters::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_thickness() {
        let params = RenderParameters { line_thickness: -0.1, ..RenderParameters::default() };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_get_set_roundtrip_every_param() {
        let mut params = RenderParameters::default();
        for (i, spec) in PARAM_SPECS.iter().enumerate() {
            params.set(spec.id, i as f32 + 0.5);
            assert!((params.get(spec.id) - (i as f32 + 0.5)).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn test_param_names_parse() {
        for spec in PARAM_SPECS {
            assert_eq!(spec.name.parse::<ParamId>().unwrap(), spec.id);
            assert_eq!(spec.id.to_string(), spec.name);
        }
        assert!("viewport".parse::<ParamId>().is_err());
    }

    #[test]
    fn test_every_id_has_one_spec() {
        let ids = [
            ParamId::LineThickness,
            ParamId::LineAlpha,
            ParamId::LineSmoothness,
            ParamId::MinDistance,
            ParamId::MaxDistance,
            ParamId::AxisSpacing,
            ParamId::AxisFontScale,
        ];
        for id in ids {
            assert_eq!(PARAM_SPECS.iter().filter(|s| s.id == id).count(), 1);
        }
    }

    #[test]
    fn test_baseline_shift() {
        let params = RenderParameters::default();
        assert!((params.baseline_shift() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_viewport_validate() {
        assert!(Viewport::new(0, 10).validate().is_err());
        assert!(Viewport::new(10, 10).validate().is_ok());
    }
}
