//! Control-panel generation.
//!
//! Builds one slider descriptor per entry of [`PARAM_SPECS`] and applies
//! raw slider input back onto [`RenderParameters`]. Rendering the sliders
//! is left to the embedding surface.

use crate::error::{Error, Result};
use crate::params::{ParamId, ParamKind, ParamRange, RenderParameters, PARAM_SPECS};
use crate::scale::AxisRange;

/// Lower bound of an undeclared range, as a fraction of the current value.
const DEFAULT_MIN_FACTOR: f32 = 0.1;
/// Upper bound of an undeclared range, as a fraction of the current value.
const DEFAULT_MAX_FACTOR: f32 = 1.9;
/// Step of an undeclared range, as a fraction of the current value.
const DEFAULT_STEP_FACTOR: f32 = 0.05;

/// One labelled slider.
#[derive(Debug, Clone, PartialEq)]
pub struct Slider {
    /// Parameter the slider edits.
    pub id: ParamId,
    /// Lower bound.
    pub min: f32,
    /// Upper bound.
    pub max: f32,
    /// Step size.
    pub step: f32,
    /// Current value.
    pub value: f32,
    /// Integer or float.
    pub kind: ParamKind,
}

impl Slider {
    /// Label text, `"<name>: <value>"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}: {}", self.id.name(), format_value(self.value, self.kind))
    }
}

fn format_value(value: f32, kind: ParamKind) -> String {
    match kind {
        ParamKind::Integer => format!("{value:.0}"),
        ParamKind::Float => format!("{value}"),
    }
}

/// Resolve a declared range against the current value and axis.
fn resolve_range(range: ParamRange, value: f32, axis: &AxisRange) -> (f32, f32, f32) {
    match range {
        ParamRange::FromValue => {
            (value * DEFAULT_MIN_FACTOR, value * DEFAULT_MAX_FACTOR, value * DEFAULT_STEP_FACTOR)
        }
        ParamRange::Fixed { min, max, step } => (min, max, step),
        ParamRange::AxisSpan { step } => (0.0, axis.span(), step),
    }
}

/// Build one slider per tunable parameter, in table order.
#[must_use]
pub fn build_controls(params: &RenderParameters, axis: &AxisRange) -> Vec<Slider> {
    PARAM_SPECS
        .iter()
        .map(|spec| {
            let value = params.get(spec.id);
            let (min, max, step) = resolve_range(spec.range, value, axis);
            Slider { id: spec.id, min, max, step, value, kind: spec.kind }
        })
        .collect()
}

/// Parse raw slider input and store it.
///
/// Integer parameters are rounded to the nearest whole number. Returns the
/// value actually stored.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `raw` is not a finite number.
pub fn apply_input(params: &mut RenderParameters, id: ParamId, raw: &str) -> Result<f32> {
    let parsed: f32 = raw
        .trim()
        .parse()
        .map_err(|_| Error::invalid_parameter(id.name(), format!("'{raw}' is not a number")))?;
    if !parsed.is_finite() {
        return Err(Error::invalid_parameter(id.name(), "must be finite"));
    }

    let value = match id.spec().kind {
        ParamKind::Integer => parsed.round(),
        ParamKind::Float => parsed,
    };
    params.set(id, value);
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_one_slider_per_param() {
        let axis = AxisRange::new(0.0, 200.0);
        let controls = build_controls(&RenderParameters::for_axis(&axis), &axis);
        assert_eq!(controls.len(), PARAM_SPECS.len());
    }

    #[test]
    fn test_undeclared_range_derived_from_value() {
        let axis = AxisRange::new(0.0, 200.0);
        let params = RenderParameters { line_alpha: 0.2, ..RenderParameters::for_axis(&axis) };
        let controls = build_controls(&params, &axis);
        let alpha = controls.iter().find(|s| s.id == ParamId::LineAlpha).unwrap();

        assert_relative_eq!(alpha.min, 0.02, epsilon = 1e-6);
        assert_relative_eq!(alpha.max, 0.38, epsilon = 1e-6);
        assert_relative_eq!(alpha.step, 0.01, epsilon = 1e-6);
        assert_relative_eq!(alpha.value, 0.2);
    }

    #[test]
    fn test_distance_range_spans_axis() {
        let axis = AxisRange::new(5.0, 205.0);
        let controls = build_controls(&RenderParameters::for_axis(&axis), &axis);
        let max = controls.iter().find(|s| s.id == ParamId::MaxDistance).unwrap();

        assert_relative_eq!(max.min, 0.0);
        assert_relative_eq!(max.max, 200.0);
        assert_relative_eq!(max.step, 1.0);
        assert_eq!(max.kind, ParamKind::Integer);
    }

    #[test]
    fn test_apply_input_rounds_integers() {
        let mut params = RenderParameters::default();
        let stored = apply_input(&mut params, ParamId::MinDistance, "12.6").unwrap();
        assert_relative_eq!(stored, 13.0);
        assert_relative_eq!(params.min_distance, 13.0);
    }

    #[test]
    fn test_apply_input_keeps_floats() {
        let mut params = RenderParameters::default();
        apply_input(&mut params, ParamId::LineThickness, " 0.0025 ").unwrap();
        assert_relative_eq!(params.line_thickness, 0.0025);
    }

    #[test]
    fn test_apply_input_rejects_garbage() {
        let mut params = RenderParameters::default();
        assert!(apply_input(&mut params, ParamId::LineAlpha, "lots").is_err());
        assert!(apply_input(&mut params, ParamId::LineAlpha, "inf").is_err());
        assert_relative_eq!(params.line_alpha, RenderParameters::default().line_alpha);
    }

    #[test]
    fn test_label() {
        let slider = Slider {
            id: ParamId::MaxDistance,
            min: 0.0,
            max: 10.0,
            step: 1.0,
            value: 7.0,
            kind: ParamKind::Integer,
        };
        assert_eq!(slider.label(), "max_distance: 7");
    }
}
