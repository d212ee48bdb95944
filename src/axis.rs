//! Axis labels.
//!
//! Labels are placed every `spacing` pixels from the left edge; each shows
//! the value at its pixel position, recovered by inverting the arc
//! renderer's normalization.

use crate::scale::AxisRange;

/// One axis tick label.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLabel {
    /// Horizontal pixel offset of the label's left edge.
    pub x: f32,
    /// Value at that position, rounded to the nearest integer.
    pub value: f32,
    /// Font size as a percentage of viewport height.
    pub font_scale: f32,
}

impl AxisLabel {
    /// Label text.
    #[must_use]
    pub fn text(&self) -> String {
        format!("{:.0}", self.value)
    }

    /// Font size in pixels for a viewport of `viewport_height`.
    #[must_use]
    pub fn font_size_px(&self, viewport_height: u32) -> f32 {
        self.font_scale / 100.0 * viewport_height as f32
    }
}

/// Evenly spaced labels across an axis `width` pixels wide.
///
/// Produces `ceil(width / spacing)` labels starting at x = 0. Spacing below
/// one pixel is treated as one pixel. A zero width or non-positive spacing
/// yields no labels.
#[must_use]
pub fn axis_labels(width: u32, spacing: f32, axis: &AxisRange, font_scale: f32) -> Vec<AxisLabel> {
    if width == 0 || !spacing.is_finite() || spacing <= 0.0 {
        return Vec::new();
    }

    let spacing = spacing.max(1.0);
    let width_px = width as f32;
    let count = (width_px / spacing).ceil() as usize;

    (0..count)
        .map(|i| {
            let x = i as f32 * spacing;
            AxisLabel { x, value: axis.denormalize(x / width_px).round(), font_scale }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_count() {
        let axis = AxisRange::new(0.0, 100.0);
        assert_eq!(axis_labels(1000, 250.0, &axis, 2.0).len(), 4);
        assert_eq!(axis_labels(1001, 250.0, &axis, 2.0).len(), 5);
        assert_eq!(axis_labels(100, 250.0, &axis, 2.0).len(), 1);
    }

    #[test]
    fn test_label_values_invert_normalization() {
        let axis = AxisRange::new(10.0, 50.0);
        let labels = axis_labels(400, 100.0, &axis, 2.0);

        let values: Vec<f32> = labels.iter().map(|l| l.value).collect();
        assert_eq!(values, vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(labels[2].x, 200.0);
        assert_eq!(labels[2].text(), "30");
    }

    #[test]
    fn test_degenerate_inputs() {
        let axis = AxisRange::new(0.0, 10.0);
        assert!(axis_labels(0, 100.0, &axis, 2.0).is_empty());
        assert!(axis_labels(100, 0.0, &axis, 2.0).is_empty());
        assert!(axis_labels(100, -5.0, &axis, 2.0).is_empty());
        assert!(axis_labels(100, f32::NAN, &axis, 2.0).is_empty());
    }

    #[test]
    fn test_sub_pixel_spacing_is_capped() {
        let axis = AxisRange::new(0.0, 10.0);
        let labels = axis_labels(100, 1e-9, &axis, 2.0);
        assert_eq!(labels.len(), 100);
        assert_eq!(labels[99].x, 99.0);
        assert_eq!(axis_labels(100, 0.5, &axis, 2.0).len(), 100);
    }

    #[test]
    fn test_font_size_px() {
        let label = AxisLabel { x: 0.0, value: 0.0, font_scale: 2.0 };
        assert!((label.font_size_px(800) - 16.0).abs() < 1e-4);
    }
}
