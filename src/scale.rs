//! Value-to-axis mappings.
//!
//! Every arc endpoint lives on one shared horizontal axis. [`AxisRange`]
//! maps an h-index value to a normalized position in `[0, 1]` and back.

use serde::{Deserialize, Serialize};
use trueno::Vector;

/// Position used for every value when the domain has zero width.
pub const DEGENERATE_POSITION: f32 = 0.5;

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Transform a range value back to the domain.
    fn invert(&self, value: R) -> D;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);
}

/// The lowest and highest value across all citation data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisRange {
    /// Smallest value on the axis.
    pub lowest: f32,
    /// Largest value on the axis.
    pub highest: f32,
}

impl AxisRange {
    /// Create a range, swapping the bounds if given in reverse order.
    #[must_use]
    pub fn new(lowest: f32, highest: f32) -> Self {
        if lowest <= highest {
            Self { lowest, highest }
        } else {
            Self { lowest: highest, highest: lowest }
        }
    }

    /// Compute the range spanned by `values`.
    ///
    /// Non-finite values are ignored. Returns `None` when nothing finite remains.
    #[must_use]
    pub fn from_values(values: &[f32]) -> Option<Self> {
        let finite: Vec<f32> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }

        let vec = Vector::from_vec(finite);
        let lowest = vec.min().unwrap_or(f32::INFINITY);
        let highest = vec.max().unwrap_or(f32::NEG_INFINITY);
        (lowest <= highest).then_some(Self { lowest, highest })
    }

    /// Width of the domain (`highest - lowest`).
    #[must_use]
    pub fn span(&self) -> f32 {
        self.highest - self.lowest
    }

    /// Whether the domain has zero width.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.span().abs() < f32::EPSILON
    }

    /// Whether `value` lies inside the closed range.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.lowest && value <= self.highest
    }

    /// Map a value to `[0, 1]` along the axis.
    ///
    /// Values outside the range clamp to the nearest end. A zero-width
    /// domain maps everything to [`DEGENERATE_POSITION`].
    #[must_use]
    pub fn normalize(&self, value: f32) -> f32 {
        if self.is_degenerate() {
            return DEGENERATE_POSITION;
        }
        ((value - self.lowest) / self.span()).clamp(0.0, 1.0)
    }

    /// Map a normalized position back to the value domain.
    #[must_use]
    pub fn denormalize(&self, position: f32) -> f32 {
        self.lowest + position * self.span()
    }
}

impl Scale<f32, f32> for AxisRange {
    fn scale(&self, value: f32) -> f32 {
        self.normalize(value)
    }

    fn invert(&self, value: f32) -> f32 {
        self.denormalize(value)
    }

    fn domain(&self) -> (f32, f32) {
        (self.lowest, self.highest)
    }
}
