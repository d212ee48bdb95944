//! Arc geometry and stroke shading.
//!
//! All geometry lives in normalized viewport coordinates: `u` runs left to
//! right and `v` bottom to top, both in `[0, 1]`. Pixels are sampled at
//! their centers, so resizing the viewport rescales the picture without
//! changing any arc's normalized shape.

use super::instance::ArcInstance;
use crate::params::RenderParameters;
use crate::scale::AxisRange;

/// Which half of the viewport an arc is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `source < target`: above the axis.
    Upper,
    /// `source > target`: below the axis.
    Lower,
}

impl Direction {
    /// Direction of the relationship `source → target`, or `None` when the
    /// endpoints are equal.
    #[must_use]
    pub fn of(source: f32, target: f32) -> Option<Self> {
        if source < target {
            Some(Self::Upper)
        } else if source > target {
            Some(Self::Lower)
        } else {
            None
        }
    }

    /// The opposite half.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Upper => Self::Lower,
            Self::Lower => Self::Upper,
        }
    }
}

/// Axis-aligned rectangle in normalized viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    /// Left edge.
    pub u_min: f32,
    /// Right edge.
    pub u_max: f32,
    /// Bottom edge.
    pub v_min: f32,
    /// Top edge.
    pub v_max: f32,
}

impl UvRect {
    /// Whether the point lies inside (edges inclusive).
    #[must_use]
    pub fn contains(&self, u: f32, v: f32) -> bool {
        u >= self.u_min && u <= self.u_max && v >= self.v_min && v <= self.v_max
    }
}

/// Resolved shape of one visible arc.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcGeometry {
    /// Half the arc is drawn on.
    pub direction: Direction,
    /// Horizontal center of the arc.
    pub center_u: f32,
    /// Vertical position of the arc's chord.
    pub baseline_v: f32,
    /// Radius of the ideal (zero-thickness) arc.
    pub radius: f32,
    /// Value difference between the endpoints.
    pub distance: f32,
}

impl ArcGeometry {
    /// Resolve an instance into drawable geometry.
    ///
    /// Returns `None` for degenerate instances (equal endpoints) and for
    /// instances outside the parameters' distance band.
    #[must_use]
    pub fn resolve(instance: ArcInstance, axis: &AxisRange, params: &RenderParameters) -> Option<Self> {
        let direction = Direction::of(instance.source, instance.target)?;
        let distance = instance.distance();
        if !params.distance_visible(distance) {
            return None;
        }

        let a = axis.normalize(instance.source);
        let b = axis.normalize(instance.target);
        let shift = params.baseline_shift();
        let baseline_v = match direction {
            Direction::Upper => 0.5 + shift,
            Direction::Lower => 0.5 - shift,
        };

        Some(Self { direction, center_u: (a + b) / 2.0, baseline_v, radius: (a - b).abs() / 2.0, distance })
    }

    /// Left endpoint on the axis.
    #[must_use]
    pub fn start_u(&self) -> f32 {
        self.center_u - self.radius
    }

    /// Right endpoint on the axis.
    #[must_use]
    pub fn end_u(&self) -> f32 {
        self.center_u + self.radius
    }

    /// Stroke coverage at `(u, v)` before the global alpha is applied.
    ///
    /// Points on the wrong side of the baseline are discarded (coverage 0).
    #[must_use]
    pub fn coverage(&self, u: f32, v: f32, params: &RenderParameters) -> f32 {
        let wrong_side = match self.direction {
            Direction::Upper => v < self.baseline_v,
            Direction::Lower => v > self.baseline_v,
        };
        if wrong_side {
            return 0.0;
        }

        let du = u - self.center_u;
        let dv = v - self.baseline_v;
        let distance = (du * du + dv * dv).sqrt();
        stroke_coverage(distance, self.radius, params.line_thickness, params.line_smoothness)
    }

    /// Quad covering every point with non-zero coverage: the half-disc of
    /// radius `radius + thickness/2 + smoothness` on this arc's side.
    #[must_use]
    pub fn bounds(&self, params: &RenderParameters) -> UvRect {
        let reach = self.radius + params.line_thickness / 2.0 + params.line_smoothness;
        let (v_min, v_max) = match self.direction {
            Direction::Upper => (self.baseline_v, self.baseline_v + reach),
            Direction::Lower => (self.baseline_v - reach, self.baseline_v),
        };
        UvRect { u_min: self.center_u - reach, u_max: self.center_u + reach, v_min, v_max }
    }
}

/// GLSL-style Hermite smoothstep.
///
/// With equal edges it degenerates to a step at `edge0`.
#[must_use]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge1 <= edge0 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Antialiased ring profile.
///
/// 1.0 inside a band of width `thickness` centered on `radius`, falling to
/// 0.0 over `smoothness` on either side.
#[must_use]
pub fn stroke_coverage(distance: f32, radius: f32, thickness: f32, smoothness: f32) -> f32 {
    let lo = radius - smoothness;
    let hi = radius + smoothness;
    let half = thickness / 2.0;
    (1.0 - smoothstep(lo, hi, distance - half)) * smoothstep(lo, hi, distance + half)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> RenderParameters {
        RenderParameters { line_thickness: 0.02, line_smoothness: 0.005, ..RenderParameters::default() }
    }

    #[test]
    fn test_direction() {
        assert_eq!(Direction::of(1.0, 2.0), Some(Direction::Upper));
        assert_eq!(Direction::of(2.0, 1.0), Some(Direction::Lower));
        assert_eq!(Direction::of(2.0, 2.0), None);
        assert_eq!(Direction::Upper.flipped(), Direction::Lower);
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_relative_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_relative_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
        assert_relative_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_relative_eq!(smoothstep(0.3, 0.3, 0.2), 0.0);
        assert_relative_eq!(smoothstep(0.3, 0.3, 0.3), 1.0);
    }

    #[test]
    fn test_stroke_full_on_ring() {
        assert_relative_eq!(stroke_coverage(0.25, 0.25, 0.02, 0.005), 1.0);
    }

    #[test]
    fn test_stroke_zero_far_from_ring() {
        assert_relative_eq!(stroke_coverage(0.0, 0.25, 0.02, 0.005), 0.0);
        assert_relative_eq!(stroke_coverage(0.4, 0.25, 0.02, 0.005), 0.0);
    }

    #[test]
    fn test_stroke_soft_edge() {
        // Exactly at the outer edge of the solid band: halfway down the ramp.
        let c = stroke_coverage(0.25 + 0.01, 0.25, 0.02, 0.005);
        assert_relative_eq!(c, 0.5, epsilon = 1e-4);
    }

    #[test]
    fn test_resolve_scenario() {
        let axis = AxisRange::new(10.0, 50.0);
        let p = RenderParameters::for_axis(&axis);

        let up = ArcGeometry::resolve(ArcInstance::new(10.0, 50.0), &axis, &p).unwrap();
        assert_eq!(up.direction, Direction::Upper);
        assert_relative_eq!(up.center_u, 0.5);
        assert_relative_eq!(up.radius, 0.5);
        assert_relative_eq!(up.baseline_v, 0.5 + p.baseline_shift());
        assert_relative_eq!(up.start_u(), 0.0);
        assert_relative_eq!(up.end_u(), 1.0);

        let down = ArcGeometry::resolve(ArcInstance::new(50.0, 10.0), &axis, &p).unwrap();
        assert_eq!(down.direction, Direction::Lower);
        assert_relative_eq!(down.baseline_v, 0.5 - p.baseline_shift());

        assert!(ArcGeometry::resolve(ArcInstance::new(20.0, 20.0), &axis, &p).is_none());
    }

    #[test]
    fn test_resolve_distance_band() {
        let axis = AxisRange::new(0.0, 100.0);
        let p = RenderParameters { min_distance: 10.0, max_distance: 20.0, ..RenderParameters::default() };

        assert!(ArcGeometry::resolve(ArcInstance::new(0.0, 5.0), &axis, &p).is_none());
        assert!(ArcGeometry::resolve(ArcInstance::new(0.0, 10.0), &axis, &p).is_some());
        assert!(ArcGeometry::resolve(ArcInstance::new(0.0, 20.0), &axis, &p).is_some());
        assert!(ArcGeometry::resolve(ArcInstance::new(0.0, 21.0), &axis, &p).is_none());
    }

    #[test]
    fn test_coverage_respects_half_plane() {
        let axis = AxisRange::new(0.0, 1.0);
        let p = params();
        let arc = ArcGeometry::resolve(ArcInstance::new(0.25, 0.75), &axis, &p).unwrap();

        // Top of the ring
        assert_relative_eq!(arc.coverage(0.5, arc.baseline_v + 0.25, &p), 1.0);
        // Mirror point below the baseline is discarded
        assert_relative_eq!(arc.coverage(0.5, arc.baseline_v - 0.25, &p), 0.0);
    }

    #[test]
    fn test_bounds_contain_ring() {
        let axis = AxisRange::new(0.0, 1.0);
        let p = params();
        let arc = ArcGeometry::resolve(ArcInstance::new(0.9, 0.1), &axis, &p).unwrap();
        let bounds = arc.bounds(&p);

        assert!(bounds.contains(0.5, arc.baseline_v - 0.4));
        assert!(bounds.contains(0.1, arc.baseline_v));
        assert!(!bounds.contains(0.5, arc.baseline_v + 0.01));
        assert_relative_eq!(arc.coverage(0.5, bounds.v_min - 0.001, &p), 0.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Coverage is a fraction.
        #[test]
        fn prop_stroke_coverage_bounded(
            distance in 0.0f32..2.0,
            radius in 0.0f32..1.0,
            thickness in 0.0f32..0.1,
            smoothness in 0.0f32..0.05
        ) {
            let c = stroke_coverage(distance, radius, thickness, smoothness);
            prop_assert!((0.0..=1.0).contains(&c), "coverage {c}");
        }

        /// Nothing is drawn outside an arc's bounds or on the far side of its chord.
        #[test]
        fn prop_coverage_confined(
            source in 0.0f32..100.0,
            target in 0.0f32..100.0,
            u in 0.0f32..1.0,
            v in 0.0f32..1.0
        ) {
            let axis = AxisRange::new(0.0, 100.0);
            let params = RenderParameters { max_distance: 100.0, line_thickness: 0.01, ..RenderParameters::default() };
            if let Some(arc) = ArcGeometry::resolve(ArcInstance::new(source, target), &axis, &params) {
                let c = arc.coverage(u, v, &params);
                if c > 0.0 {
                    prop_assert!(arc.bounds(&params).contains(u, v));
                    match arc.direction {
                        Direction::Upper => prop_assert!(v >= arc.baseline_v),
                        Direction::Lower => prop_assert!(v <= arc.baseline_v),
                    }
                }
            }
        }
    }
}
