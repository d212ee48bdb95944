//! Arc diagram rendering.
//!
//! Each citation pair becomes one semicircular stroke between its two
//! endpoints on a shared horizontal axis:
//!
//! - `source < target` arcs bulge upward in the upper color,
//!   `source > target` arcs bulge downward in the lower color;
//! - the two halves are separated by a gap that leaves room for axis labels;
//! - strokes are antialiased with a smoothstep ring profile and composited
//!   with a global alpha so dense regions read as darker.
//!
//! Pairs with equal endpoints, and pairs outside the visible distance band,
//! are skipped.

mod geometry;
mod instance;
mod renderer;

pub use geometry::{smoothstep, stroke_coverage, ArcGeometry, Direction, UvRect};
pub use instance::{ArcInstance, InstanceBuffer};
pub use renderer::{ArcRenderer, ArcStyle, Encoding};
