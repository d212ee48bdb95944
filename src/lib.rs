//! # citation-arcs
//!
//! Arc diagrams of h-index citation relationships, rendered in pure Rust.
//!
//! Every citation pair `(self, cited_by)` in the input becomes one
//! antialiased semicircle between its two values on a shared horizontal
//! axis. Arcs where the citing value is larger bulge upward, the rest bulge
//! downward, and a global stroke alpha lets dense regions build up.
//!
//! ## Features
//!
//! - **Pure Rust**: software rasterizer, no GPU or browser required
//! - **Two encodings**: per-arc bounding quads or full-viewport evaluation,
//!   pixel-identical
//! - **Interactive state**: scroll stages, sliders, and coalesced redraws
//!   through [`viewer::Viewer`]
//! - **Outputs**: PNG and SVG (raster plus vector labels)
//!
//! ## Quick Start
//!
//! ```rust
//! use citation_arcs::prelude::*;
//!
//! let data = CitationData::from_records(&[CitationRecord::new(&[10.0, 20.0], &[50.0])]);
//! let params = RenderParameters::for_axis(&data.axis);
//! let fb = ArcRenderer::from_data(&data).render(&data.axis, &params, Viewport::new(640, 360))?;
//! let png = PngEncoder::to_bytes(&fb)?;
//! assert!(!png.is_empty());
//! # Ok::<(), citation_arcs::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable parallel processing in trueno
//! - `wasm`: WebAssembly bindings

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types and filters.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Axis normalization.
pub mod scale;

/// Citation records and pairs.
pub mod data;

/// Render parameters and viewport.
pub mod params;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Arc rasterization.
pub mod arc;

/// Axis labels.
pub mod axis;

/// Output encoders (PNG, SVG).
pub mod output;

// ============================================================================
// Interaction Modules
// ============================================================================

/// Slider descriptors and input handling.
pub mod controls;

/// Scroll-driven stages.
pub mod stages;

/// Event-driven viewer and frame scheduling.
pub mod viewer;

/// YAML configuration.
pub mod config;

/// WebAssembly bindings for browser usage.
#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for citation-arcs operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use citation_arcs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::arc::{ArcRenderer, ArcStyle, Direction, Encoding};
    pub use crate::axis::{axis_labels, AxisLabel};
    pub use crate::color::Rgba;
    pub use crate::config::Config;
    pub use crate::controls::Slider;
    pub use crate::data::{CitationData, CitationPair, CitationRecord};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::output::{PngEncoder, SvgEncoder};
    pub use crate::params::{ParamId, RenderParameters, Viewport};
    pub use crate::scale::{AxisRange, Scale};
    pub use crate::stages::{StageSequencer, StageSettings};
    pub use crate::viewer::{Frame, Viewer};
    pub use batuta_common::display::WithDimensions;
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
