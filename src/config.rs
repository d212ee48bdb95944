//! Configuration file support.
//!
//! YAML configuration with precedence: CLI > file > defaults. Every field is
//! optional; a missing file section keeps its defaults.

use crate::arc::{ArcStyle, Encoding};
use crate::color::Rgba;
use crate::error::{Error, Result};
use crate::params::{RenderParameters, Viewport};
use crate::stages::StageSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Output surface size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportConfig {
    /// Width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    Viewport::default().width
}
fn default_height() -> u32 {
    Viewport::default().height
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: default_width(), height: default_height() }
    }
}

impl From<ViewportConfig> for Viewport {
    fn from(c: ViewportConfig) -> Self {
        Viewport::new(c.width, c.height)
    }
}

/// Arc colors as hex strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorConfig {
    /// Color of arcs above the axis.
    #[serde(default = "default_upper")]
    pub upper: String,
    /// Color of arcs below the axis.
    #[serde(default = "default_lower")]
    pub lower: String,
}

fn default_upper() -> String {
    Rgba::BLUE.to_hex()
}
fn default_lower() -> String {
    Rgba::RED.to_hex()
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self { upper: default_upper(), lower: default_lower() }
    }
}

/// Render parameter overrides. Unset fields keep the data-derived value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamOverrides {
    /// Stroke thickness.
    pub line_thickness: Option<f32>,
    /// Global stroke alpha.
    pub line_alpha: Option<f32>,
    /// Edge softness.
    pub line_smoothness: Option<f32>,
    /// Smallest visible distance.
    pub min_distance: Option<f32>,
    /// Largest visible distance.
    pub max_distance: Option<f32>,
    /// Pixels between axis labels.
    pub axis_spacing: Option<f32>,
    /// Axis font size as a percentage of viewport height.
    pub axis_font_scale: Option<f32>,
}

impl ParamOverrides {
    /// Write every set override into `params`.
    pub fn apply(&self, params: &mut RenderParameters) {
        let fields = [
            (self.line_thickness, &mut params.line_thickness),
            (self.line_alpha, &mut params.line_alpha),
            (self.line_smoothness, &mut params.line_smoothness),
            (self.min_distance, &mut params.min_distance),
            (self.max_distance, &mut params.max_distance),
            (self.axis_spacing, &mut params.axis_spacing),
            (self.axis_font_scale, &mut params.axis_font_scale),
        ];
        for (value, slot) in fields {
            if let Some(v) = value {
                *slot = v;
            }
        }
    }
}

/// Scroll stage distances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Minimum distance reached by the sweep stage.
    #[serde(default = "default_sweep_distance")]
    pub sweep_distance: f32,
    /// How far the narrow stage lowers the maximum distance.
    #[serde(default = "default_narrow_distance")]
    pub narrow_distance: f32,
}

fn default_sweep_distance() -> f32 {
    125.0
}
fn default_narrow_distance() -> f32 {
    195.0
}

impl Default for StageConfig {
    fn default() -> Self {
        Self { sweep_distance: default_sweep_distance(), narrow_distance: default_narrow_distance() }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Configuration version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Output size.
    #[serde(default)]
    pub viewport: ViewportConfig,

    /// Background color, or `transparent`.
    #[serde(default = "default_background")]
    pub background: String,

    /// Arc colors.
    #[serde(default)]
    pub colors: ColorConfig,

    /// Render parameter overrides.
    #[serde(default)]
    pub params: ParamOverrides,

    /// Scroll stage distances.
    #[serde(default)]
    pub stages: StageConfig,

    /// Rasterization encoding.
    #[serde(default)]
    pub encoding: Encoding,
}

fn default_version() -> u32 {
    1
}
fn default_background() -> String {
    Rgba::WHITE.to_hex()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            viewport: ViewportConfig::default(),
            background: default_background(),
            colors: ColorConfig::default(),
            params: ParamOverrides::default(),
            stages: StageConfig::default(),
            encoding: Encoding::default(),
        }
    }
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|_| Error::ConfigNotFound(path.display().to_string()))?;
        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Arc colors and background.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for a malformed hex string.
    pub fn style(&self) -> Result<ArcStyle> {
        let background = match self.background.trim() {
            "transparent" | "none" => None,
            hex => Some(Rgba::from_hex(hex)?),
        };
        Ok(ArcStyle {
            upper: Rgba::from_hex(&self.colors.upper)?,
            lower: Rgba::from_hex(&self.colors.lower)?,
            background,
        })
    }

    /// Stage settings for an axis whose largest value is `highest`.
    #[must_use]
    pub fn stage_settings(&self, highest: f32, font_scale: f32) -> StageSettings {
        StageSettings {
            highest,
            sweep_distance: self.stages.sweep_distance,
            narrow_distance: self.stages.narrow_distance,
            font_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = Config::new();
        assert_eq!(config.version, 1);
        assert_eq!(config.viewport, ViewportConfig { width: 1280, height: 720 });
        assert_eq!(config.encoding, Encoding::InstancedQuad);
        assert!((config.stages.sweep_distance - 125.0).abs() < f32::EPSILON);
        assert_eq!(config.style().unwrap(), ArcStyle::default());
    }

    #[test]
    fn test_config_parse_minimal() {
        let config = Config::parse("version: 1").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_parse_full() {
        let yaml = r##"
version: 1
viewport:
  width: 640
  height: 480
background: transparent
colors:
  upper: "#00ff00"
  lower: "#000000"
params:
  line_alpha: 0.5
  max_distance: 40
stages:
  sweep_distance: 10
encoding: full-screen
"##;
        let config = Config::parse(yaml).unwrap();

        assert_eq!(Viewport::from(config.viewport), Viewport::new(640, 480));
        assert_eq!(config.encoding, Encoding::FullScreen);
        assert!((config.stages.narrow_distance - 195.0).abs() < f32::EPSILON);

        let style = config.style().unwrap();
        assert_eq!(style.upper, Rgba::rgb(0, 255, 0));
        assert_eq!(style.lower, Rgba::BLACK);
        assert!(style.background.is_none());

        let mut params = RenderParameters::default();
        config.params.apply(&mut params);
        assert!((params.line_alpha - 0.5).abs() < f32::EPSILON);
        assert!((params.max_distance - 40.0).abs() < f32::EPSILON);
        assert!((params.line_thickness - RenderParameters::default().line_thickness).abs() < f32::EPSILON);
    }

    #[test]
    fn test_config_parse_error_includes_line() {
        let yaml = r"
version: 1
viewport:
  width: wide
";
        let err = Config::parse(yaml).unwrap_err();
        assert!(matches!(err, Error::ConfigParse { line: 4, .. }), "got {err:?}");
        assert!(err.to_string().contains('4'));
    }

    #[test]
    fn test_unknown_param_rejected() {
        assert!(Config::parse("params:\n  line_width: 3\n").is_err());
    }

    #[test]
    fn test_bad_color() {
        let config = Config { background: "#zzz".to_string(), ..Config::default() };
        assert!(matches!(config.style(), Err(Error::InvalidColor(_))));
    }

    #[test]
    fn test_config_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "viewport:\n  width: 300").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.viewport.width, 300);
        assert_eq!(config.viewport.height, 720);
    }

    #[test]
    fn test_config_load_or_default() {
        let config = Config::load_or_default("/nonexistent/path");
        assert_eq!(config.version, 1);
        assert!(matches!(Config::load("/nonexistent/path"), Err(Error::ConfigNotFound(_))));
    }
}
