//! Export configuration shared by every front end.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::normalize::NormalizeOptions;
use crate::transform::EffectSettings;
use crate::types::{Dimensions, PipelineError};

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    /// JavaScript program for the plotter runtime.
    #[default]
    Script,
    /// SVG document.
    Svg,
}

impl ExportFormat {
    /// Whether this format uses a +Y-up coordinate system.
    ///
    /// The plotter runtime draws with +Y up, so its coordinates are
    /// flipped by default; SVG is +Y down like the canvas.
    #[must_use]
    pub const fn default_flip_y(self) -> bool {
        match self {
            Self::Script => true,
            Self::Svg => false,
        }
    }

    /// Conventional file extension (without the dot).
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Script => "js",
            Self::Svg => "svg",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Script => "script",
            Self::Svg => "svg",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "script" | "js" | "javascript" => Ok(Self::Script),
            "svg" => Ok(Self::Svg),
            other => Err(PipelineError::InvalidConfig(format!(
                "unknown export format: {other:?}"
            ))),
        }
    }
}

/// Everything an exporter needs besides the drawing itself.
///
/// All fields have defaults matching the fun zone: a 125x125 script,
/// no effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Output format.
    pub format: ExportFormat,

    /// Width of the logical output space.
    pub width: f64,

    /// Height of the logical output space.
    pub height: f64,

    /// Mirror the vertical axis. `None` uses the format's default
    /// (see [`ExportFormat::default_flip_y`]).
    pub flip_y: Option<bool>,

    /// Clamp coordinates to the output space.
    pub clamp: bool,

    /// Effect to apply, if any.
    pub effect: Option<EffectSettings>,

    /// Seed for the noise and jitter effects. `None` draws a fresh seed
    /// for every export.
    pub seed: Option<u64>,
}

impl ExportConfig {
    /// Default output width.
    pub const DEFAULT_WIDTH: f64 = 125.0;
    /// Default output height.
    pub const DEFAULT_HEIGHT: f64 = 125.0;
    /// Default clamping.
    pub const DEFAULT_CLAMP: bool = false;

    /// Size of the logical output space.
    #[must_use]
    pub const fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// Whether the vertical axis is flipped, after format defaults.
    #[must_use]
    pub fn resolved_flip_y(&self) -> bool {
        self.flip_y.unwrap_or_else(|| self.format.default_flip_y())
    }

    /// Normalizer options for this configuration.
    #[must_use]
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            target: self.dimensions(),
            flip_y: self.resolved_flip_y(),
            clamp: self.clamp,
        }
    }

    /// A random source for stochastic effects: seeded when
    /// [`seed`](Self::seed) is set, otherwise freshly seeded.
    #[must_use]
    pub fn rng(&self) -> fastrand::Rng {
        self.seed
            .map_or_else(fastrand::Rng::new, fastrand::Rng::with_seed)
    }

    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] if the output size is
    /// not positive and finite.
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.dimensions().validate().map_err(|_| {
            PipelineError::InvalidConfig(format!(
                "output size must be positive, got {}x{}",
                self.width, self.height
            ))
        })?;
        Ok(())
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::default(),
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            flip_y: None,
            clamp: Self::DEFAULT_CLAMP,
            effect: None,
            seed: None,
        }
    }
}
