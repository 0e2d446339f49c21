//! Fun-zone effects: parametric spatial transforms over a whole drawing.
//!
//! This module defines the [`Transform`] trait for pluggable effects and
//! the [`EffectKind`] enum for runtime selection. Every effect takes a
//! drawing plus an [`Intensity`] and returns a new drawing; the input is
//! never modified.
//!
//! Effects work in whatever coordinate space the drawing lives in. The
//! caller passes that space's [`Dimensions`] as the `frame`, whose
//! midpoint is the center used by spiral, implode and kaleidoscope.
//!
//! Noise and jitter draw from an injected [`fastrand::Rng`]. Seed it for
//! reproducible output; use [`fastrand::Rng::new`] for a fresh preview on
//! every call.

use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, Drawing, Intensity, PipelineError, Point, Polyline};

/// Horizontal frequency of the wave effect (radians per unit).
pub const WAVE_FREQUENCY: f64 = 0.1;
/// Wave amplitude at full intensity.
pub const WAVE_AMPLITUDE: f64 = 20.0;
/// Extra rotation (radians) reached at the end of each stroke at full intensity.
pub const SPIRAL_ROTATION: f64 = 10.0;
/// Radial growth of the spiral effect at full intensity.
pub const SPIRAL_GROWTH: f64 = 0.5;
/// Fraction of the offset removed by the implode effect at full intensity.
pub const IMPLODE_STRENGTH: f64 = 0.8;
/// Extra kaleidoscope segments gained across the intensity range.
pub const KALEIDOSCOPE_SEGMENTS: f64 = 8.0;
/// Kaleidoscope segment count at the lowest intensity.
pub const KALEIDOSCOPE_BASE_SEGMENTS: usize = 2;
/// Noise displacement span at full intensity.
pub const NOISE_AMOUNT: f64 = 15.0;
/// Jitter displacement span at full intensity.
pub const JITTER_AMOUNT: f64 = 10.0;
/// Probability that jitter moves a given point.
pub const JITTER_PROBABILITY: f64 = 0.5;

/// Selects which effect to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Vertical sine displacement driven by each point's x coordinate.
    ///
    /// `y' = y + sin(x * 0.1) * (i * 20)`.
    #[default]
    Wave,

    /// Twist each stroke about the frame center, progressively along
    /// the stroke, while pushing points outward.
    Spiral,

    /// Pull every point toward the drawing's bounding-box center and
    /// move the result to the frame center.
    Implode,

    /// Rotated copies of the whole drawing about the frame center.
    ///
    /// Multiplies the polyline count by [`kaleidoscope_segments`].
    Kaleidoscope,

    /// Independent uniform displacement of every point.
    Noise,

    /// Uniform displacement of a random half of the points.
    Jitter,
}

impl EffectKind {
    /// Every effect, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Wave,
        Self::Spiral,
        Self::Implode,
        Self::Kaleidoscope,
        Self::Noise,
        Self::Jitter,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wave => "Wave",
            Self::Spiral => "Spiral",
            Self::Implode => "Implode",
            Self::Kaleidoscope => "Kaleidoscope",
            Self::Noise => "Noise",
            Self::Jitter => "Jitter",
        }
    }

    /// Whether the effect consumes randomness.
    #[must_use]
    pub const fn is_stochastic(self) -> bool {
        matches!(self, Self::Noise | Self::Jitter)
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PipelineError::InvalidConfig(format!("unknown effect: {s:?}")))
    }
}

/// An effect together with its strength.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectSettings {
    /// Which effect.
    pub kind: EffectKind,
    /// How strongly to apply it.
    pub intensity: Intensity,
}

impl EffectSettings {
    /// Pair an effect with an intensity.
    #[must_use]
    pub const fn new(kind: EffectKind, intensity: Intensity) -> Self {
        Self { kind, intensity }
    }

    /// Apply the effect. See [`Transform::apply`].
    #[must_use]
    pub fn apply(&self, drawing: &Drawing, frame: Dimensions, rng: &mut fastrand::Rng) -> Drawing {
        self.kind.apply(drawing, frame, self.intensity, rng)
    }
}

/// Trait for drawing-wide effects.
pub trait Transform {
    /// Produce a transformed copy of `drawing`.
    ///
    /// `frame` is the coordinate space the drawing lives in. `rng` is
    /// only consumed by stochastic effects.
    fn apply(
        &self,
        drawing: &Drawing,
        frame: Dimensions,
        intensity: Intensity,
        rng: &mut fastrand::Rng,
    ) -> Drawing;
}

impl Transform for EffectKind {
    fn apply(
        &self,
        drawing: &Drawing,
        frame: Dimensions,
        intensity: Intensity,
        rng: &mut fastrand::Rng,
    ) -> Drawing {
        let i = intensity.get();
        let center = frame.center();
        match *self {
            Self::Wave => wave(drawing, i),
            Self::Spiral => spiral(drawing, center, i),
            Self::Implode => implode(drawing, center, i),
            Self::Kaleidoscope => kaleidoscope(drawing, center, kaleidoscope_segments(intensity)),
            Self::Noise => noise(drawing, i, rng),
            Self::Jitter => jitter(drawing, i, rng),
        }
    }
}

/// Number of rotated copies the kaleidoscope produces: `floor(i*8) + 2`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn kaleidoscope_segments(intensity: Intensity) -> usize {
    // intensity is in (0, 1], so the product is in (0, 8].
    (intensity.get() * KALEIDOSCOPE_SEGMENTS).floor() as usize + KALEIDOSCOPE_BASE_SEGMENTS
}

fn wave(drawing: &Drawing, i: f64) -> Drawing {
    let amplitude = i * WAVE_AMPLITUDE;
    drawing.map_points(|p, _, _| {
        Point::new(p.x, (p.x * WAVE_FREQUENCY).sin().mul_add(amplitude, p.y))
    })
}

/// `t` runs from 0 at the first point of each stroke to 1 at its last,
/// so the twist accumulates along the stroke.
#[allow(clippy::cast_precision_loss)]
fn spiral(drawing: &Drawing, center: Point, i: f64) -> Drawing {
    let rotation = i * SPIRAL_ROTATION;
    let growth = i.mul_add(SPIRAL_GROWTH, 1.0);
    drawing.map_points(|p, index, len| {
        let t = if len > 1 {
            index as f64 / (len - 1) as f64
        } else {
            0.0
        };
        let dx = p.x - center.x;
        let dy = p.y - center.y;
        let angle = t.mul_add(rotation, dy.atan2(dx));
        let dist = dx.hypot(dy) * growth;
        Point::new(
            angle.cos().mul_add(dist, center.x),
            angle.sin().mul_add(dist, center.y),
        )
    })
}

fn implode(drawing: &Drawing, center: Point, i: f64) -> Drawing {
    let Some(bbox) = drawing.bounding_box() else {
        return drawing.clone();
    };
    let origin = bbox.center();
    let factor = i.mul_add(-IMPLODE_STRENGTH, 1.0);
    drawing.map_points(|p, _, _| {
        Point::new(
            (p.x - origin.x).mul_add(factor, center.x),
            (p.y - origin.y).mul_add(factor, center.y),
        )
    })
}

/// Copy `k` of every polyline is rotated by `k * 2π / segments`. Output
/// is copy-major: the whole drawing at `k = 0`, then at `k = 1`, ...
#[allow(clippy::cast_precision_loss)]
fn kaleidoscope(drawing: &Drawing, center: Point, segments: usize) -> Drawing {
    let mut copies = Vec::with_capacity(drawing.len() * segments);
    for k in 0..segments {
        let angle = k as f64 * TAU / segments as f64;
        let (sin, cos) = angle.sin_cos();
        copies.extend(drawing.iter().map(|polyline| {
            polyline
                .points()
                .iter()
                .map(|p| rotate_about(*p, center, sin, cos))
                .collect::<Polyline>()
        }));
    }
    Drawing::from_polylines(copies)
}

fn rotate_about(p: Point, center: Point, sin: f64, cos: f64) -> Point {
    let dx = p.x - center.x;
    let dy = p.y - center.y;
    Point::new(
        dx.mul_add(cos, -(dy * sin)) + center.x,
        dx.mul_add(sin, dy * cos) + center.y,
    )
}

/// Uniform offset in `[-0.5, 0.5) * amount`.
fn offset(rng: &mut fastrand::Rng, amount: f64) -> f64 {
    (rng.f64() - 0.5) * amount
}

fn noise(drawing: &Drawing, i: f64, rng: &mut fastrand::Rng) -> Drawing {
    let amount = i * NOISE_AMOUNT;
    drawing.map_points(|p, _, _| {
        Point::new(p.x + offset(rng, amount), p.y + offset(rng, amount))
    })
}

fn jitter(drawing: &Drawing, i: f64, rng: &mut fastrand::Rng) -> Drawing {
    let amount = i * JITTER_AMOUNT;
    drawing.map_points(|p, _, _| {
        if rng.f64() < JITTER_PROBABILITY {
            Point::new(p.x + offset(rng, amount), p.y + offset(rng, amount))
        } else {
            p
        }
    })
}
