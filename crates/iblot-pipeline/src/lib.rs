//! iblot-pipeline: Pure geometry core (sans-IO).
//!
//! Takes freehand strokes through:
//! session (capture, undo, erase) -> normalization into the output
//! space -> optional fun-zone effect.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! drawings and returns structured data. Serializing to plotter scripts
//! and SVG lives in `iblot-export`; files live in `iblot-cli`.

pub mod config;
pub mod erase;
pub mod normalize;
pub mod session;
pub mod transform;
pub mod types;

pub use config::{ExportConfig, ExportFormat};
pub use erase::erase;
pub use normalize::{NormalizeOptions, denormalize, normalize};
pub use session::{Session, Snapshot};
pub use transform::{EffectKind, EffectSettings, Transform, kaleidoscope_segments};
pub use types::{BoundingBox, Dimensions, Drawing, Intensity, PipelineError, Point, Polyline};

/// Run the preview pipeline: normalize a snapshot into the configured
/// output space, then apply the configured effect (if any).
///
/// This is what a native preview draws and what the SVG exporter
/// serializes. The script exporter embeds the effect as code instead
/// and only needs the normalized drawing.
///
/// Effects are always evaluated in the plotter's +Y-up frame, where the
/// script runtime evaluates them. For unflipped output the result is
/// mirrored back afterwards, so a wave bulges and a spiral twists the
/// same way in every format.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidCanvasDimensions`] if the snapshot's
/// canvas was never sized, and [`PipelineError::InvalidConfig`] if the
/// output size is invalid.
pub fn process(
    snapshot: &Snapshot,
    config: &ExportConfig,
    rng: &mut fastrand::Rng,
) -> Result<Drawing, PipelineError> {
    config.validate()?;
    let options = config.normalize_options();
    let Some(effect) = config.effect else {
        return snapshot.normalized(&options);
    };

    let frame = config.dimensions();
    let y_up = snapshot.normalized(&NormalizeOptions {
        flip_y: true,
        ..options
    })?;
    let transformed = effect.apply(&y_up, frame, rng);
    Ok(if options.flip_y {
        transformed
    } else {
        transformed.map_points(|p, _, _| Point::new(p.x, frame.height - p.y))
    })
}
