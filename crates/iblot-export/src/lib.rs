//! iblot-export: Pure format serializers (sans-IO)
//!
//! Converts drawings into output formats: plotter scripts and SVG.
//! Also reads SVG path data back into a drawing.

pub mod import;
pub mod script;
pub mod svg;

use std::fmt::Write;

use log::debug;

use iblot_pipeline::{ExportConfig, ExportFormat, PipelineError, Snapshot};

pub use import::{ImportError, ImportedSvg, from_svg, parse_path_data};
pub use script::{ScriptEffect, ScriptMetadata, polyline_literal, to_script};
pub use svg::{SvgMetadata, build_path_data, to_svg};

/// Errors that can occur while exporting a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The snapshot could not be normalized or the configuration is
    /// invalid.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

/// One-line summary of the configuration, used as the document
/// description.
#[must_use]
pub fn describe(config: &ExportConfig) -> String {
    let mut out = format!(
        "{}x{} {}",
        config.width,
        config.height,
        if config.resolved_flip_y() {
            "y-up"
        } else {
            "y-down"
        }
    );
    if let Some(effect) = config.effect {
        let _ = write!(out, ", effect: {} at {}", effect.kind, effect.intensity.get());
        if let Some(seed) = config.seed.filter(|_| effect.kind.is_stochastic()) {
            let _ = write!(out, ", seed {seed}");
        }
    }
    out
}

/// Export a snapshot in the configured format.
///
/// The drawing is normalized into the output space first. SVG output
/// bakes the effect into the coordinates using `rng`; script output
/// embeds the effect as runtime code instead, so `rng` is unused.
///
/// # Errors
///
/// Returns [`ExportError::Pipeline`] if the snapshot's canvas was never
/// sized or the configuration is invalid. An empty drawing is not an
/// error.
pub fn export(
    snapshot: &Snapshot,
    config: &ExportConfig,
    rng: &mut fastrand::Rng,
) -> Result<String, ExportError> {
    export_titled(snapshot, config, None, rng)
}

/// Like [`export`], with a document title.
///
/// # Errors
///
/// Same as [`export`].
pub fn export_titled(
    snapshot: &Snapshot,
    config: &ExportConfig,
    title: Option<&str>,
    rng: &mut fastrand::Rng,
) -> Result<String, ExportError> {
    let description = describe(config);
    let output = match config.format {
        ExportFormat::Svg => {
            let drawing = iblot_pipeline::process(snapshot, config, rng)?;
            debug!(
                "exporting {} polylines ({} points) as SVG",
                drawing.len(),
                drawing.point_count()
            );
            let metadata = SvgMetadata {
                title,
                description: Some(&description),
            };
            to_svg(&drawing, config.dimensions(), &metadata)
        }
        ExportFormat::Script => {
            config.validate()?;
            let drawing = snapshot.normalized(&config.normalize_options())?;
            debug!(
                "exporting {} polylines ({} points) as script",
                drawing.len(),
                drawing.point_count()
            );
            let effect = config.effect.map(|settings| ScriptEffect {
                settings,
                seed: config.seed,
            });
            let metadata = ScriptMetadata {
                title,
                description: Some(&description),
            };
            to_script(&drawing, config.dimensions(), effect.as_ref(), &metadata)
        }
    };
    Ok(output)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use iblot_pipeline::{Dimensions, Drawing, EffectKind, EffectSettings, Intensity, Point, Polyline};

    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot {
            canvas: Dimensions::new(250.0, 250.0),
            drawing: Drawing::from_polylines(vec![Polyline::new(vec![
                Point::new(10.0, 10.0),
                Point::new(20.0, 20.0),
                Point::new(30.0, 30.0),
            ])]),
        }
    }

    fn rng() -> fastrand::Rng {
        fastrand::Rng::with_seed(7)
    }

    #[test]
    fn script_export_is_flipped() {
        let out = export(&snapshot(), &ExportConfig::default(), &mut rng()).unwrap();
        assert!(out.contains("[[5.0, 120.0], [10.0, 110.0], [15.0, 100.0]]"));
        assert!(out.contains("drawLines(polyline);"));
    }

    #[test]
    fn svg_export_is_not_flipped() {
        let config = ExportConfig {
            format: ExportFormat::Svg,
            ..ExportConfig::default()
        };
        let out = export(&snapshot(), &config, &mut rng()).unwrap();
        assert!(out.contains("M5,5 L10,10 L15,15"));
    }

    #[test]
    fn svg_export_bakes_effect() {
        let config = ExportConfig {
            format: ExportFormat::Svg,
            effect: Some(EffectSettings::new(
                EffectKind::Kaleidoscope,
                Intensity::new(0.5).unwrap(),
            )),
            ..ExportConfig::default()
        };
        let out = export(&snapshot(), &config, &mut rng()).unwrap();
        assert_eq!(out.matches("<path").count(), 6);
    }

    #[test]
    fn script_export_embeds_effect_and_seed() {
        let config = ExportConfig {
            effect: Some(EffectSettings::new(
                EffectKind::Noise,
                Intensity::new(1.0).unwrap(),
            )),
            seed: Some(99),
            ..ExportConfig::default()
        };
        let out = export(&snapshot(), &config, &mut rng()).unwrap();
        assert!(out.contains("bt.setRandSeed(99);"));
        assert!(out.contains("drawLines(transformedPolyline);"));
        assert!(out.starts_with("// 125x125 y-up, effect: Noise at 1, seed 99\n"));
    }

    #[test]
    fn title_is_embedded() {
        let config = ExportConfig {
            format: ExportFormat::Svg,
            ..ExportConfig::default()
        };
        let out = export_titled(&snapshot(), &config, Some("spiral"), &mut rng()).unwrap();
        assert!(out.contains("<title>spiral</title>"));
    }

    #[test]
    fn unsized_canvas_is_an_error() {
        let snapshot = Snapshot {
            canvas: Dimensions::new(0.0, 0.0),
            ..snapshot()
        };
        for format in [ExportFormat::Script, ExportFormat::Svg] {
            let config = ExportConfig {
                format,
                ..ExportConfig::default()
            };
            assert!(matches!(
                export(&snapshot, &config, &mut rng()),
                Err(ExportError::Pipeline(
                    PipelineError::InvalidCanvasDimensions { .. }
                ))
            ));
        }
    }

    #[test]
    fn empty_drawing_exports() {
        let snapshot = Snapshot {
            canvas: Dimensions::new(250.0, 250.0),
            drawing: Drawing::new(),
        };
        let script = export(&snapshot, &ExportConfig::default(), &mut rng()).unwrap();
        assert!(script.contains("const polyline = [\n];"));
    }

    #[test]
    fn describe_mentions_seed_only_for_random_effects() {
        let mut config = ExportConfig {
            effect: Some(EffectSettings::new(
                EffectKind::Wave,
                Intensity::new(0.5).unwrap(),
            )),
            seed: Some(3),
            ..ExportConfig::default()
        };
        assert_eq!(describe(&config), "125x125 y-up, effect: Wave at 0.5");
        config.effect = Some(EffectSettings::new(
            EffectKind::Jitter,
            Intensity::new(0.5).unwrap(),
        ));
        assert_eq!(
            describe(&config),
            "125x125 y-up, effect: Jitter at 0.5, seed 3"
        );
    }
}
