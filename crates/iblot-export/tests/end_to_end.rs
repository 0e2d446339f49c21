//! Integration test: draw in a session, export to both formats, and read
//! the SVG back through the importer.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use iblot_export::{ExportError, export, from_svg};
use iblot_pipeline::{
    Dimensions, EffectKind, EffectSettings, ExportConfig, ExportFormat, Intensity, Point, Session,
    denormalize,
};

fn draw(session: &mut Session, points: &[(f64, f64)]) {
    for &(x, y) in points {
        session.push_point(Point::new(x, y));
    }
    session.finish_stroke();
}

fn flower() -> Session {
    let mut session = Session::new(Dimensions::new(250.0, 250.0));
    draw(&mut session, &[(10.0, 10.0), (20.0, 20.0), (30.0, 30.0)]);
    draw(&mut session, &[(125.0, 60.0), (160.0, 125.0), (125.0, 190.0)]);
    draw(&mut session, &[(200.0, 200.0)]);
    session
}

fn svg_config() -> ExportConfig {
    ExportConfig {
        format: ExportFormat::Svg,
        ..ExportConfig::default()
    }
}

#[test]
fn session_to_script() {
    let session = flower();
    let script = export(
        &session.snapshot(),
        &ExportConfig::default(),
        &mut fastrand::Rng::with_seed(1),
    )
    .expect("export should succeed");

    assert!(script.contains("setDocDimensions(width, height);"));
    assert!(script.contains("  [[5.0, 120.0], [10.0, 110.0], [15.0, 100.0]],"));
    assert!(script.contains("  [[100.0, 25.0]],"));
    assert_eq!(script.matches("\n  [[").count(), 3);
}

#[test]
fn svg_round_trips_through_importer() {
    let session = flower();
    let svg = export(
        &session.snapshot(),
        &svg_config(),
        &mut fastrand::Rng::with_seed(1),
    )
    .unwrap();

    let imported = from_svg(&svg).unwrap();
    let dims = imported.dimensions.expect("exported SVG has a viewBox");
    assert_eq!(dims, Dimensions::new(125.0, 125.0));

    // Scale back onto the capture canvas and compare with the session.
    let restored = denormalize(&imported.drawing, session.canvas(), dims, false).unwrap();
    assert_eq!(restored.len(), session.drawing().len());
    for (a, b) in restored.points().zip(session.drawing().points()) {
        assert!((a.x - b.x).abs() < 1e-3, "{a:?} vs {b:?}");
        assert!((a.y - b.y).abs() < 1e-3, "{a:?} vs {b:?}");
    }
}

#[test]
fn stochastic_svg_export_is_reproducible_with_seed() {
    let session = flower();
    let config = ExportConfig {
        effect: Some(EffectSettings::new(
            EffectKind::Jitter,
            Intensity::new(1.0).unwrap(),
        )),
        seed: Some(2024),
        ..svg_config()
    };
    let a = export(&session.snapshot(), &config, &mut config.rng()).unwrap();
    let b = export(&session.snapshot(), &config, &mut config.rng()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn every_effect_exports_in_both_formats() {
    let snapshot = flower().snapshot();
    for kind in EffectKind::ALL {
        for format in [ExportFormat::Script, ExportFormat::Svg] {
            let config = ExportConfig {
                format,
                effect: Some(EffectSettings::new(kind, Intensity::new(0.7).unwrap())),
                seed: Some(5),
                ..ExportConfig::default()
            };
            let out = export(&snapshot, &config, &mut config.rng()).unwrap();
            assert!(!out.is_empty(), "{kind} as {format} is empty");
        }
    }
}

#[test]
fn export_before_canvas_is_sized_fails() {
    let mut session = Session::new(Dimensions::new(0.0, 0.0));
    draw(&mut session, &[(1.0, 1.0)]);
    let result = export(
        &session.snapshot(),
        &ExportConfig::default(),
        &mut fastrand::Rng::with_seed(1),
    );
    assert!(matches!(result, Err(ExportError::Pipeline(_))));
}

#[test]
fn erased_and_undone_strokes_are_not_exported() {
    let mut session = flower();
    session.undo();
    session.erase(Point::new(20.0, 20.0), 1.0);
    let svg = export(
        &session.snapshot(),
        &svg_config(),
        &mut fastrand::Rng::with_seed(1),
    )
    .unwrap();
    assert_eq!(svg.matches("<path").count(), 2);
    assert!(svg.contains("M5,5 L15,15"));
}
