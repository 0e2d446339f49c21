//! Plotter script export serializer.
//!
//! Converts a drawing into a self-contained JavaScript program for the
//! plotter runtime, which provides `setDocDimensions`, `drawLines` and
//! the `bt.*` polyline utilities:
//!
//! ```text
//! const width = 125;
//! const height = 125;
//!
//! setDocDimensions(width, height);
//!
//! const polyline = [
//!   [[5.0, 120.0], [10.0, 110.0]],
//! ];
//!
//! drawLines(polyline);
//! ```
//!
//! The drawing is embedded as a `[stroke][point][x, y]` array literal.
//! When an effect is selected, the effect is **not** computed here: its
//! parameters are baked in as literals and the runtime performs the
//! transform itself, binding the result to `transformedPolyline`.
//!
//! The input drawing must already be normalized into the output space
//! (Y flipped, since the runtime draws with +Y up).
//!
//! This is a pure function with no I/O -- it returns a `String`.

use std::fmt::Write;

use iblot_pipeline::transform::{
    IMPLODE_STRENGTH, JITTER_AMOUNT, NOISE_AMOUNT, SPIRAL_GROWTH, SPIRAL_ROTATION, WAVE_AMPLITUDE,
    WAVE_FREQUENCY, kaleidoscope_segments,
};
use iblot_pipeline::{Dimensions, Drawing, EffectKind, EffectSettings};

/// Metadata to embed as `//` comment lines at the top of the script.
#[derive(Debug, Clone, Default)]
pub struct ScriptMetadata<'a> {
    /// Drawing title -- emitted as `// <title>`.
    pub title: Option<&'a str>,

    /// Free-form description (settings, timestamp) -- one `//` line
    /// per input line.
    pub description: Option<&'a str>,
}

/// An effect to express as runtime code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEffect {
    /// The effect and its intensity.
    pub settings: EffectSettings,

    /// Seed passed to `bt.setRandSeed` by the noise and jitter effects.
    /// `None` seeds from `Date.now()`, so every run differs.
    pub seed: Option<u64>,
}

/// Format a number as a JavaScript decimal float literal.
///
/// Finite values always carry a fractional part or exponent (`5.0`,
/// `58.41470984807897`, `1e-7`). Non-finite values become `NaN`,
/// `Infinity` and `-Infinity` so the program still parses.
#[must_use]
pub fn js_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        format!("{value:?}")
    }
}

/// Characters that end a JavaScript line comment.
const JS_LINE_TERMINATORS: [char; 4] = ['\n', '\r', '\u{2028}', '\u{2029}'];

/// Split text on every JavaScript line terminator, so no part of it can
/// escape a `//` comment. `\r\n` yields one break.
fn comment_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n")
        .flat_map(|chunk| chunk.split(JS_LINE_TERMINATORS))
}

/// Format a document dimension: integers without a fraction (`125`).
fn js_dimension(value: f64) -> String {
    if value.is_finite() {
        format!("{value}")
    } else {
        js_number(value)
    }
}

/// Build the `[stroke][point][x, y]` array literal for a drawing.
///
/// One stroke per line, each followed by a comma. Empty polylines are
/// skipped. The empty drawing yields exactly `"[\n]\n"`.
///
/// # Examples
///
/// ```
/// use iblot_pipeline::{Drawing, Point, Polyline};
/// use iblot_export::script::polyline_literal;
///
/// let drawing = Drawing::from_polylines(vec![Polyline::new(vec![
///     Point::new(5.0, 120.0),
///     Point::new(10.0, 110.0),
/// ])]);
/// assert_eq!(polyline_literal(&drawing), "[\n  [[5.0, 120.0], [10.0, 110.0]],\n]\n");
/// assert_eq!(polyline_literal(&Drawing::new()), "[\n]\n");
/// ```
#[must_use]
pub fn polyline_literal(drawing: &Drawing) -> String {
    let mut out = String::from("[\n");
    for polyline in drawing.iter().filter(|pl| !pl.is_empty()) {
        let points = polyline
            .points()
            .iter()
            .map(|p| format!("[{}, {}]", js_number(p.x), js_number(p.y)))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "  [{points}],");
    }
    out.push_str("]\n");
    out
}

/// Serialize a normalized drawing into a plotter script.
///
/// `dimensions` is the output space the drawing was normalized into and
/// becomes the document size. With `effect`, the effect's runtime code
/// is appended and the transformed polyline is drawn instead.
///
/// # Examples
///
/// ```
/// use iblot_pipeline::{Dimensions, Drawing};
/// use iblot_export::script::{ScriptMetadata, to_script};
///
/// let script = to_script(
///     &Drawing::new(),
///     Dimensions::new(125.0, 125.0),
///     None,
///     &ScriptMetadata::default(),
/// );
/// assert!(script.starts_with("const width = 125;"));
/// assert!(script.contains("const polyline = [\n];"));
/// assert!(script.trim_end().ends_with("drawLines(polyline);"));
/// ```
#[must_use]
pub fn to_script(
    drawing: &Drawing,
    dimensions: Dimensions,
    effect: Option<&ScriptEffect>,
    metadata: &ScriptMetadata<'_>,
) -> String {
    let mut out = String::new();

    // --- Metadata header ---
    for text in [metadata.title, metadata.description].into_iter().flatten() {
        for line in comment_lines(text) {
            let _ = writeln!(out, "// {line}");
        }
    }
    if !out.is_empty() {
        out.push('\n');
    }

    // --- Document ---
    let _ = writeln!(out, "const width = {};", js_dimension(dimensions.width));
    let _ = writeln!(out, "const height = {};", js_dimension(dimensions.height));
    let _ = writeln!(out);
    let _ = writeln!(out, "setDocDimensions(width, height);");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "const polyline = {};",
        polyline_literal(drawing).trim_end()
    );
    let _ = writeln!(out);

    match effect {
        None => {
            let _ = writeln!(out, "drawLines(polyline);");
        }
        Some(effect) => {
            let _ = writeln!(out, "// Apply selected effect: {}", effect.settings.kind);
            write_effect(&mut out, effect);
            let _ = writeln!(out);
            let _ = writeln!(out, "drawLines(transformedPolyline);");
        }
    }

    out
}

/// `bt.setRandSeed` argument: the fixed seed, or the clock.
fn seed_expression(seed: Option<u64>) -> String {
    seed.map_or_else(|| "Date.now()".to_string(), |s| s.to_string())
}

/// Append the runtime code binding `transformedPolyline`.
fn write_effect(out: &mut String, effect: &ScriptEffect) {
    let i = effect.settings.intensity.get();
    match effect.settings.kind {
        EffectKind::Wave => {
            let _ = writeln!(
                out,
                "const transformedPolyline = bt.iteratePoints(polyline, (pt, t) => {{
    const [x, y] = pt;
    const waveHeight = {};
    const frequency = {};
    return [x, y + Math.sin(x * frequency) * waveHeight];
}});",
                js_number(i * WAVE_AMPLITUDE),
                js_number(WAVE_FREQUENCY),
            );
        }
        EffectKind::Spiral => {
            let _ = writeln!(
                out,
                "const center = [width / 2, height / 2];
const scale = {};
const rotationFactor = {};

const transformedPolyline = bt.iteratePoints(polyline, (pt, t) => {{
    const [x, y] = pt;
    const dx = x - center[0];
    const dy = y - center[1];
    const angle = Math.atan2(dy, dx) + t * rotationFactor;
    const dist = Math.sqrt(dx * dx + dy * dy) * scale;
    return [
        center[0] + Math.cos(angle) * dist,
        center[1] + Math.sin(angle) * dist
    ];
}});",
                js_number(i.mul_add(SPIRAL_GROWTH, 1.0)),
                js_number(i * SPIRAL_ROTATION),
            );
        }
        EffectKind::Implode => {
            let _ = writeln!(
                out,
                "const center = [width / 2, height / 2];
const implodeFactor = {};

const transformedPolyline = bt.copy(polyline);
bt.originate(transformedPolyline);
bt.scale(transformedPolyline, implodeFactor);
bt.translate(transformedPolyline, center);",
                js_number(i.mul_add(-IMPLODE_STRENGTH, 1.0)),
            );
        }
        EffectKind::Kaleidoscope => {
            let _ = writeln!(
                out,
                "const center = [width / 2, height / 2];
const segments = {};

const transformedPolyline = [];
for (let k = 0; k < segments; k++) {{
    const angle = k * 2 * Math.PI / segments;
    const cos = Math.cos(angle);
    const sin = Math.sin(angle);
    const rotated = bt.iteratePoints(bt.copy(polyline), (pt) => {{
        const [x, y] = pt;
        const dx = x - center[0];
        const dy = y - center[1];
        return [
            center[0] + dx * cos - dy * sin,
            center[1] + dx * sin + dy * cos
        ];
    }});
    transformedPolyline.push(...rotated);
}}",
                kaleidoscope_segments(effect.settings.intensity),
            );
        }
        EffectKind::Noise => {
            let _ = writeln!(
                out,
                "const noiseFactor = {};
bt.setRandSeed({});

const transformedPolyline = bt.iteratePoints(polyline, (pt) => {{
    const [x, y] = pt;
    return [
        x + (bt.rand() - 0.5) * noiseFactor,
        y + (bt.rand() - 0.5) * noiseFactor
    ];
}});",
                js_number(i * NOISE_AMOUNT),
                seed_expression(effect.seed),
            );
        }
        EffectKind::Jitter => {
            let _ = writeln!(
                out,
                "const jitterAmount = {};
bt.setRandSeed({});

// Resample to add more points
const transformedPolyline = bt.copy(polyline);
bt.resample(transformedPolyline, 2);

// Move about half of the points
bt.iteratePoints(transformedPolyline, (pt) => {{
    const [x, y] = pt;
    if (bt.rand() > 0.5) {{
        return [
            x + (bt.rand() - 0.5) * jitterAmount,
            y + (bt.rand() - 0.5) * jitterAmount
        ];
    }}
    return pt;
}});",
                js_number(i * JITTER_AMOUNT),
                seed_expression(effect.seed),
            );
        }
    }
}
