//! SVG export serializer.
//!
//! Converts a drawing into an SVG string with `<path>` elements using
//! the [`svg`] crate for document construction, XML escaping, and path
//! data formatting.
//!
//! Each polyline becomes a separate `<path>` element using `M` (move to)
//! and `L` (line to) commands. The `viewBox` is the output space the
//! drawing was normalized into, so no flip is applied here.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::path::Data;
use svg::node::element::{Description, Path, Title};
use svg::node::{Text, Value};

use iblot_pipeline::{Dimensions, Drawing, Polyline};

/// Stroke width of every exported path, in output units.
pub const STROKE_WIDTH: f64 = 2.0;

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. When present, a `<title>` and/or `<desc>`
/// element is emitted immediately after the opening `<svg>` tag.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title -- emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description -- emitted as `<desc>`.
    ///
    /// Typically the effect settings and a timestamp.
    pub description: Option<&'a str>,
}

/// Build an SVG path `d` attribute string from a polyline.
///
/// Uses `M` for the first point and `L` for subsequent points. A
/// single-point polyline yields a lone `M`; an empty polyline yields an
/// empty string.
///
/// Coordinates are formatted by the [`svg`] crate using `f32` precision.
///
/// # Examples
///
/// ```
/// use iblot_pipeline::{Point, Polyline};
/// use iblot_export::build_path_data;
///
/// let polyline = Polyline::new(vec![
///     Point::new(10.0, 20.0),
///     Point::new(30.0, 40.0),
/// ]);
/// assert_eq!(build_path_data(&polyline), "M10,20 L30,40");
/// ```
#[must_use]
pub fn build_path_data(polyline: &Polyline) -> String {
    let Some((first, rest)) = polyline.points().split_first() else {
        return String::new();
    };

    let mut data = Data::new().move_to((first.x, first.y));
    for p in rest {
        data = data.line_to((p.x, p.y));
    }
    String::from(Value::from(data))
}

/// Serialize a normalized drawing into an SVG document string.
///
/// Every non-empty polyline becomes a `<path>` element. The empty
/// drawing yields a valid document with no paths.
///
/// # Examples
///
/// ```
/// use iblot_pipeline::{Dimensions, Drawing, Point, Polyline};
/// use iblot_export::{SvgMetadata, to_svg};
///
/// let drawing = Drawing::from_polylines(vec![
///     Polyline::new(vec![Point::new(10.0, 15.0), Point::new(12.5, 18.3)]),
/// ]);
/// let metadata = SvgMetadata {
///     title: Some("flower"),
///     description: Some("Exported by iblot"),
/// };
/// let svg = to_svg(&drawing, Dimensions::new(125.0, 125.0), &metadata);
/// assert!(svg.contains("<title>flower</title>"));
/// assert!(svg.contains("<desc>Exported by iblot</desc>"));
/// assert!(svg.contains("M10,15 L12.5,18.3"));
/// ```
#[must_use]
pub fn to_svg(drawing: &Drawing, dimensions: Dimensions, metadata: &SvgMetadata<'_>) -> String {
    let w = dimensions.width;
    let h = dimensions.height;
    let mut doc = Document::new()
        .set("width", w)
        .set("height", h)
        .set("viewBox", (0, 0, w, h));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    for polyline in drawing {
        let d = build_path_data(polyline);
        if d.is_empty() {
            continue;
        }

        let path = Path::new()
            .set("d", d)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", STROKE_WIDTH);
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

#[cfg(test)]
mod tests {
    use iblot_pipeline::Point;

    use super::*;

    fn dims() -> Dimensions {
        Dimensions::new(125.0, 125.0)
    }

    fn line(points: &[(f64, f64)]) -> Polyline {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    // --- build_path_data ---

    #[test]
    fn path_data_single_point_is_lone_move() {
        assert_eq!(build_path_data(&line(&[(5.0, 7.5)])), "M5,7.5");
    }

    #[test]
    fn path_data_empty_polyline() {
        assert_eq!(build_path_data(&Polyline::default()), "");
    }

    #[test]
    fn path_data_three_points() {
        let d = build_path_data(&line(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]));
        assert_eq!(d, "M0,0 L10,0 L10,10");
    }

    // --- to_svg ---

    #[test]
    fn empty_drawing_has_no_paths() {
        let svg = to_svg(&Drawing::new(), dims(), &SvgMetadata::default());
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("viewBox=\"0 0 125 125\""));
        assert!(!svg.contains("<path"));
    }

    #[test]
    fn one_path_per_polyline() {
        let drawing = Drawing::from_polylines(vec![
            line(&[(1.0, 2.0), (3.0, 4.0)]),
            line(&[(5.0, 6.0)]),
            line(&[(7.0, 8.0), (9.0, 10.0), (11.0, 12.0)]),
        ]);
        let svg = to_svg(&drawing, dims(), &SvgMetadata::default());
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains("d=\"M5,6\""));
    }

    #[test]
    fn paths_are_black_unfilled_strokes() {
        let drawing = Drawing::from_polylines(vec![line(&[(1.0, 2.0), (3.0, 4.0)])]);
        let svg = to_svg(&drawing, dims(), &SvgMetadata::default());
        assert!(svg.contains("fill=\"none\""));
        assert!(svg.contains("stroke=\"black\""));
        assert!(svg.contains("stroke-width=\"2\""));
    }

    #[test]
    fn document_size_matches_dimensions() {
        let svg = to_svg(
            &Drawing::new(),
            Dimensions::new(115.0, 80.0),
            &SvgMetadata::default(),
        );
        assert!(svg.contains("width=\"115\""));
        assert!(svg.contains("height=\"80\""));
        assert!(svg.contains("viewBox=\"0 0 115 80\""));
    }

    #[test]
    fn metadata_is_escaped() {
        let metadata = SvgMetadata {
            title: Some("a < b & c"),
            description: None,
        };
        let svg = to_svg(&Drawing::new(), dims(), &metadata);
        assert!(svg.contains("a &lt; b &amp; c"));
        assert!(!svg.contains("<desc>"));
    }
}
