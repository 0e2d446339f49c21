//! Shared types for the iblot geometry pipeline.

use geo::BoundingRect;
use serde::{Deserialize, Serialize};

/// A 2D point.
///
/// The coordinate space depends on where the point came from: canvas
/// pixels for freshly drawn strokes, `[0, 1]` for detected contours, or
/// the logical output space after normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position (+Y down unless the drawing was flipped).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

impl From<Point> for geo::Point<f64> {
    fn from(p: Point) -> Self {
        Self::new(p.x, p.y)
    }
}

impl From<geo::Coord<f64>> for Point {
    fn from(c: geo::Coord<f64>) -> Self {
        Self::new(c.x, c.y)
    }
}

/// One stroke: an ordered sequence of connected points.
///
/// Point order is the order the stroke was drawn (or the contour was
/// traced) and is significant -- the plotter traces it as a polyline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Appends a point to the end of the polyline.
    pub fn push(&mut self, point: Point) {
        self.0.push(point);
    }

    /// Consumes the polyline and returns the underlying vector of points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        self.0
    }
}

impl FromIterator<Point> for Polyline {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// The full ordered collection of strokes at a point in time.
///
/// Stroke order is preserved and never rearranged. Empty polylines are
/// rejected by [`push`](Self::push), construction and deserialization,
/// so an exported drawing never carries a stroke with nothing to trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Polyline>", into = "Vec<Polyline>")]
pub struct Drawing(Vec<Polyline>);

impl Drawing {
    /// Create an empty drawing.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a drawing from polylines, discarding empty ones.
    #[must_use]
    pub fn from_polylines(polylines: Vec<Polyline>) -> Self {
        polylines.into_iter().collect()
    }

    /// Returns `true` if the drawing has no polylines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of polylines.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of points across all polylines.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.0.iter().map(Polyline::len).sum()
    }

    /// Returns a slice of all polylines in stroke order.
    #[must_use]
    pub fn polylines(&self) -> &[Polyline] {
        &self.0
    }

    /// Iterate over the polylines in stroke order.
    pub fn iter(&self) -> std::slice::Iter<'_, Polyline> {
        self.0.iter()
    }

    /// Iterate over every point of every polyline.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.0.iter().flat_map(|pl| pl.points().iter().copied())
    }

    /// Append a polyline. Returns `false` (and drops it) if it is empty.
    pub fn push(&mut self, polyline: Polyline) -> bool {
        if polyline.is_empty() {
            return false;
        }
        self.0.push(polyline);
        true
    }

    /// Remove and return the most recent polyline.
    pub fn pop(&mut self) -> Option<Polyline> {
        self.0.pop()
    }

    /// Remove every polyline.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Build a new drawing by mapping every point.
    ///
    /// The closure receives the point, its index within its polyline and
    /// that polyline's length. Polyline structure is preserved exactly.
    #[must_use]
    pub fn map_points<F>(&self, mut f: F) -> Self
    where
        F: FnMut(Point, usize, usize) -> Point,
    {
        Self(
            self.0
                .iter()
                .map(|pl| {
                    let len = pl.len();
                    pl.points()
                        .iter()
                        .enumerate()
                        .map(|(i, &p)| f(p, i, len))
                        .collect()
                })
                .collect(),
        )
    }

    /// Axis-aligned bounding box of every point, or `None` when the
    /// drawing has no points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let multi: geo::MultiPoint<f64> = self.points().map(geo::Point::from).collect();
        multi.bounding_rect().map(|rect| BoundingBox {
            min: rect.min().into(),
            max: rect.max().into(),
        })
    }

    /// Consumes the drawing and returns the underlying polylines.
    #[must_use]
    pub fn into_polylines(self) -> Vec<Polyline> {
        self.0
    }
}

impl FromIterator<Polyline> for Drawing {
    fn from_iter<I: IntoIterator<Item = Polyline>>(iter: I) -> Self {
        Self(iter.into_iter().filter(|pl| !pl.is_empty()).collect())
    }
}

impl From<Vec<Polyline>> for Drawing {
    fn from(polylines: Vec<Polyline>) -> Self {
        Self::from_polylines(polylines)
    }
}

impl From<Drawing> for Vec<Polyline> {
    fn from(drawing: Drawing) -> Self {
        drawing.0
    }
}

impl<'a> IntoIterator for &'a Drawing {
    type Item = &'a Polyline;
    type IntoIter = std::slice::Iter<'a, Polyline>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Corner with the smallest coordinates.
    pub min: Point,
    /// Corner with the largest coordinates.
    pub max: Point,
}

impl BoundingBox {
    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(
            f64::midpoint(self.min.x, self.max.x),
            f64::midpoint(self.min.y, self.max.y),
        )
    }
}

/// Size of a coordinate space.
///
/// Used both for the source canvas a drawing was captured on and for
/// the fixed logical output space exporters write into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in the space's units.
    pub width: f64,
    /// Height in the space's units.
    pub height: f64,
}

impl Dimensions {
    /// The `[0, 1]` space detected contours are delivered in.
    pub const UNIT: Self = Self::new(1.0, 1.0);

    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Midpoint of the space.
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Check that both sides are finite and strictly positive.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidCanvasDimensions`] otherwise.
    pub fn validate(self) -> Result<Self, PipelineError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(self.width) && valid(self.height) {
            Ok(self)
        } else {
            Err(PipelineError::InvalidCanvasDimensions {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Effect strength, a scalar in `(0, 1]`.
///
/// Each effect maps intensity linearly into its own parameters (wave
/// amplitude, spiral rotation, ...).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Intensity(f64);

impl Intensity {
    /// Full strength.
    pub const MAX: Self = Self(1.0);

    /// Create an intensity.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidConfig`] unless `0 < value <= 1`.
    pub fn new(value: f64) -> Result<Self, PipelineError> {
        if value > 0.0 && value <= 1.0 {
            Ok(Self(value))
        } else {
            Err(PipelineError::InvalidConfig(format!(
                "intensity must be in (0, 1], got {value}"
            )))
        }
    }

    /// The raw value.
    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self(0.5)
    }
}

impl TryFrom<f64> for Intensity {
    type Error = PipelineError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Intensity> for f64 {
    fn from(intensity: Intensity) -> Self {
        intensity.0
    }
}

/// Errors that can occur in the geometry pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum PipelineError {
    /// The coordinate space has a zero, negative or non-finite side.
    ///
    /// Usually means the canvas size was read before the first layout.
    #[error("invalid canvas dimensions {width}x{height}: both sides must be positive")]
    InvalidCanvasDimensions {
        /// Offending width.
        width: f64,
        /// Offending height.
        height: f64,
    },

    /// Configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn polyline(points: &[(f64, f64)]) -> Polyline {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    // --- Point tests ---

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_distance_to_self_is_zero() {
        let p = Point::new(7.0, 11.0);
        assert!((p.distance(p)).abs() < f64::EPSILON);
    }

    // --- Polyline tests ---

    #[test]
    fn polyline_empty() {
        let pl = Polyline::new(vec![]);
        assert!(pl.is_empty());
        assert_eq!(pl.len(), 0);
        assert!(pl.first().is_none());
        assert!(pl.last().is_none());
    }

    #[test]
    fn polyline_push_keeps_order() {
        let mut pl = Polyline::default();
        pl.push(Point::new(1.0, 2.0));
        pl.push(Point::new(3.0, 4.0));
        assert_eq!(pl.first(), Some(&Point::new(1.0, 2.0)));
        assert_eq!(pl.last(), Some(&Point::new(3.0, 4.0)));
    }

    // --- Drawing tests ---

    #[test]
    fn drawing_push_rejects_empty_polyline() {
        let mut drawing = Drawing::new();
        assert!(!drawing.push(Polyline::default()));
        assert!(drawing.is_empty());
        assert!(drawing.push(polyline(&[(0.0, 0.0)])));
        assert_eq!(drawing.len(), 1);
    }

    #[test]
    fn drawing_from_polylines_drops_empty() {
        let drawing = Drawing::from_polylines(vec![
            polyline(&[(0.0, 0.0), (1.0, 1.0)]),
            Polyline::default(),
            polyline(&[(2.0, 2.0)]),
        ]);
        assert_eq!(drawing.len(), 2);
        assert_eq!(drawing.point_count(), 3);
    }

    #[test]
    fn drawing_pop_removes_last_stroke() {
        let mut drawing =
            Drawing::from_polylines(vec![polyline(&[(0.0, 0.0)]), polyline(&[(5.0, 5.0)])]);
        assert_eq!(drawing.pop(), Some(polyline(&[(5.0, 5.0)])));
        assert_eq!(drawing.len(), 1);
        drawing.clear();
        assert!(drawing.is_empty());
        assert_eq!(drawing.pop(), None);
    }

    #[test]
    fn map_points_passes_local_index_and_length() {
        let drawing = Drawing::from_polylines(vec![
            polyline(&[(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]),
            polyline(&[(0.0, 0.0)]),
        ]);
        #[allow(clippy::cast_precision_loss)]
        let mapped = drawing.map_points(|_, i, len| Point::new(i as f64, len as f64));
        assert_eq!(
            mapped.polylines()[0],
            polyline(&[(0.0, 3.0), (1.0, 3.0), (2.0, 3.0)])
        );
        assert_eq!(mapped.polylines()[1], polyline(&[(0.0, 1.0)]));
    }

    #[test]
    fn bounding_box_spans_all_polylines() {
        let drawing = Drawing::from_polylines(vec![
            polyline(&[(10.0, 20.0), (30.0, 5.0)]),
            polyline(&[(-4.0, 50.0)]),
        ]);
        let bbox = drawing.bounding_box().unwrap();
        assert_eq!(bbox.min, Point::new(-4.0, 5.0));
        assert_eq!(bbox.max, Point::new(30.0, 50.0));
        assert_eq!(bbox.center(), Point::new(13.0, 27.5));
    }

    #[test]
    fn bounding_box_of_empty_drawing_is_none() {
        assert!(Drawing::new().bounding_box().is_none());
    }

    // --- Dimensions tests ---

    #[test]
    fn dimensions_center() {
        assert_eq!(Dimensions::new(250.0, 100.0).center(), Point::new(125.0, 50.0));
    }

    #[test]
    fn dimensions_validate_rejects_degenerate_sizes() {
        assert!(Dimensions::new(250.0, 250.0).validate().is_ok());
        for (w, h) in [(0.0, 250.0), (250.0, 0.0), (-1.0, 5.0), (f64::NAN, 5.0), (f64::INFINITY, 5.0)] {
            assert!(
                matches!(
                    Dimensions::new(w, h).validate(),
                    Err(PipelineError::InvalidCanvasDimensions { .. })
                ),
                "{w}x{h} should be rejected"
            );
        }
    }

    // --- Intensity tests ---

    #[test]
    fn intensity_accepts_half_open_range() {
        assert!(Intensity::new(1.0).is_ok());
        assert!(Intensity::new(0.1).is_ok());
        assert!(Intensity::new(0.0).is_err());
        assert!(Intensity::new(1.01).is_err());
        assert!(Intensity::new(f64::NAN).is_err());
    }

    #[test]
    fn intensity_deserialize_validates() {
        let ok: Intensity = serde_json::from_str("0.3").unwrap();
        assert!((ok.get() - 0.3).abs() < f64::EPSILON);
        assert!(serde_json::from_str::<Intensity>("2.0").is_err());
    }

    // --- PipelineError tests ---

    #[test]
    fn error_invalid_canvas_display() {
        let err = PipelineError::InvalidCanvasDimensions {
            width: 0.0,
            height: 250.0,
        };
        assert_eq!(
            err.to_string(),
            "invalid canvas dimensions 0x250: both sides must be positive"
        );
    }

    #[test]
    fn error_invalid_config_display() {
        let err = PipelineError::InvalidConfig("width must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "invalid configuration: width must be positive"
        );
    }

    // --- Serde tests ---

    #[test]
    fn drawing_serializes_as_nested_arrays() {
        let drawing = Drawing::from_polylines(vec![polyline(&[(1.0, 2.0)])]);
        let json = serde_json::to_string(&drawing).unwrap();
        assert_eq!(json, r#"[[{"x":1.0,"y":2.0}]]"#);
        let back: Drawing = serde_json::from_str(&json).unwrap();
        assert_eq!(back, drawing);

        let with_empty: Drawing =
            serde_json::from_str(r#"[[{"x":1.0,"y":1.0}],[],[{"x":2.0,"y":2.0}]]"#).unwrap();
        assert_eq!(with_empty.len(), 2);
        assert!(with_empty.iter().all(|pl| !pl.is_empty()));
    }
}
