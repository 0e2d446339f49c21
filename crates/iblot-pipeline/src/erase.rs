//! Eraser: remove every point inside a circle.
//!
//! Unlike a clipping mask, the eraser never splits strokes or inserts
//! boundary points. It simply drops the points within `radius` of the
//! touch location; a stroke that loses all of its points disappears,
//! and surviving points keep their order. The polyline then reconnects
//! across the gap.

use crate::types::{Drawing, Point, Polyline};

/// Remove points within `radius` of `center` from every polyline.
///
/// A point survives only if its distance to `center` is strictly
/// greater than `radius`. Polylines left empty are dropped. Applying
/// the same erase twice changes nothing the second time.
///
/// A negative `radius` erases nothing.
#[must_use = "returns the erased drawing"]
pub fn erase(drawing: &Drawing, center: Point, radius: f64) -> Drawing {
    if radius < 0.0 {
        return drawing.clone();
    }
    let radius_sq = radius * radius;
    drawing
        .iter()
        .map(|polyline| {
            polyline
                .points()
                .iter()
                .copied()
                .filter(|p| is_outside(*p, center, radius_sq))
                .collect::<Polyline>()
        })
        .collect()
}

/// Check if a point lies strictly outside the circle.
fn is_outside(p: Point, center: Point, radius_sq: f64) -> bool {
    p.distance_squared(center) > radius_sq
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(points: &[(f64, f64)]) -> Polyline {
        points.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    fn sample() -> Drawing {
        Drawing::from_polylines(vec![
            line(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (15.0, 0.0)]),
            line(&[(9.0, 1.0), (11.0, -1.0)]),
            line(&[(40.0, 40.0), (41.0, 41.0)]),
        ])
    }

    #[test]
    fn removes_points_inside_radius_keeping_order() {
        let out = erase(&sample(), Point::new(10.0, 0.0), 3.0);
        assert_eq!(out.polylines()[0], line(&[(0.0, 0.0), (5.0, 0.0), (15.0, 0.0)]));
    }

    #[test]
    fn drops_polylines_that_become_empty() {
        let out = erase(&sample(), Point::new(10.0, 0.0), 3.0);
        assert_eq!(out.len(), 2);
        assert_eq!(out.polylines()[1], line(&[(40.0, 40.0), (41.0, 41.0)]));
    }

    #[test]
    fn point_exactly_on_radius_is_erased() {
        let drawing = Drawing::from_polylines(vec![line(&[(3.0, 4.0), (6.0, 8.0)])]);
        let out = erase(&drawing, Point::new(0.0, 0.0), 5.0);
        assert_eq!(out.polylines()[0], line(&[(6.0, 8.0)]));
    }

    #[test]
    fn erase_is_idempotent() {
        let drawing = sample();
        for (center, radius) in [
            (Point::new(10.0, 0.0), 3.0),
            (Point::new(0.0, 0.0), 100.0),
            (Point::new(7.5, 0.0), 2.5),
        ] {
            let once = erase(&drawing, center, radius);
            let twice = erase(&once, center, radius);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn huge_radius_clears_everything() {
        let out = erase(&sample(), Point::new(20.0, 20.0), 1_000.0);
        assert!(out.is_empty());
    }

    #[test]
    fn zero_radius_only_removes_exact_hits() {
        let out = erase(&sample(), Point::new(5.0, 0.0), 0.0);
        assert_eq!(out.point_count(), sample().point_count() - 1);
    }

    #[test]
    fn negative_radius_erases_nothing() {
        let drawing = sample();
        assert_eq!(erase(&drawing, Point::new(5.0, 0.0), -1.0), drawing);
    }

    #[test]
    fn empty_drawing_stays_empty() {
        assert!(erase(&Drawing::new(), Point::new(0.0, 0.0), 10.0).is_empty());
    }
}
