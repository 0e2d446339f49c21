//! Drawing session: the single owner of a drawing and its canvas size.
//!
//! A [`Session`] is driven by the drawing surface (points arrive while a
//! finger moves, the stroke is finished when it lifts) and by the
//! editing controls (undo, clear, erase). Exporters and previews never
//! touch the session directly; they take a [`Snapshot`], an immutable
//! copy of the finished strokes together with the canvas size they were
//! captured on.

use log::debug;

use crate::erase::erase;
use crate::normalize::{NormalizeOptions, normalize};
use crate::types::{Dimensions, Drawing, PipelineError, Point, Polyline};

/// Mutable drawing state for one editing session.
#[derive(Debug, Clone)]
pub struct Session {
    drawing: Drawing,
    current: Polyline,
    canvas: Dimensions,
}

impl Session {
    /// Start an empty session on a canvas of the given size.
    #[must_use]
    pub const fn new(canvas: Dimensions) -> Self {
        Self {
            drawing: Drawing::new(),
            current: Polyline::new(Vec::new()),
            canvas,
        }
    }

    /// Resume a session from previously finished strokes.
    #[must_use]
    pub const fn with_drawing(drawing: Drawing, canvas: Dimensions) -> Self {
        Self {
            drawing,
            current: Polyline::new(Vec::new()),
            canvas,
        }
    }

    /// The finished strokes.
    #[must_use]
    pub const fn drawing(&self) -> &Drawing {
        &self.drawing
    }

    /// The stroke being drawn, possibly empty.
    #[must_use]
    pub const fn current_stroke(&self) -> &Polyline {
        &self.current
    }

    /// Canvas size the strokes are expressed in.
    #[must_use]
    pub const fn canvas(&self) -> Dimensions {
        self.canvas
    }

    /// Record a new canvas size reported by the drawing surface.
    ///
    /// Existing strokes are not rescaled.
    pub fn resize(&mut self, canvas: Dimensions) {
        debug!(
            "canvas resized from {}x{} to {}x{}",
            self.canvas.width, self.canvas.height, canvas.width, canvas.height
        );
        self.canvas = canvas;
    }

    /// Extend the in-progress stroke.
    pub fn push_point(&mut self, point: Point) {
        self.current.push(point);
    }

    /// Finish the in-progress stroke.
    ///
    /// Returns `true` if a stroke was added; an empty stroke (a tap that
    /// never produced a point) is discarded.
    pub fn finish_stroke(&mut self) -> bool {
        let stroke = std::mem::take(&mut self.current);
        let len = stroke.len();
        let added = self.drawing.push(stroke);
        if added {
            debug!("stroke {} finished with {len} points", self.drawing.len());
        }
        added
    }

    /// Throw away the in-progress stroke.
    pub fn cancel_stroke(&mut self) {
        self.current = Polyline::default();
    }

    /// Append a complete polyline. Empty polylines are ignored.
    pub fn append(&mut self, polyline: Polyline) -> bool {
        self.drawing.push(polyline)
    }

    /// Append contours delivered in `[0, 1]` space, scaled onto the canvas.
    ///
    /// Returns the number of polylines added.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidCanvasDimensions`] if the canvas
    /// size has not been captured yet (zero or negative).
    pub fn import_contours(&mut self, contours: &Drawing) -> Result<usize, PipelineError> {
        let options = NormalizeOptions {
            target: self.canvas,
            flip_y: false,
            clamp: false,
        };
        let scaled = normalize(contours, Dimensions::UNIT, &options)?;
        let before = self.drawing.len();
        for polyline in scaled.into_polylines() {
            self.drawing.push(polyline);
        }
        let added = self.drawing.len() - before;
        debug!("imported {added} contours");
        Ok(added)
    }

    /// Remove the most recent stroke.
    pub fn undo(&mut self) -> Option<Polyline> {
        let removed = self.drawing.pop();
        if removed.is_some() {
            debug!("undo: {} strokes remain", self.drawing.len());
        }
        removed
    }

    /// Remove every stroke, including the one in progress.
    pub fn clear(&mut self) {
        debug!("clearing {} strokes", self.drawing.len());
        self.drawing.clear();
        self.current = Polyline::default();
    }

    /// Erase every point within `radius` of `center`.
    ///
    /// Returns the number of points removed.
    pub fn erase(&mut self, center: Point, radius: f64) -> usize {
        let before = self.drawing.point_count();
        self.drawing = erase(&self.drawing, center, radius);
        let removed = before - self.drawing.point_count();
        if removed > 0 {
            debug!(
                "erased {removed} points around ({}, {}) r={radius}",
                center.x, center.y
            );
        }
        removed
    }

    /// Immutable copy of the finished strokes and canvas size.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            drawing: self.drawing.clone(),
            canvas: self.canvas,
        }
    }
}

/// Finished strokes plus the canvas size they were captured on.
///
/// Keeping both together guarantees the scale factor used for export
/// matches the points, even if the canvas is resized later.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Snapshot {
    /// Canvas size at capture time.
    pub canvas: Dimensions,
    /// The finished strokes in canvas space.
    pub drawing: Drawing,
}

impl Snapshot {
    /// Rescale into the output space described by `options`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidCanvasDimensions`] if the captured
    /// canvas or the target is degenerate.
    pub fn normalized(&self, options: &NormalizeOptions) -> Result<Drawing, PipelineError> {
        normalize(&self.drawing, self.canvas, options)
    }
}
