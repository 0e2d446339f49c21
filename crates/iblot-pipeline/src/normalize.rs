//! Canvas-to-output coordinate transform.
//!
//! Converts canvas-space stroke points into the fixed logical output
//! space the plotter runtime draws in (125x125 for the fun zone, 115x115
//! for the plain draw-tab export).
//!
//! The transform is:
//!
//! ```text
//! out_x = canvas_x × target_w / canvas_w
//! out_y = canvas_y × target_h / canvas_h                (flip_y = false)
//! out_y = target_h − canvas_y × target_h / canvas_h     (flip_y = true)
//! ```
//!
//! Scaling is independent per axis, so a non-square canvas is stretched
//! into a square output. The flip converts the canvas's +Y-down
//! convention into the plotter's +Y-up convention; SVG output keeps
//! +Y-down and does not flip.

use serde::{Deserialize, Serialize};

use crate::types::{Dimensions, Drawing, PipelineError, Point};

/// Where and how to place a drawing in the output space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizeOptions {
    /// Size of the logical output space.
    pub target: Dimensions,
    /// Mirror the vertical axis (`y -> target_h - y`).
    pub flip_y: bool,
    /// Clamp every coordinate to `[0, target_dim]`.
    pub clamp: bool,
}

impl NormalizeOptions {
    /// The draw tab's export space: 115x115, canvas orientation kept.
    pub const DRAW_TAB: Self = Self {
        target: Dimensions::new(115.0, 115.0),
        flip_y: false,
        clamp: false,
    };

    /// The fun zone's export space: 125x125, Y flipped for the plotter.
    pub const FUN_ZONE: Self = Self {
        target: Dimensions::new(125.0, 125.0),
        flip_y: true,
        clamp: false,
    };
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::FUN_ZONE
    }
}

/// Rescale a drawing from its source canvas into the output space.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidCanvasDimensions`] if either the
/// source or the target has a zero, negative or non-finite side.
///
/// # Examples
///
/// ```
/// use iblot_pipeline::{Dimensions, Drawing, NormalizeOptions, Point, Polyline, normalize};
///
/// let drawing = Drawing::from_polylines(vec![Polyline::new(vec![Point::new(10.0, 10.0)])]);
/// let out = normalize(&drawing, Dimensions::new(250.0, 250.0), &NormalizeOptions::FUN_ZONE)?;
/// assert_eq!(out.polylines()[0].points()[0], Point::new(5.0, 120.0));
/// # Ok::<(), iblot_pipeline::PipelineError>(())
/// ```
pub fn normalize(
    drawing: &Drawing,
    source: Dimensions,
    options: &NormalizeOptions,
) -> Result<Drawing, PipelineError> {
    let source = source.validate()?;
    let target = options.target.validate()?;
    let scale_x = target.width / source.width;
    let scale_y = target.height / source.height;

    Ok(drawing.map_points(|p, _, _| {
        let x = p.x * scale_x;
        let y = if options.flip_y {
            p.y.mul_add(-scale_y, target.height)
        } else {
            p.y * scale_y
        };
        if options.clamp {
            Point::new(x.clamp(0.0, target.width), y.clamp(0.0, target.height))
        } else {
            Point::new(x, y)
        }
    }))
}

/// Map an output-space drawing back onto its source canvas.
///
/// Exact inverse of an unclamped [`normalize`] with the same
/// `source`, `target` and `flip_y`.
///
/// # Errors
///
/// Returns [`PipelineError::InvalidCanvasDimensions`] if either size is
/// degenerate.
pub fn denormalize(
    drawing: &Drawing,
    source: Dimensions,
    target: Dimensions,
    flip_y: bool,
) -> Result<Drawing, PipelineError> {
    let source = source.validate()?;
    let target = target.validate()?;
    let scale_x = source.width / target.width;
    let scale_y = source.height / target.height;

    Ok(drawing.map_points(|p, _, _| {
        let y = if flip_y { target.height - p.y } else { p.y };
        Point::new(p.x * scale_x, y * scale_y)
    }))
}
