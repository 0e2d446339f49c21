//! SVG import: turn `<path>` elements back into a drawing.
//!
//! Only straight-line path commands are understood (`M`, `L`, `H`, `V`,
//! `Z`, absolute and relative), which covers everything the SVG
//! exporter writes and most hand-made line art. Curves are rejected
//! rather than approximated.
//!
//! Parsing is done by the [`svg`] crate; this module only interprets
//! the commands.

use log::{debug, warn};
use svg::node::element::path::{Command, Data, Position};
use svg::node::element::tag;
use svg::parser::Event;

use iblot_pipeline::{Dimensions, Drawing, Point, Polyline};

/// Errors that can occur while importing SVG content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    /// A path's `d` attribute could not be tokenized.
    #[error("invalid path data: {0}")]
    PathData(String),

    /// The document is not well-formed SVG.
    #[error("invalid SVG document: {0}")]
    Svg(String),

    /// The path uses a command other than M, L, H, V or Z.
    #[error("unsupported path command '{0}': only straight lines are supported")]
    UnsupportedCommand(char),

    /// A coordinate-pair command has an odd number of parameters.
    #[error("path command '{0}' has an odd number of coordinates")]
    OddParameters(char),
}

/// Result of [`from_svg`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedSvg {
    /// Every path, one polyline per subpath, relative to the `viewBox`
    /// origin.
    pub drawing: Drawing,

    /// Size of the root `viewBox`, if the document has one.
    pub dimensions: Option<Dimensions>,
}

/// Parse a path `d` attribute into polylines.
///
/// Each move command starts a new polyline; extra coordinate pairs
/// after a move are implicit line commands. `Z` draws back to the
/// subpath start.
///
/// # Errors
///
/// Returns [`ImportError::PathData`] if the data cannot be tokenized,
/// [`ImportError::UnsupportedCommand`] for curves and arcs, and
/// [`ImportError::OddParameters`] if a pair command is missing a
/// coordinate.
///
/// # Examples
///
/// ```
/// use iblot_pipeline::Point;
/// use iblot_export::import::parse_path_data;
///
/// let polylines = parse_path_data("M10,20 L30,40 h5").unwrap();
/// assert_eq!(polylines.len(), 1);
/// assert_eq!(polylines[0].last(), Some(&Point::new(35.0, 40.0)));
/// ```
pub fn parse_path_data(d: &str) -> Result<Vec<Polyline>, ImportError> {
    let data = Data::parse(d).map_err(|e| ImportError::PathData(e.to_string()))?;
    let mut pen = Pen::default();
    for command in data.iter() {
        pen.apply(command)?;
    }
    Ok(pen.finish())
}

/// Parse an SVG document, collecting every `<path>` into one drawing.
///
/// Coordinates are shifted so the `viewBox` origin becomes `(0, 0)`.
/// Paths without a `d` attribute are skipped.
///
/// # Errors
///
/// Returns [`ImportError::Svg`] for malformed documents and any error
/// from [`parse_path_data`].
pub fn from_svg(content: &str) -> Result<ImportedSvg, ImportError> {
    let mut origin = Point::new(0.0, 0.0);
    let mut dimensions = None;
    let mut polylines = Vec::new();

    let parser = svg::read(content).map_err(|e| ImportError::Svg(e.to_string()))?;
    for event in parser {
        match event {
            Event::Error(e) => return Err(ImportError::Svg(e.to_string())),
            Event::Tag("svg", tag::Type::Start | tag::Type::Empty, attributes) => {
                if let Some((min, size)) = attributes.get("viewBox").and_then(|v| parse_view_box(v))
                {
                    origin = min;
                    dimensions = Some(size);
                }
            }
            Event::Tag("path", tag::Type::Start | tag::Type::Empty, attributes) => {
                match attributes.get("d") {
                    Some(d) => polylines.extend(parse_path_data(d)?),
                    None => warn!("skipping <path> without a d attribute"),
                }
            }
            _ => {}
        }
    }

    let drawing = Drawing::from_polylines(polylines).map_points(|p, _, _| {
        Point::new(p.x - origin.x, p.y - origin.y)
    });
    debug!(
        "imported {} polylines ({} points) from SVG",
        drawing.len(),
        drawing.point_count()
    );
    Ok(ImportedSvg {
        drawing,
        dimensions,
    })
}

/// Parse `"min-x min-y width height"` (space and/or comma separated).
///
/// Returns `None` unless there are exactly four numbers and the size is
/// positive.
fn parse_view_box(value: &str) -> Option<(Point, Dimensions)> {
    let numbers = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(str::parse::<f64>)
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    let [x, y, w, h] = numbers[..] else {
        return None;
    };
    let size = Dimensions::new(w, h).validate().ok()?;
    Some((Point::new(x, y), size))
}

/// Command letter as written in the path data.
fn letter(upper: char, position: Position) -> char {
    match position {
        Position::Absolute => upper,
        Position::Relative => upper.to_ascii_lowercase(),
    }
}

/// Interprets path commands, tracking the current point and subpath.
#[derive(Default)]
struct Pen {
    current: Point,
    start: Point,
    open: Polyline,
    done: Vec<Polyline>,
}

impl Pen {
    fn apply(&mut self, command: &Command) -> Result<(), ImportError> {
        match command {
            Command::Move(position, params) => {
                let pairs = pairs(params, letter('M', *position))?;
                for (i, (x, y)) in pairs.into_iter().enumerate() {
                    let to = self.resolve(*position, x, y);
                    if i == 0 {
                        self.move_to(to);
                    } else {
                        self.line_to(to);
                    }
                }
            }
            Command::Line(position, params) => {
                for (x, y) in pairs(params, letter('L', *position))? {
                    let to = self.resolve(*position, x, y);
                    self.line_to(to);
                }
            }
            Command::HorizontalLine(position, params) => {
                for &x in params.iter() {
                    let x = f64::from(x);
                    let to = match position {
                        Position::Absolute => Point::new(x, self.current.y),
                        Position::Relative => Point::new(self.current.x + x, self.current.y),
                    };
                    self.line_to(to);
                }
            }
            Command::VerticalLine(position, params) => {
                for &y in params.iter() {
                    let y = f64::from(y);
                    let to = match position {
                        Position::Absolute => Point::new(self.current.x, y),
                        Position::Relative => Point::new(self.current.x, self.current.y + y),
                    };
                    self.line_to(to);
                }
            }
            Command::Close => {
                if !self.open.is_empty() {
                    self.line_to(self.start);
                    self.flush();
                }
                self.current = self.start;
            }
            Command::QuadraticCurve(position, _) => {
                return Err(ImportError::UnsupportedCommand(letter('Q', *position)));
            }
            Command::SmoothQuadraticCurve(position, _) => {
                return Err(ImportError::UnsupportedCommand(letter('T', *position)));
            }
            Command::CubicCurve(position, _) => {
                return Err(ImportError::UnsupportedCommand(letter('C', *position)));
            }
            Command::SmoothCubicCurve(position, _) => {
                return Err(ImportError::UnsupportedCommand(letter('S', *position)));
            }
            Command::EllipticalArc(position, _) => {
                return Err(ImportError::UnsupportedCommand(letter('A', *position)));
            }
        }
        Ok(())
    }

    fn resolve(&self, position: Position, x: f64, y: f64) -> Point {
        match position {
            Position::Absolute => Point::new(x, y),
            Position::Relative => Point::new(self.current.x + x, self.current.y + y),
        }
    }

    fn move_to(&mut self, to: Point) {
        self.flush();
        self.open.push(to);
        self.current = to;
        self.start = to;
    }

    fn line_to(&mut self, to: Point) {
        // A line after Z (or with no M at all) starts at the current point.
        if self.open.is_empty() {
            self.open.push(self.current);
        }
        self.open.push(to);
        self.current = to;
    }

    fn flush(&mut self) {
        let polyline = std::mem::take(&mut self.open);
        if !polyline.is_empty() {
            self.done.push(polyline);
        }
    }

    fn finish(mut self) -> Vec<Polyline> {
        self.flush();
        self.done
    }
}

/// Group a flat parameter list into coordinate pairs.
fn pairs(params: &[f32], command: char) -> Result<Vec<(f64, f64)>, ImportError> {
    let chunks = params.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        return Err(ImportError::OddParameters(command));
    }
    Ok(chunks
        .map(|pair| (f64::from(pair[0]), f64::from(pair[1])))
        .collect())
}
