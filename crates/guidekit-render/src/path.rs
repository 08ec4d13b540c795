#![forbid(unsafe_code)]

//! Vector paths with SVG path-data formatting.
//!
//! The overlay needs three shapes: the dim mask (viewport rectangle minus a
//! rounded hole), rounded rectangles for the tooltip bubble and button, and
//! the tooltip arrow. All of them are built here and format to the same path
//! grammar SVG uses, so any host with an SVG-capable renderer can draw them.
//!
//! # Number formatting
//!
//! Coordinates print in shortest form: `18`, never `18.0`. Negative zero
//! prints as `0`.

use std::fmt;

use guidekit_core::geometry::{Point, Rect, Size};
use smallvec::SmallVec;

/// A single path segment, in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// `M x,y`
    MoveTo(Point),
    /// `L x,y`
    LineTo(Point),
    /// `H x`
    HorizontalTo(f64),
    /// `V y`
    VerticalTo(f64),
    /// `C x1,y1 x2,y2 x,y`
    CubicTo { c1: Point, c2: Point, to: Point },
    /// `A rx,ry rotation large-arc sweep x,y`
    ArcTo {
        rx: f64,
        ry: f64,
        x_rotation: f64,
        large_arc: bool,
        sweep: bool,
        to: Point,
    },
    /// `Z`
    Close,
}

/// An ordered list of path commands.
///
/// Built with the chaining methods below:
///
/// ```
/// use guidekit_render::Path;
///
/// let tri = Path::new().move_to(0.0, 0.0).line_to(10.0, 0.0).line_to(5.0, 8.0).close();
/// assert_eq!(tri.to_string(), "M0,0L10,0L5,8Z");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: SmallVec<[PathCommand; 16]>,
}

impl Path {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn move_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    #[must_use]
    pub fn line_to(mut self, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    #[must_use]
    pub fn horizontal_to(mut self, x: f64) -> Self {
        self.commands.push(PathCommand::HorizontalTo(x));
        self
    }

    #[must_use]
    pub fn vertical_to(mut self, y: f64) -> Self {
        self.commands.push(PathCommand::VerticalTo(y));
        self
    }

    #[must_use]
    pub fn cubic_to(mut self, c1: Point, c2: Point, to: Point) -> Self {
        self.commands.push(PathCommand::CubicTo { c1, c2, to });
        self
    }

    /// Append a clockwise, small circular arc of radius `r` ending at `x`, `y`.
    #[must_use]
    pub fn corner_to(mut self, r: f64, x: f64, y: f64) -> Self {
        self.commands.push(PathCommand::ArcTo {
            rx: r,
            ry: r,
            x_rotation: 0.0,
            large_arc: false,
            sweep: true,
            to: Point::new(x, y),
        });
        self
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Append all subpaths of `other` after this path.
    #[must_use]
    pub fn append(mut self, other: Path) -> Self {
        self.commands.extend(other.commands);
        self
    }

    /// The commands in drawing order.
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of subpaths (one per `MoveTo`).
    pub fn subpath_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }
}

struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

struct Pt(Point);

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", Num(self.0.x), Num(self.0.y))
    }
}

impl fmt::Display for PathCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::MoveTo(p) => write!(f, "M{}", Pt(p)),
            Self::LineTo(p) => write!(f, "L{}", Pt(p)),
            Self::HorizontalTo(x) => write!(f, "H{}", Num(x)),
            Self::VerticalTo(y) => write!(f, "V{}", Num(y)),
            Self::CubicTo { c1, c2, to } => write!(f, "C{} {} {}", Pt(c1), Pt(c2), Pt(to)),
            Self::ArcTo {
                rx,
                ry,
                x_rotation,
                large_arc,
                sweep,
                to,
            } => write!(
                f,
                "A{},{} {} {} {} {}",
                Num(rx),
                Num(ry),
                Num(x_rotation),
                u8::from(large_arc),
                u8::from(sweep),
                Pt(to)
            ),
            Self::Close => f.write_str("Z"),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for cmd in &self.commands {
            write!(f, "{cmd}")?;
        }
        Ok(())
    }
}

/// A rounded rectangle traced clockwise from the end of the top-left corner.
///
/// `radius` must not exceed half of either dimension; larger values produce
/// overlapping segments and are not corrected.
pub fn rounded_rect(rect: Rect, radius: f64) -> Path {
    let Rect {
        x,
        y,
        width,
        height,
    } = rect;
    let r = radius;
    Path::new()
        .move_to(x + r, y)
        .horizontal_to(x + width - r)
        .corner_to(r, x + width, y + r)
        .vertical_to(y + height - r)
        .corner_to(r, x + width - r, y + height)
        .horizontal_to(x + r)
        .corner_to(r, x, y + height - r)
        .vertical_to(y + r)
        .corner_to(r, x + r, y)
        .close()
}

/// The dim-mask path: the whole canvas minus a rounded hole over `hole`.
///
/// Fill it with [`FillRule::EvenOdd`](crate::surface::FillRule::EvenOdd); the
/// inner subpath then punches through the outer one.
pub fn mask_path(hole: Rect, canvas: Size, radius: f64) -> Path {
    Path::new()
        .move_to(0.0, 0.0)
        .horizontal_to(canvas.width)
        .vertical_to(canvas.height)
        .horizontal_to(0.0)
        .vertical_to(0.0)
        .close()
        .append(rounded_rect(hole, radius))
}

/// Which way the tooltip arrow points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowDirection {
    /// Tip at the bottom; used when the tooltip sits above its target.
    Down,
    /// Tip at the top (the down arrow rotated 180°).
    Up,
}

// Rounded down-pointing arrow in a 20x13 box.
const ARROW_VIEWBOX: Size = Size::new(20.0, 13.0);
const ARROW_START: (f64, f64) = (11.488, 12.3432);
const ARROW_SEGMENTS: [ArrowSegment; 6] = [
    ArrowSegment::Cubic([(10.6933, 13.228), (9.30668, 13.228), (8.51201, 12.3432)]),
    ArrowSegment::Line((0.872037, 3.83637)),
    ArrowSegment::Cubic([(-0.284285, 2.54885), (0.629483, 0.5), (2.36003, 0.5)]),
    ArrowSegment::Line((17.64, 0.500001)),
    ArrowSegment::Cubic([(19.3705, 0.500002), (20.2843, 2.54885), (19.128, 3.83637)]),
    ArrowSegment::Line((11.488, 12.3432)),
];

enum ArrowSegment {
    Line((f64, f64)),
    Cubic([(f64, f64); 3]),
}

/// The tooltip arrow scaled into `size` with its box at `origin`.
pub fn arrow_path(origin: Point, size: Size, direction: ArrowDirection) -> Path {
    let sx = size.width / ARROW_VIEWBOX.width;
    let sy = size.height / ARROW_VIEWBOX.height;
    let map = |(px, py): (f64, f64)| {
        let (lx, ly) = (px * sx, py * sy);
        match direction {
            ArrowDirection::Down => Point::new(origin.x + lx, origin.y + ly),
            ArrowDirection::Up => Point::new(
                origin.x + size.width - lx,
                origin.y + size.height - ly,
            ),
        }
    };

    let start = map(ARROW_START);
    let mut path = Path::new().move_to(start.x, start.y);
    for seg in &ARROW_SEGMENTS {
        path = match *seg {
            ArrowSegment::Line(p) => {
                let p = map(p);
                path.line_to(p.x, p.y)
            }
            ArrowSegment::Cubic([c1, c2, to]) => path.cubic_to(map(c1), map(c2), map(to)),
        };
    }
    path.close()
}
