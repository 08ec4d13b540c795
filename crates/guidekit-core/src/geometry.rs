#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All values are in absolute canvas units with the origin at the top-left of
//! the viewport. Hosts decide what a unit is (points, pixels, cells).

/// A point in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Offset this point by `dx`, `dy`.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// A width/height pair, used for canvas and tooltip sizes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero or negative.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// A rectangle for highlight regions and hit testing.
///
/// Equality compares all four fields exactly; descriptor updates rely on
/// that to skip redundant writes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    /// Top-left corner.
    #[inline]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Grow the rectangle by `padding` on every side.
    ///
    /// A negative padding shrinks it; the result is not clamped.
    #[inline]
    #[must_use]
    pub fn expand(&self, padding: f64) -> Rect {
        Rect::new(
            self.x - padding,
            self.y - padding,
            self.width + padding * 2.0,
            self.height + padding * 2.0,
        )
    }

    /// Translate the rectangle by `dx`, `dy`.
    #[inline]
    #[must_use]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    /// Check if a point lies strictly inside the rectangle.
    ///
    /// All four bounds are exclusive: a point exactly on an edge is outside.
    #[inline]
    pub fn contains_strict(&self, point: Point) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// Check if a point lies inside the rectangle, edges included.
    #[inline]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

/// The result of an absolute measurement that may be incomplete.
///
/// Layout engines report partial data while a view is still being laid out or
/// animated; any missing field means "try again next frame".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartialRect {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl PartialRect {
    /// A measurement with no fields available.
    pub const UNAVAILABLE: Self = Self {
        x: None,
        y: None,
        width: None,
        height: None,
    };

    /// Resolve into a [`Rect`] if all four fields are present and finite.
    pub fn complete(&self) -> Option<Rect> {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        Some(Rect::new(
            finite(self.x)?,
            finite(self.y)?,
            finite(self.width)?,
            finite(self.height)?,
        ))
    }
}

impl From<Rect> for PartialRect {
    fn from(rect: Rect) -> Self {
        Self {
            x: Some(rect.x),
            y: Some(rect.y),
            width: Some(rect.width),
            height: Some(rect.height),
        }
    }
}
