#![forbid(unsafe_code)]

//! The drawing contract between overlay widgets and the host renderer.

use guidekit_core::geometry::{Point, Size};

use crate::color::Rgba;
use crate::path::Path;

/// How overlapping subpaths decide what is inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillRule {
    #[default]
    NonZero,
    /// Alternating inside/outside; used to punch the highlight hole.
    EvenOdd,
}

/// Fill parameters for [`Surface::fill_path`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub color: Rgba,
    /// Layer opacity in `0.0..=1.0`, applied on top of the colour's alpha.
    pub opacity: f64,
    pub rule: FillRule,
}

impl Fill {
    /// An opaque non-zero fill.
    pub const fn solid(color: Rgba) -> Self {
        Self {
            color,
            opacity: 1.0,
            rule: FillRule::NonZero,
        }
    }

    #[must_use]
    pub const fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity;
        self
    }

    #[must_use]
    pub const fn with_rule(mut self, rule: FillRule) -> Self {
        self.rule = rule;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontWeight {
    #[default]
    Regular,
    Bold,
}

/// Text appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in canvas units.
    pub size: f64,
    pub weight: FontWeight,
    pub color: Rgba,
}

impl TextStyle {
    pub const fn new(size: f64, weight: FontWeight, color: Rgba) -> Self {
        Self {
            size,
            weight,
            color,
        }
    }
}

/// A block of text to draw, wrapped to `max_width`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRun<'a> {
    pub text: &'a str,
    /// Top-left of the text block.
    pub origin: Point,
    pub max_width: f64,
    pub style: TextStyle,
}

/// A drawing target.
///
/// Implemented by host canvases, or by [`DisplayList`](crate::DisplayList)
/// when drawing is deferred. `measure_text` must agree with how `draw_text`
/// lays text out, since tooltip sizing depends on it.
pub trait Surface {
    /// Fill a path.
    fn fill_path(&mut self, path: &Path, fill: Fill);

    /// Draw a text block.
    fn draw_text(&mut self, run: &TextRun<'_>);

    /// Size that `text` would occupy when wrapped to `max_width`.
    fn measure_text(&self, text: &str, style: &TextStyle, max_width: f64) -> Size;
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn fill_path(&mut self, path: &Path, fill: Fill) {
        (**self).fill_path(path, fill);
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        (**self).draw_text(run);
    }

    fn measure_text(&self, text: &str, style: &TextStyle, max_width: f64) -> Size {
        (**self).measure_text(text, style, max_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_builders() {
        let f = Fill::solid(Rgba::BLACK)
            .with_opacity(0.4)
            .with_rule(FillRule::EvenOdd);
        assert_eq!(f.color, Rgba::BLACK);
        assert_eq!(f.opacity, 0.4);
        assert_eq!(f.rule, FillRule::EvenOdd);
    }

    #[test]
    fn fill_rule_defaults_to_non_zero() {
        assert_eq!(FillRule::default(), FillRule::NonZero);
    }
}
