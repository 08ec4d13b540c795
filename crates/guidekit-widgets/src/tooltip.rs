#![forbid(unsafe_code)]

//! Tooltip bubble: sizing, placement relative to the highlight, and drawing.
//!
//! Layout is two-pass. [`Tooltip::measure`] sizes the bubble from its text;
//! [`tooltip_offset`] then positions that size against the highlighted
//! rectangle and [`Tooltip::render`] draws it.

use guidekit_core::geometry::{Point, Rect, Size};
use guidekit_render::{
    ArrowDirection, Fill, FontWeight, Surface, TextRun, TextStyle, arrow_path, rounded_rect,
};
use guidekit_runtime::{HorizontalAlign, Placement, TooltipMetrics, TooltipSpec};

/// Offset of the bubble's top-left corner from the highlight's top-left.
///
/// `None` placement pins the bubble to the highlight origin.
pub fn tooltip_offset(
    placement: Option<Placement>,
    highlight: Size,
    tooltip: Size,
    metrics: &TooltipMetrics,
) -> Point {
    let Some(placement) = placement else {
        return Point::default();
    };
    let y = if placement.is_top() {
        -(tooltip.height + metrics.gap_above + metrics.arrow_height)
    } else {
        highlight.height + metrics.gap_below
    };
    let x = match placement.align() {
        HorizontalAlign::Left => 0.0,
        HorizontalAlign::Center => highlight.width / 2.0 - tooltip.width / 2.0,
        HorizontalAlign::Right => highlight.width - tooltip.width,
    };
    Point::new(x, y)
}

/// Top-left of the arrow's box relative to the bubble, and where it points.
///
/// Top placements hang the arrow below the bubble pointing down; bottom
/// placements sit it on top pointing up. Either way it overlaps the bubble
/// edge by `arrow_overlap`.
pub fn arrow_offset(arrow: Placement, tooltip: Size, metrics: &TooltipMetrics) -> (Point, ArrowDirection) {
    let x = match arrow.align() {
        HorizontalAlign::Left => metrics.arrow_inset,
        HorizontalAlign::Center => tooltip.width / 2.0 - metrics.arrow_width / 2.0,
        HorizontalAlign::Right => tooltip.width - metrics.arrow_inset - metrics.arrow_width,
    };
    if arrow.is_top() {
        (
            Point::new(x, tooltip.height - metrics.arrow_overlap),
            ArrowDirection::Down,
        )
    } else {
        (
            Point::new(x, -(metrics.arrow_height - metrics.arrow_overlap)),
            ArrowDirection::Up,
        )
    }
}

/// Rectangles produced by laying out a bubble of known size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TooltipLayout {
    pub bubble: Rect,
    pub title: Option<Rect>,
    pub body: Rect,
    pub button: Rect,
    pub arrow: Rect,
    pub arrow_direction: ArrowDirection,
}

/// A tooltip ready to measure and draw.
#[derive(Debug, Clone, Copy)]
pub struct Tooltip<'a> {
    spec: &'a TooltipSpec,
    metrics: &'a TooltipMetrics,
}

impl<'a> Tooltip<'a> {
    pub fn new(spec: &'a TooltipSpec, metrics: &'a TooltipMetrics) -> Self {
        Self { spec, metrics }
    }

    fn title_style(&self) -> TextStyle {
        TextStyle::new(self.metrics.title_size, FontWeight::Bold, self.metrics.text_color)
    }

    fn body_style(&self) -> TextStyle {
        TextStyle::new(self.metrics.body_size, FontWeight::Regular, self.metrics.text_color)
    }

    fn button_style(&self) -> TextStyle {
        TextStyle::new(
            self.metrics.button_text_size,
            FontWeight::Bold,
            self.metrics.button_text_color,
        )
    }

    fn title(&self) -> Option<&'a str> {
        self.spec.title.as_deref().filter(|t| !t.is_empty())
    }

    fn body(&self) -> &'a str {
        self.spec.body.as_deref().unwrap_or_default()
    }

    fn button_label(&self) -> &'a str {
        self.spec
            .button_label
            .as_deref()
            .unwrap_or(self.metrics.default_button_label.as_str())
    }

    fn content_width(&self) -> f64 {
        (self.metrics.width - 2.0 * self.metrics.padding).max(0.0)
    }

    /// Probe pass: the bubble's size, arrow excluded.
    pub fn measure(&self, surface: &dyn Surface) -> Size {
        self.layout_at(Point::default(), surface).bubble.size()
    }

    /// Lay the bubble out with its top-left at `origin`.
    pub fn layout_at(&self, origin: Point, surface: &dyn Surface) -> TooltipLayout {
        let m = self.metrics;
        let content_width = self.content_width();
        let left = origin.x + m.padding;
        let mut y = origin.y + m.padding;

        let title = self.title().map(|text| {
            let size = surface.measure_text(text, &self.title_style(), content_width);
            let rect = Rect::new(left, y, content_width, size.height);
            y += size.height + m.section_gap;
            rect
        });

        let body_height = surface
            .measure_text(self.body(), &self.body_style(), content_width)
            .height
            .max(m.body_min_height);
        let body = Rect::new(left, y, content_width, body_height);
        y += body_height + m.section_gap;

        let label = surface.measure_text(
            self.button_label(),
            &self.button_style(),
            content_width - 2.0 * m.button_padding_x,
        );
        let button = Rect::new(
            left,
            y,
            label.width + 2.0 * m.button_padding_x,
            label.height + 2.0 * m.button_padding_y,
        );
        y += button.height + m.padding;

        let bubble = Rect::new(origin.x, origin.y, m.width, y - origin.y);
        let spec_arrow = self.spec.arrow;
        let (arrow_at, arrow_direction) = arrow_offset(spec_arrow, bubble.size(), m);
        let arrow = Rect::new(
            origin.x + arrow_at.x,
            origin.y + arrow_at.y,
            m.arrow_width,
            m.arrow_height,
        );

        TooltipLayout {
            bubble,
            title,
            body,
            button,
            arrow,
            arrow_direction,
        }
    }

    /// Draw at `origin` and return the layout (the button rect routes
    /// presses).
    pub fn render(&self, origin: Point, surface: &mut dyn Surface) -> TooltipLayout {
        let layout = self.layout_at(origin, &*surface);
        let m = self.metrics;

        surface.fill_path(
            &rounded_rect(layout.bubble, m.corner_radius),
            Fill::solid(m.background),
        );
        surface.fill_path(
            &arrow_path(
                layout.arrow.origin(),
                layout.arrow.size(),
                layout.arrow_direction,
            ),
            Fill::solid(m.background),
        );

        if let (Some(text), Some(rect)) = (self.title(), layout.title) {
            surface.draw_text(&TextRun {
                text,
                origin: rect.origin(),
                max_width: rect.width,
                style: self.title_style(),
            });
        }
        if !self.body().is_empty() {
            surface.draw_text(&TextRun {
                text: self.body(),
                origin: layout.body.origin(),
                max_width: layout.body.width,
                style: self.body_style(),
            });
        }

        let button_radius = (layout.button.height / 2.0).min(layout.button.width / 2.0);
        surface.fill_path(
            &rounded_rect(layout.button, button_radius),
            Fill::solid(m.button_color),
        );
        surface.draw_text(&TextRun {
            text: self.button_label(),
            origin: Point::new(
                layout.button.x + m.button_padding_x,
                layout.button.y + m.button_padding_y,
            ),
            max_width: layout.button.width - 2.0 * m.button_padding_x,
            style: self.button_style(),
        });

        layout
    }
}
