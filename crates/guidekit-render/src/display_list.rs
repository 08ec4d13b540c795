#![forbid(unsafe_code)]

//! A [`Surface`] that records draw operations instead of rasterising them.
//!
//! Hosts without a direct canvas binding replay the list each frame; tests use
//! it to assert exactly what a widget painted.

use guidekit_core::geometry::{Point, Size};
use unicode_width::UnicodeWidthStr;

use crate::path::Path;
use crate::surface::{Fill, Surface, TextRun, TextStyle};

/// Fixed-advance text metrics.
///
/// Every terminal column (as reported by `unicode-width`) advances by
/// `advance * size`; lines are `line_height * size` tall. Wide glyphs count
/// two columns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub advance: f64,
    pub line_height: f64,
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.4,
        }
    }
}

impl TextMetrics {
    /// Measure `text` wrapped at `max_width`, breaking by columns.
    pub fn measure(&self, text: &str, size: f64, max_width: f64) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let col_width = self.advance * size;
        let cols_per_line = if col_width > 0.0 && max_width.is_finite() {
            ((max_width / col_width).floor() as usize).max(1)
        } else {
            usize::MAX
        };

        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.split('\n') {
            let cols = UnicodeWidthStr::width(line);
            let wrapped = cols.div_ceil(cols_per_line).max(1);
            lines += wrapped;
            widest = widest.max(cols.min(cols_per_line));
        }

        Size::new(
            widest as f64 * col_width,
            lines as f64 * self.line_height * size,
        )
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    FillPath {
        path: Path,
        fill: Fill,
    },
    Text {
        text: String,
        origin: Point,
        max_width: f64,
        style: TextStyle,
    },
}

/// A recording surface.
#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
    metrics: TextMetrics,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use custom text metrics for `measure_text`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: TextMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Drop all recorded operations, keeping the metrics.
    pub fn clear(&mut self) {
        self.ops.clear();
    }

    /// Iterate over the recorded paths with their fills.
    pub fn paths(&self) -> impl Iterator<Item = (&Path, &Fill)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::FillPath { path, fill } => Some((path, fill)),
            DrawOp::Text { .. } => None,
        })
    }

    /// Iterate over the recorded text strings.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            DrawOp::FillPath { .. } => None,
        })
    }

    /// Replay the recorded operations onto another surface.
    pub fn replay(&self, target: &mut dyn Surface) {
        for op in &self.ops {
            match op {
                DrawOp::FillPath { path, fill } => target.fill_path(path, *fill),
                DrawOp::Text {
                    text,
                    origin,
                    max_width,
                    style,
                } => target.draw_text(&TextRun {
                    text,
                    origin: *origin,
                    max_width: *max_width,
                    style: *style,
                }),
            }
        }
    }
}

impl Surface for DisplayList {
    fn fill_path(&mut self, path: &Path, fill: Fill) {
        self.ops.push(DrawOp::FillPath {
            path: path.clone(),
            fill,
        });
    }

    fn draw_text(&mut self, run: &TextRun<'_>) {
        self.ops.push(DrawOp::Text {
            text: run.text.to_owned(),
            origin: run.origin,
            max_width: run.max_width,
            style: run.style,
        });
    }

    fn measure_text(&self, text: &str, style: &TextStyle, max_width: f64) -> Size {
        self.metrics.measure(text, style.size, max_width)
    }
}
