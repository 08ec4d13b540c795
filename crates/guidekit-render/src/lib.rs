#![forbid(unsafe_code)]

//! Render: SVG-style vector paths, the drawing [`Surface`] contract, and a
//! recording [`DisplayList`] surface.
//!
//! Rasterisation is left to the host. Widgets describe what to paint by
//! calling into a [`Surface`]; hosts either implement the trait directly on
//! their canvas or replay a [`DisplayList`].

pub mod color;
pub mod display_list;
pub mod path;
pub mod surface;

pub use color::Rgba;
pub use display_list::{DisplayList, DrawOp, TextMetrics};
pub use path::{ArrowDirection, Path, PathCommand, arrow_path, mask_path, rounded_rect};
pub use surface::{Fill, FillRule, FontWeight, Surface, TextRun, TextStyle};
