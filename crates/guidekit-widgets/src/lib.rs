#![forbid(unsafe_code)]

//! Widgets for GuideKit tours.
//!
//! - [`GuideTarget`](target::GuideTarget) measures a host element while its
//!   step is active and publishes the highlight rectangle.
//! - [`MaskOverlay`](overlay::MaskOverlay) dims the viewport around the active
//!   highlight, draws the tooltip, and routes touches.
//! - [`Tooltip`](tooltip::Tooltip) sizes and draws the tooltip bubble.

pub mod overlay;
pub mod target;
pub mod tooltip;

pub use overlay::{MaskOverlay, OverlayFrame, TouchOutcome};
pub use target::{GuideTarget, GuideTargetBuilder, Measurable};
pub use tooltip::{Tooltip, TooltipLayout, arrow_offset, tooltip_offset};
