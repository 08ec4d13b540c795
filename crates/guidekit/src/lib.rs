#![forbid(unsafe_code)]

//! GuideKit public facade crate.
//!
//! Re-exports the types a host needs to run a tour and offers a prelude.
//!
//! ```
//! use guidekit::prelude::*;
//!
//! let provider = GuideProvider::new();
//! let clock = ManualFrameClock::new();
//! let target = GuideTarget::builder("search")
//!     .tooltip(TooltipSpec::new(Placement::BottomLeft).title("Search here"))
//!     .mount(provider.handle(), clock.clone(), || {
//!         PartialRect::from(Rect::new(16.0, 40.0, 200.0, 32.0))
//!     });
//!
//! provider.handle().use_guide_state().start(StartOptions::new(["search"]));
//! target.sync();
//!
//! let mut overlay = MaskOverlay::new(provider.handle());
//! let mut list = DisplayList::new();
//! let frame = overlay.render(Size::new(390.0, 844.0), &mut list).unwrap();
//! assert_eq!(frame.hole, Rect::new(8.0, 32.0, 216.0, 48.0));
//! ```

// --- Core re-exports -------------------------------------------------------

pub use guidekit_core::event::{TouchEvent, TouchPhase};
pub use guidekit_core::geometry::{PartialRect, Point, Rect, Size};

// --- Render re-exports -----------------------------------------------------

pub use guidekit_render::{
    DisplayList, DrawOp, Fill, FillRule, Path, Rgba, Surface, TextRun, TextStyle, mask_path,
};

// --- Runtime re-exports ----------------------------------------------------

pub use guidekit_runtime::{
    Advance, DescriptorUpdate, FrameScheduler, GuideConfig, GuideContext, GuideError,
    GuideHandle, GuideProvider, GuideState, ManualFrameClock, MaskStep, Placement, Result,
    StartOptions, StepDescriptor, StepKey, TooltipMetrics, TooltipSpec,
};

// --- Widget re-exports -----------------------------------------------------

pub use guidekit_widgets::{
    GuideTarget, MaskOverlay, Measurable, OverlayFrame, Tooltip, TouchOutcome,
};

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        DisplayList, GuideConfig, GuideHandle, GuideProvider, GuideTarget, ManualFrameClock,
        MaskOverlay, MaskStep, PartialRect, Placement, Rect, Size, StartOptions, TooltipSpec,
        TouchEvent, TouchOutcome,
    };

    pub use crate::{core, render, runtime, widgets};
}

pub use guidekit_core as core;
pub use guidekit_render as render;
pub use guidekit_runtime as runtime;
pub use guidekit_widgets as widgets;
