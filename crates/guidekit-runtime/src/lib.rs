#![forbid(unsafe_code)]

//! Runtime: the tour state store and the handles that read and write it,
//! display-refresh scheduling, and configuration.
//!
//! # Example
//!
//! ```
//! use guidekit_runtime::{GuideProvider, StartOptions};
//!
//! let provider = GuideProvider::new();
//! let guide = provider.handle().use_guide_context();
//! guide.start(StartOptions::new(["welcome", "search", "profile"]));
//! assert_eq!(guide.current_key().as_deref(), Some("welcome"));
//!
//! guide.go_next_step();
//! assert_eq!(guide.current_key().as_deref(), Some("search"));
//!
//! guide.close_guide();
//! assert!(guide.current_key().is_none());
//! ```

pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod frame;
pub mod key;
pub mod store;

pub use config::{GuideConfig, TooltipMetrics};
pub use context::{GuideContext, GuideHandle, GuideProvider, GuideState};
pub use descriptor::{
    Callback, DescriptorUpdate, HorizontalAlign, MaskStep, Placement, StepDescriptor, StepKind,
    TooltipSpec,
};
pub use error::{GuideError, Result};
pub use frame::{FrameCallback, FrameRequestId, FrameScheduler, ManualFrameClock};
pub use key::StepKey;
pub use store::{Advance, GuideStore, StartOptions};
