#![forbid(unsafe_code)]

//! Core: geometry primitives, touch events, and logging shims shared by the
//! GuideKit crates.

pub mod event;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, info, trace, warn};
