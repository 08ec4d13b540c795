#![forbid(unsafe_code)]

//! GuideKit demo library: argument parsing and the scripted tour, split out
//! of the binary so both are testable.

pub mod cli;
pub mod tour;
