//! Implementation modules for `engine`.
//!
//! `src/engine.rs` remains the stable facade; the individual checks and the
//! ordered pipeline live here.

pub(crate) mod checks;
pub(crate) mod run;
