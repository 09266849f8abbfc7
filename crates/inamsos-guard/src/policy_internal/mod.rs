//! Implementation modules for `policy`.
//!
//! `src/policy.rs` is the stable facade; table data and file parsing live here.

pub(crate) mod builtin;
pub(crate) mod file;
