//! Transformation module.
//!
//! This module handles table transformations:
//! - Split: one column into two on a delimiter

pub mod split;

pub use split::*;
