//! Input/Output operations for SCF calculations
//!
//! This module handles logging setup and matrix printout.

mod output;

pub use output::{format_matrix, setup_output};
pub(crate) use output::format_levels;
