//! Core math modules.

pub mod stable;
pub mod catalog;
pub mod aki;
pub mod binning;
pub mod gutenberg_richter;
