//! Gutenberg-Richter b-value analysis core library
//!
//! This library provides the pipeline behind the `gr-core` binary:
//! - Catalog file I/O
//! - The b-value analysis report
//! - Map extent for the map collaborator
//! - Configuration loading, logging and exit codes
//!
//! The binary entry point is in `main.rs`.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod exit_codes;
pub mod logging;
pub mod map;
pub mod output;
