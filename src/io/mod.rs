//! # I/O Module
//!
//! File reading/writing boundaries: the analysis report produced by the parse
//! phase, descriptor files consumed by the dispatch engine, and directory setup.

pub mod descriptor;
pub mod fs;
pub mod report;
