//! Command-line front end for the shoal clustering engine.
//!
//! Reads a tab-separated edge list, runs the clustering pipeline and renders
//! the resulting hierarchy as indented text.

pub mod cli;
pub mod logging;
