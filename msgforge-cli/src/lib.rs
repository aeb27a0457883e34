//! # msgforge-cli
//!
//! Driver for the msgforge schema compiler: discovers `.msg` documents and
//! annotated `.rs` sources, runs the project-wide discovery pass, compiles
//! each file, and writes the generated Rust modules.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod scanner;
pub mod writer;
