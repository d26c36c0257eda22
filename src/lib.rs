//! Rollup Compression Overhead Analyser
//!

pub mod analysis;
pub mod cli;
pub mod config;
pub mod errors;
pub mod processor;
pub mod rpc;
pub mod types;
pub mod utils;
