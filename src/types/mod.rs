//! Core data types for the compression overhead pipeline

pub mod analysis_results;
pub mod record;

pub use analysis_results::{OverheadReport, WorstCase};
pub use record::{CompressionRecord, RecordRow, RECORD_HEADER};
