//! Report formatting and output generation
//!
//! Provides formatting for analysis results via the [`ReportFormatter`] facade.
//! Supports Console and JSON output formats.

pub mod overhead;
pub mod utils;

use crate::analysis::OverheadModels;
use crate::errors::AppResult;
use crate::types::OverheadReport;

/// Output format options for analysis reports
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
}

impl OutputFormat {
    /// Unknown values fall back to console output
    pub fn parse(format_str: &str) -> Self {
        match format_str.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Console,
        }
    }
}

/// Facade for all report formatting operations
pub struct ReportFormatter;

impl ReportFormatter {
    /// Format an overhead report together with the model constants that produced it
    pub fn format_overhead_report(
        report: &OverheadReport,
        models: &OverheadModels,
        format: &OutputFormat,
    ) -> AppResult<String> {
        overhead::format_overhead_report(report, models, format)
    }
}
