//! Compression overhead analysis
//!
//! The analysis phase reads a record file produced by the extractor and
//! compares each transaction's original size against its estimated
//! compressed size under the configured overhead models.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rollup_compression_research::analysis::{AnalysisEngine, ConsoleTrace, OverheadModels};
//! use rollup_compression_research::errors::AppResult;
//!
//! fn example() -> AppResult<()> {
//!     let engine = AnalysisEngine::new(OverheadModels::default());
//!     let report = engine.analyse_file("result.csv", &mut ConsoleTrace)?;
//!     println!("{}", report.summary_line());
//!     Ok(())
//! }
//! ```

pub mod overhead;
pub mod reports;

pub use overhead::{
    Classification, ConsoleTrace, OverheadAccumulator, OverheadAnalyser, OverheadModels,
    SilentTrace, WorstCaseObserver, WorstCaseUpdate,
};
pub use reports::{OutputFormat, ReportFormatter};

use crate::errors::AppResult;
use crate::processor::RecordLoader;
use crate::types::{OverheadReport, RecordRow};
use std::path::Path;
use tracing::info;

/// Main analysis engine
pub struct AnalysisEngine {
    models: OverheadModels,
}

impl AnalysisEngine {
    pub fn new(models: OverheadModels) -> Self {
        Self { models }
    }

    pub fn models(&self) -> &OverheadModels {
        &self.models
    }

    /// Load `path` and analyse every record in it
    ///
    /// Any I/O or format error aborts the run; no partial report is returned.
    pub fn analyse_file<O>(&self, path: impl AsRef<Path>, observer: &mut O) -> AppResult<OverheadReport>
    where
        O: WorstCaseObserver + ?Sized,
    {
        let rows = RecordLoader::load_records(path.as_ref())?;
        info!(
            "Loaded {} records from {}",
            rows.len(),
            path.as_ref().display()
        );
        Ok(self.analyse_rows(&rows, observer))
    }

    /// Analyse already-loaded rows
    pub fn analyse_rows<O>(&self, rows: &[RecordRow], observer: &mut O) -> OverheadReport
    where
        O: WorstCaseObserver + ?Sized,
    {
        let report = OverheadAnalyser::analyse(rows, &self.models, observer);
        info!(
            "Analysis complete: {} records, {} expansions, worst margin {:?}",
            report.total_records,
            report.expansion_count,
            report.worst_case.as_ref().map(|w| w.margin)
        );
        report
    }
}
