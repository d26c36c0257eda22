use crate::analysis::{
    AnalysisEngine, ConsoleTrace, OutputFormat, ReportFormatter, SilentTrace, WorstCaseObserver,
};
use crate::config::AppConfig;
use crate::errors::AppResult;
use crate::types::OverheadReport;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Analyse a record file against the overhead models
#[derive(Args, Default)]
pub struct AnalyseCommand {
    /// Record file (overrides paths.input_path)
    #[arg(long)]
    pub input_path: Option<PathBuf>,

    /// Output format: console or json
    #[arg(long, default_value = "console")]
    pub format: String,

    /// Suppress the per-improvement worst-case trace
    #[arg(long)]
    pub quiet: bool,
}

impl AnalyseCommand {
    pub fn run(&self, app_config: &AppConfig) -> AppResult<()> {
        info!("=== Compression Overhead Analysis ===");

        let input_path = self
            .input_path
            .clone()
            .unwrap_or_else(|| app_config.paths.input_path.clone());
        let format = OutputFormat::parse(&self.format);
        let engine = AnalysisEngine::new(app_config.overhead);

        info!("Configuration:");
        info!("  Input: {}", input_path.display());
        info!("  Models: {:?}", engine.models());

        // JSON output keeps stdout machine-readable, so the trace is dropped
        let mut console = ConsoleTrace;
        let mut silent = SilentTrace;
        let observer: &mut dyn WorstCaseObserver = if self.quiet || format == OutputFormat::Json {
            &mut silent as &mut dyn WorstCaseObserver
        } else {
            &mut console as &mut dyn WorstCaseObserver
        };

        let report = engine.analyse_file(&input_path, observer)?;
        print!("{}", render(&report, &engine, &format)?);
        Ok(())
    }
}

fn render(report: &OverheadReport, engine: &AnalysisEngine, format: &OutputFormat) -> AppResult<String> {
    let formatted = ReportFormatter::format_overhead_report(report, engine.models(), format)?;
    Ok(match format {
        OutputFormat::Json => format!("{}\n", formatted),
        OutputFormat::Console => format!("{}\n{}", report.summary_line(), formatted),
    })
}
