use crate::errors::{AppError, AppResult};
use std::io::Write;
use std::time::Instant;

/// Timer-driven progress tracking for long-running operations
pub struct StandardProgressTracker {
    start_time: Option<Instant>,
    last_report: Option<Instant>,
    report_interval_ms: u64,
}

impl Default for StandardProgressTracker {
    fn default() -> Self {
        Self {
            start_time: None,
            last_report: None,
            report_interval_ms: 500,
        }
    }
}

impl StandardProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        let now = Instant::now();
        self.start_time = Some(now);
        self.last_report = Some(now);
    }

    /// True at most once per report interval
    pub fn should_report(&mut self) -> bool {
        let now = Instant::now();
        match self.last_report {
            Some(last) if now.duration_since(last).as_millis() <= self.report_interval_ms as u128 => {
                false
            }
            _ => {
                self.last_report = Some(now);
                true
            }
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.start_time
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

/// Stage-specific metrics shown on the progress line
pub trait StageMetrics {
    /// e.g. "Records: 120 | Deposits skipped: 4"
    fn format_custom_metrics(&self) -> String;
}

/// Progress reporting utilities
pub struct ProgressReporter;

impl ProgressReporter {
    /// Format elapsed seconds as "45.2s", "5m 46s (345.7s)" or "1h 30m 45s (5445.0s)"
    pub fn format_elapsed_time(elapsed_secs: f64) -> String {
        if elapsed_secs < 60.0 {
            format!("{:.1}s", elapsed_secs)
        } else if elapsed_secs < 3600.0 {
            let minutes = (elapsed_secs / 60.0).floor();
            let seconds = elapsed_secs % 60.0;
            format!("{}m {:.0}s ({:.1}s)", minutes, seconds, elapsed_secs)
        } else {
            let hours = (elapsed_secs / 3600.0).floor();
            let remaining = elapsed_secs % 3600.0;
            let minutes = (remaining / 60.0).floor();
            let seconds = remaining % 60.0;
            format!(
                "{}h {}m {:.0}s ({:.1}s)",
                hours, minutes, seconds, elapsed_secs
            )
        }
    }

    /// "Blocks: 3/10 (30.0%) | Elapsed: 1.5s | <metrics>"
    pub fn format_block_progress<T: StageMetrics>(
        metrics: &T,
        blocks_done: u64,
        blocks_total: u64,
        elapsed_secs: f64,
    ) -> String {
        let pct = if blocks_total > 0 {
            (blocks_done as f64 / blocks_total as f64) * 100.0
        } else {
            0.0
        };
        format!(
            "Blocks: {}/{} ({:.1}%) | Elapsed: {} | {}",
            blocks_done,
            blocks_total,
            pct,
            Self::format_elapsed_time(elapsed_secs),
            metrics.format_custom_metrics()
        )
    }

    /// Overwrite the current stderr line
    pub fn print_progress_line(message: &str) -> AppResult<()> {
        let mut stderr = std::io::stderr();
        write!(stderr, "\r{}", message).map_err(AppError::Io)?;
        stderr.flush().map_err(AppError::Io)?;
        Ok(())
    }

    pub fn finish_progress_line() {
        eprintln!();
    }
}
