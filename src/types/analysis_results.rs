//! Aggregate results produced by a single overhead analysis pass

use crate::utils::math::safe_percentage;
use serde::{Deserialize, Serialize};

/// The record with the smallest percentage-model margin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorstCase {
    /// `O + trunc(O * margin_rate) - C`; negative means the model under-allows
    pub margin: i64,
    /// 1-based data row index, header excluded
    pub row_index: usize,
    pub transaction_id: String,
}

/// Counts for one analysis run. Computed fresh each run and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverheadReport {
    pub total_records: usize,
    /// Rows whose estimate exceeds the original size
    pub expansion_count: usize,
    /// Rows where the framing model (`O + O/255 + 16`) is insufficient
    pub framing_uncovered: usize,
    /// Rows where the percentage model (`O + O*3%`) is insufficient
    pub percentage_uncovered: usize,
    /// `None` when no data rows were seen
    pub worst_case: Option<WorstCase>,
}

impl OverheadReport {
    pub fn expansion_rate(&self) -> f64 {
        safe_percentage(self.expansion_count, self.total_records)
    }

    pub fn framing_uncovered_rate(&self) -> f64 {
        safe_percentage(self.framing_uncovered, self.total_records)
    }

    pub fn percentage_uncovered_rate(&self) -> f64 {
        safe_percentage(self.percentage_uncovered, self.total_records)
    }

    /// One-line summary, field order fixed:
    /// total, not compressed, overhead1, overhead2, worst case, line
    pub fn summary_line(&self) -> String {
        let (margin, line) = match &self.worst_case {
            Some(worst) => (worst.margin.to_string(), worst.row_index.to_string()),
            None => ("n/a".to_string(), "n/a".to_string()),
        };
        format!(
            "total:{}, not compressed: {}, overhead1: {}, overhead2: {}, worst case:{}, line: {}",
            self.total_records,
            self.expansion_count,
            self.framing_uncovered,
            self.percentage_uncovered,
            margin,
            line
        )
    }
}
