//! Overhead model report formatter

use super::utils::{export_json, format_number, format_signed_bytes};
use super::OutputFormat;
use crate::analysis::OverheadModels;
use crate::errors::AppResult;
use crate::types::OverheadReport;
use serde::Serialize;

#[derive(Serialize)]
struct OverheadReportExport<'a> {
    models: &'a OverheadModels,
    #[serde(flatten)]
    report: &'a OverheadReport,
}

/// Format the per-model breakdown of an analysis run
pub fn format_overhead_report(
    report: &OverheadReport,
    models: &OverheadModels,
    format: &OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => export_json(&OverheadReportExport { models, report }),
        OutputFormat::Console => {
            let mut output = String::new();
            output.push_str("\n📦 COMPRESSION OVERHEAD ANALYSIS\n");
            output.push_str("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
            output.push_str(&format!(
                "Records analysed:     {}\n\n",
                format_number(report.total_records)
            ));

            output.push_str(&format!(
                "Estimate > original:  {} ({:.2}%)\n",
                format_number(report.expansion_count),
                report.expansion_rate()
            ));
            output.push_str(&format!(
                "Framing model uncovered (O + O/{} + {}):  {} ({:.2}%)\n",
                models.framing_divisor,
                models.framing_constant,
                format_number(report.framing_uncovered),
                report.framing_uncovered_rate()
            ));
            output.push_str(&format!(
                "Percentage model uncovered (O + {}%):  {} ({:.2}%)\n\n",
                models.percentage_rate * 100.0,
                format_number(report.percentage_uncovered),
                report.percentage_uncovered_rate()
            ));

            match &report.worst_case {
                Some(worst) => {
                    output.push_str(&format!(
                        "Worst-case margin (O + {}% - C): {} at row {}\n",
                        models.margin_rate * 100.0,
                        format_signed_bytes(worst.margin),
                        worst.row_index
                    ));
                    output.push_str(&format!("  Transaction: {}\n", worst.transaction_id));
                }
                None => output.push_str("Worst-case margin: no data rows\n"),
            }

            if models.diagnostic_rate != models.margin_rate {
                output.push_str(&format!(
                    "\nNote: trace diagnostic column uses {}%, tracked margin uses {}%\n",
                    models.diagnostic_rate * 100.0,
                    models.margin_rate * 100.0
                ));
            }

            Ok(output)
        }
    }
}
