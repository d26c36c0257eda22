use rollup_compression_research::analysis::{
    OverheadAccumulator, OverheadAnalyser, OverheadModels, SilentTrace, WorstCaseUpdate,
};
use rollup_compression_research::types::{CompressionRecord, RecordRow};

use crate::common::TraceRecorder;

fn rows(pairs: &[(u64, u64)]) -> Vec<RecordRow> {
    pairs
        .iter()
        .enumerate()
        .map(|(i, &(original, compressed))| {
            RecordRow::new(
                i + 1,
                CompressionRecord {
                    block_number: 1,
                    original_size: original,
                    estimated_compressed_size: compressed,
                    transaction_id: format!("tx{}", i + 1),
                },
            )
        })
        .collect()
}

/// Sizes around the model boundaries for a spread of originals
fn boundary_pairs() -> Vec<(u64, u64)> {
    let mut pairs = Vec::new();
    for original in [1u64, 16, 99, 254, 255, 256, 300, 510, 1000, 4096, 120_000] {
        let framing = original + original / 255 + 16;
        let percentage = original + (original as f64 * 0.03) as u64;
        for compressed in [
            0,
            original / 2,
            original,
            original + 1,
            percentage,
            percentage + 1,
            framing,
            framing + 1,
        ] {
            pairs.push((original, compressed));
        }
    }
    pairs
}

#[test]
fn test_expansion_count_matches_rows_above_original() {
    let pairs = boundary_pairs();
    let expected = pairs.iter().filter(|(o, c)| c > o).count();

    let report = OverheadAnalyser::analyse(&rows(&pairs), &OverheadModels::default(), &mut SilentTrace);

    assert_eq!(report.total_records, pairs.len());
    assert_eq!(report.expansion_count, expected);
}

#[test]
fn test_framing_classification_matches_formula() {
    let models = OverheadModels::default();
    for (original, compressed) in boundary_pairs() {
        let allowed = original as i64 + original as i64 / 255 + 16;
        let class = models.classify(original, compressed);
        assert_eq!(
            class.framing_uncovered,
            allowed < compressed as i64,
            "O={} C={}",
            original,
            compressed
        );
    }
}

#[test]
fn test_percentage_classification_matches_formula() {
    let models = OverheadModels::default();
    for (original, compressed) in boundary_pairs() {
        let allowed = original as i64 + (original as f64 * 0.03) as i64;
        let class = models.classify(original, compressed);
        assert_eq!(
            class.percentage_uncovered,
            allowed < compressed as i64,
            "O={} C={}",
            original,
            compressed
        );
    }
}

#[test]
fn test_minimum_margin_is_first_minimum() {
    let pairs = boundary_pairs();
    let margins: Vec<i64> = pairs
        .iter()
        .map(|&(o, c)| o as i64 + (o as f64 * 0.03) as i64 - c as i64)
        .collect();
    let min = *margins.iter().min().unwrap();
    let first_index = margins.iter().position(|&m| m == min).unwrap() + 1;

    let report = OverheadAnalyser::analyse(&rows(&pairs), &OverheadModels::default(), &mut SilentTrace);
    let worst = report.worst_case.unwrap();

    assert_eq!(worst.margin, min);
    assert_eq!(worst.row_index, first_index);
    assert_eq!(worst.transaction_id, format!("tx{}", first_index));
}

#[test]
fn test_trace_fires_once_per_strict_improvement() {
    let input = rows(&[(1000, 900), (1000, 950), (1000, 950), (1000, 800), (1000, 1100)]);
    let mut recorder = TraceRecorder::default();

    OverheadAnalyser::analyse(
        &input,
        &OverheadModels::default(),
        &mut |update: &WorstCaseUpdate<'_>| recorder.observe(update),
    );

    let improved_rows: Vec<usize> = recorder.updates.iter().map(|u| u.0).collect();
    assert_eq!(improved_rows, vec![1, 2, 5]);
    assert_eq!(recorder.updates.last().unwrap().1, -70);
}

#[test]
fn test_diagnostic_column_never_replaces_margin() {
    let input = rows(&[(1000, 1200)]);
    let mut recorder = TraceRecorder::default();

    let report = OverheadAnalyser::analyse(
        &input,
        &OverheadModels::default(),
        &mut |update: &WorstCaseUpdate<'_>| recorder.observe(update),
    );

    assert_eq!(recorder.updates, vec![(1, -170, -160)]);
    assert_eq!(report.worst_case.unwrap().margin, -170);
    assert!(recorder.lines[0].ends_with("1000 1200 -160 -170"));
}

#[test]
fn test_custom_framing_constants() {
    let models = OverheadModels {
        framing_divisor: 100,
        framing_constant: 0,
        ..OverheadModels::default()
    };
    assert_eq!(models.framing_allowance(1000), 1010);
    assert!(models.classify(1000, 1011).framing_uncovered);
    assert!(!models.classify(1000, 1010).framing_uncovered);
}

#[test]
fn test_accumulator_fold_matches_analyser() {
    let models = OverheadModels::default();
    let input = rows(&boundary_pairs());

    let folded = input
        .iter()
        .fold(OverheadAccumulator::new(), |acc, row| acc.step(&models, row).0)
        .finish();

    assert_eq!(folded, OverheadAnalyser::analyse(&input, &models, &mut SilentTrace));
}
