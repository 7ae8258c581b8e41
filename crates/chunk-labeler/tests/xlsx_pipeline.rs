//! End-to-end run over an xlsx source with xlsx checkpoints

use calamine::{Data, Reader};
use chunk_labeler::config::OutputFormat;
use chunk_labeler::storage::write_records;
use chunk_labeler::{ChunkedLabelingPipeline, Error, FnLabeler, LabelerConfig, Labeler};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

/// Source sheet shaped like an investor Q&A export: code, date, question, answer
fn write_source(path: &Path, rows: usize) {
    let records: Vec<Vec<String>> = (0..rows)
        .map(|i| {
            vec![
                format!("{:06}", 600000 + i),
                "2022-03-01".to_string(),
                format!("question {}", i),
                format!("answer {}", i),
            ]
        })
        .collect();

    write_records(
        path,
        OutputFormat::Xlsx,
        &["code", "date", "question", "answer"],
        &records,
    )
    .unwrap();
}

fn read_sheet(path: &Path) -> Vec<Vec<String>> {
    let mut workbook = calamine::open_workbook_auto(path).unwrap();
    let name = workbook.sheet_names()[0].clone();
    let range = workbook.worksheet_range(&name).unwrap();
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::String(s) => s.clone(),
                    Data::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

fn classify() -> Arc<dyn Labeler> {
    Arc::new(FnLabeler::new("parity", |texts: &[String]| {
        if texts.iter().any(|t| t == "question 7") {
            return Err(Error::labeling("rate limited"));
        }
        Ok(texts
            .iter()
            .map(|t| {
                let n: usize = t.trim_start_matches("question ").parse().unwrap_or(0);
                let label = if n % 2 == 0 { "even" } else { "odd" };
                label.to_string()
            })
            .collect())
    }))
}

#[tokio::test]
async fn test_xlsx_source_to_xlsx_checkpoints() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("2022_test.xlsx");
    write_source(&source, 12);

    let mut config = LabelerConfig::default();
    config.source.path = source;
    config.pipeline.chunk_size = 5;
    config.pipeline.flush_every = 1;
    config.output.dir = dir.path().join("labeled");

    let report = ChunkedLabelingPipeline::new(config, classify())
        .unwrap()
        .run()
        .await
        .unwrap();

    // Chunks: [0..5) ok, [5..10) fails on "question 7", [10..12) ok and last
    let names: Vec<String> = report
        .files_written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["test_1.xlsx", "test_2.xlsx", "test2_3.xlsx"]);
    assert_eq!(report.chunks_total, 3);
    assert_eq!(report.chunks_succeeded, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].rows, 5..10);

    let first = read_sheet(&report.files_written[0]);
    assert_eq!(first.len(), 1 + 5);

    let last = read_sheet(report.final_file().unwrap());
    assert_eq!(last[0], vec!["se_code", "rowtext", "labeledtext"]);
    assert_eq!(last.len(), 1 + 7);
    assert_eq!(last[1], vec!["600000", "question 0", "even"]);
    assert_eq!(last[5], vec!["600004", "question 4", "even"]);
    assert_eq!(last[6], vec!["600010", "question 10", "even"]);
    assert_eq!(last[7], vec!["600011", "question 11", "odd"]);
}

#[tokio::test]
async fn test_two_column_sheet_is_rejected() {
    let dir = TempDir::new().unwrap();
    let source = dir.path().join("narrow.xlsx");
    write_records(&source, OutputFormat::Xlsx, &["code", "question"], vec![["1", "q"]]).unwrap();

    let mut config = LabelerConfig::default();
    config.source.path = source;
    config.output.dir = dir.path().join("labeled");

    let result = ChunkedLabelingPipeline::new(config, classify())
        .unwrap()
        .run()
        .await;
    assert!(matches!(result, Err(Error::Data(_))));
}
