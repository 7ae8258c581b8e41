//! Row and chunk types flowing through the pipeline

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A source row reduced to the two columns the pipeline uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingRow {
    /// Zero-based data row index in the source table
    pub row: usize,
    /// Identifier column value
    pub id: String,
    /// Free text sent to the labeler
    pub text: String,
}

impl WorkingRow {
    pub fn new(row: usize, id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            row,
            id: id.into(),
            text: text.into(),
        }
    }
}

/// Contiguous slice of working rows submitted in one labeling call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based chunk index
    pub index: usize,
    /// Rows in source order
    pub rows: Vec<WorkingRow>,
    /// Set on the final chunk of the table
    pub is_last: bool,
}

impl Chunk {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data row range covered by this chunk
    pub fn row_range(&self) -> Range<usize> {
        match (self.rows.first(), self.rows.last()) {
            (Some(first), Some(last)) => first.row..last.row + 1,
            _ => 0..0,
        }
    }

    /// Texts in row order, as handed to the labeler
    pub fn texts(&self) -> Vec<String> {
        self.rows.iter().map(|r| r.text.clone()).collect()
    }

    /// Attach one label per row, in order.
    ///
    /// Callers must have checked that `labels.len() == self.len()`.
    pub fn into_labeled(self, labels: Vec<String>) -> Vec<LabeledRow> {
        self.rows
            .into_iter()
            .zip(labels)
            .map(|(row, label)| LabeledRow {
                id: row.id,
                text: row.text,
                label,
            })
            .collect()
    }
}

/// A row after a successful labeling call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRow {
    pub id: String,
    pub text: String,
    pub label: String,
}

impl LabeledRow {
    /// Output columns, in file order
    pub const HEADERS: [&'static str; 3] = ["se_code", "rowtext", "labeledtext"];

    pub fn as_record(&self) -> [&str; 3] {
        [&self.id, &self.text, &self.label]
    }
}
