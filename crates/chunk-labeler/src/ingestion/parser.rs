//! Source table parsing for spreadsheets and CSV files

use calamine::{Data, DataType, Reader};
use chrono::Timelike;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::WorkingRow;

/// Supported source table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Excel/OpenDocument workbook (.xlsx, .xlsm, .xls, .ods)
    Spreadsheet,
    /// Comma-separated values
    Csv,
}

impl TableFormat {
    /// Detect table format from extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Spreadsheet),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Detect table format from a file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        Self::from_extension(extension).ok_or_else(|| {
            Error::UnsupportedFormat(format!(
                "{} (expected .xlsx, .xls, .ods or .csv)",
                path.display()
            ))
        })
    }
}

/// In-memory source table: a header row plus data rows of cell text
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    /// Header row
    pub headers: Vec<String>,
    /// Data rows, excluding the header
    pub rows: Vec<Vec<String>>,
    /// Widest row (header included)
    pub width: usize,
}

impl SourceTable {
    /// Build a table from a header row and data rows
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);

        Self {
            headers,
            rows,
            width,
        }
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Pair the identifier and text columns of every data row, in order.
    ///
    /// Fails when the table is narrower than the highest requested column.
    pub fn working_rows(&self, id_column: usize, text_column: usize) -> Result<Vec<WorkingRow>> {
        let required = id_column.max(text_column) + 1;
        if self.width < required {
            return Err(Error::data(format!(
                "source table has {} column(s), at least {} required",
                self.width, required
            )));
        }

        let cell = |row: &[String], col: usize| row.get(col).cloned().unwrap_or_default();

        Ok(self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| WorkingRow::new(i, cell(row, id_column), cell(row, text_column)))
            .collect())
    }
}

/// Table file parser
pub struct TableParser;

impl TableParser {
    /// Parse a table file based on its extension
    pub fn parse(path: &Path, sheet: Option<&str>) -> Result<SourceTable> {
        let format = TableFormat::from_path(path)?;

        // Surface missing/unreadable files as plain IO errors
        std::fs::metadata(path)?;

        let table = match format {
            TableFormat::Spreadsheet => Self::parse_spreadsheet(path, sheet)?,
            TableFormat::Csv => Self::parse_csv(path)?,
        };

        tracing::debug!(
            "Parsed {}: {} data rows, {} columns",
            path.display(),
            table.len(),
            table.width
        );

        Ok(table)
    }

    /// Parse Excel/OpenDocument spreadsheet
    fn parse_spreadsheet(path: &Path, sheet: Option<&str>) -> Result<SourceTable> {
        let mut workbook =
            calamine::open_workbook_auto(path).map_err(|e| Error::table(path, e.to_string()))?;

        let sheet_name = match sheet {
            Some(name) => name.to_string(),
            None => workbook
                .sheet_names()
                .first()
                .cloned()
                .ok_or_else(|| Error::table(path, "workbook has no worksheets"))?,
        };

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| Error::table(path, format!("sheet '{}': {}", sheet_name, e)))?;

        // Ranges start at the first used cell; re-anchor to column A
        let start_col = range.start().map(|(_, col)| col as usize).unwrap_or(0);

        let to_strings = |row: &[Data]| {
            let mut cells = vec![String::new(); start_col];
            cells.extend(row.iter().map(cell_to_string));
            cells
        };

        let mut rows = range.rows();
        let headers = rows.next().map(to_strings).unwrap_or_default();

        // Fully blank rows are not data
        let data = rows
            .filter(|row| !row.iter().all(is_blank))
            .map(to_strings)
            .collect();

        Ok(SourceTable::new(headers, data))
    }

    /// Parse CSV file
    fn parse_csv(path: &Path) -> Result<SourceTable> {
        let file = std::fs::File::open(path)?;
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(std::io::BufReader::new(file));

        let headers = reader
            .headers()
            .map_err(|e| Error::table(path, e.to_string()))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::table(path, e.to_string()))?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(SourceTable::new(headers, rows))
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Render a spreadsheet cell the way it reads in the sheet
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) if !dt.is_duration() => match cell.as_datetime() {
            Some(dt) if dt.num_seconds_from_midnight() == 0 => dt.date().to_string(),
            Some(dt) => dt.to_string(),
            None => cell.to_string(),
        },
        other => other.to_string(),
    }
}
