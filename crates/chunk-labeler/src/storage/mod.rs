//! Output table persistence
//!
//! Every write goes to a temporary file next to the destination and is then
//! renamed over it, so a crash mid-write never leaves a truncated checkpoint.

mod csv_table;
pub mod xlsx;

use std::io::BufWriter;
use std::path::Path;
use tempfile::Builder;

use crate::config::OutputFormat;
use crate::error::{Error, Result};
use crate::types::LabeledRow;

/// Atomically write a header row and records to `path`
pub fn write_records<I, R, S>(
    path: &Path,
    format: OutputFormat,
    headers: &[&str],
    records: I,
) -> Result<()>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let temp = temp_builder().tempfile_in(parent)?;
    let buffered = BufWriter::new(temp);

    let buffered = match format {
        OutputFormat::Xlsx => xlsx::write_workbook(buffered, headers, records)?,
        OutputFormat::Csv => csv_table::write_csv(buffered, headers, records)?,
    };

    let temp = buffered.into_inner().map_err(|e| Error::Io(e.into_error()))?;

    temp.persist(path)
        .map_err(|e| Error::table(path, format!("failed to persist: {}", e.error)))?;

    Ok(())
}

/// Temp files are owner-only by default; ask for 0o666 so the persisted
/// file ends up with the usual umask-derived mode.
#[cfg(unix)]
fn temp_builder() -> Builder<'static, 'static> {
    use std::os::unix::fs::PermissionsExt;

    let mut builder = Builder::new();
    builder.permissions(std::fs::Permissions::from_mode(0o666));
    builder
}

#[cfg(not(unix))]
fn temp_builder() -> Builder<'static, 'static> {
    Builder::new()
}

/// Atomically write labeled rows with the `se_code, rowtext, labeledtext` header
pub fn write_labeled(path: &Path, format: OutputFormat, rows: &[LabeledRow]) -> Result<()> {
    write_records(
        path,
        format,
        &LabeledRow::HEADERS,
        rows.iter().map(LabeledRow::as_record),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader};
    use std::fs;
    use tempfile::TempDir;

    fn rows() -> Vec<LabeledRow> {
        vec![
            LabeledRow {
                id: "600000".to_string(),
                text: "Contains, comma".to_string(),
                label: "dividend".to_string(),
            },
            LabeledRow {
                id: "000001".to_string(),
                text: "Multi\nline".to_string(),
                label: "".to_string(),
            },
        ]
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write_labeled(&path, OutputFormat::Csv, &rows()).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, vec!["se_code", "rowtext", "labeledtext"]);

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][1], "Contains, comma");
        assert_eq!(&records[1][1], "Multi\nline");
    }

    #[test]
    fn test_write_xlsx_readable_by_calamine() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.xlsx");
        write_labeled(&path, OutputFormat::Xlsx, &rows()).unwrap();

        let mut workbook = calamine::open_workbook_auto(&path).unwrap();
        assert_eq!(workbook.sheet_names(), vec![xlsx::SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range(xlsx::SHEET_NAME).unwrap();
        let cells: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0][0], Data::String("se_code".to_string()));
        assert_eq!(cells[1][2], Data::String("dividend".to_string()));
        assert_eq!(cells[2][0], Data::String("000001".to_string()));
        assert_eq!(cells[2][2], Data::Empty);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "OLD_CONTENT").unwrap();

        write_labeled(&path, OutputFormat::Csv, &rows()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("OLD_CONTENT"));
        assert!(content.starts_with("se_code,rowtext,labeledtext"));

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1, "only the persisted file should remain");
    }

    #[cfg(unix)]
    #[test]
    fn test_output_mode_follows_umask() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let reference = dir.path().join("reference.txt");
        fs::File::create(&reference).unwrap();
        let expected = fs::metadata(&reference).unwrap().permissions().mode() & 0o777;

        for (name, format) in [("out.csv", OutputFormat::Csv), ("out.xlsx", OutputFormat::Xlsx)] {
            let path = dir.path().join(name);
            write_labeled(&path, format, &rows()).unwrap();
            let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
            assert_eq!(mode, expected, "{} mode {:o}", name, mode);
        }
    }

    #[test]
    fn test_unwritable_destination_fails() {
        let result = write_labeled(
            Path::new("/nonexistent/dir/out.csv"),
            OutputFormat::Csv,
            &rows(),
        );
        assert!(result.is_err());
    }
}
