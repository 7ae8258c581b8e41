//! CSV output

use std::io::Write;

use crate::error::{Error, Result};

/// Write a header row and records as CSV into `out`, returning the writer
pub fn write_csv<W, I, R, S>(out: W, headers: &[&str], records: I) -> Result<W>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut writer = csv::Writer::from_writer(out);

    writer.write_record(headers).map_err(csv_err)?;
    for record in records {
        writer
            .write_record(record.as_ref().iter().map(|s| s.as_ref()))
            .map_err(csv_err)?;
    }

    writer.into_inner().map_err(|e| Error::Io(e.into_error()))
}

fn csv_err(e: csv::Error) -> Error {
    Error::Internal(format!("CSV serialization failed: {}", e))
}
