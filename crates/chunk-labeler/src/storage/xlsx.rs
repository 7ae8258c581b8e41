//! Minimal single-sheet xlsx writer
//!
//! Emits just enough of the SpreadsheetML package (content types, package and
//! workbook relationships, workbook, one worksheet) for Excel, LibreOffice and
//! calamine to open it. Cells are written as inline strings, so no shared
//! string table or styles part is needed.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Error, Result};

/// Worksheet name used for every output file
pub const SHEET_NAME: &str = "Sheet1";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Write a header row and records as an xlsx package into `out`.
///
/// Returns the underlying writer once the zip central directory is written.
pub fn write_workbook<W, I, R, S>(out: W, headers: &[&str], records: I) -> Result<W>
where
    W: Write + Seek,
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let sheet = worksheet_xml(headers, records)?;
    let workbook = workbook_xml();

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(out);

    let parts: [(&str, &[u8]); 5] = [
        ("[Content_Types].xml", CONTENT_TYPES.as_bytes()),
        ("_rels/.rels", PACKAGE_RELS.as_bytes()),
        ("xl/workbook.xml", workbook.as_bytes()),
        ("xl/_rels/workbook.xml.rels", WORKBOOK_RELS.as_bytes()),
        ("xl/worksheets/sheet1.xml", &sheet),
    ];

    for (name, body) in parts {
        zip.start_file(name, options).map_err(zip_err)?;
        zip.write_all(body)?;
    }

    zip.finish().map_err(zip_err)
}

fn workbook_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="{}" xmlns:r="{}"><sheets><sheet name="{}" sheetId="1" r:id="rId1"/></sheets></workbook>"#,
        SPREADSHEET_NS, RELATIONSHIP_NS, SHEET_NAME
    )
}

/// Serialize the worksheet part
fn worksheet_xml<I, R, S>(headers: &[&str], records: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(
            BytesStart::new("worksheet").with_attributes([("xmlns", SPREADSHEET_NS)]),
        ))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Start(BytesStart::new("sheetData")))
        .map_err(xml_err)?;

    write_row(&mut writer, 1, headers)?;
    for (i, record) in records.into_iter().enumerate() {
        write_row(&mut writer, i + 2, record.as_ref())?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("sheetData")))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new("worksheet")))
        .map_err(xml_err)?;

    Ok(writer.into_inner())
}

fn write_row<S: AsRef<str>>(writer: &mut Writer<Vec<u8>>, row: usize, cells: &[S]) -> Result<()> {
    let row_ref = row.to_string();
    writer
        .write_event(Event::Start(
            BytesStart::new("row").with_attributes([("r", row_ref.as_str())]),
        ))
        .map_err(xml_err)?;

    for (col, value) in cells.iter().enumerate() {
        let value = sanitize(value.as_ref());
        // Empty cells are simply omitted
        if value.is_empty() {
            continue;
        }

        let cell_ref = format!("{}{}", column_name(col), row);
        writer
            .write_event(Event::Start(
                BytesStart::new("c").with_attributes([("r", cell_ref.as_str()), ("t", "inlineStr")]),
            ))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Start(BytesStart::new("is")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Start(
                BytesStart::new("t").with_attributes([("xml:space", "preserve")]),
            ))
            .map_err(xml_err)?;
        writer
            .write_event(Event::Text(BytesText::new(&value)))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("t")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("is")))
            .map_err(xml_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("c")))
            .map_err(xml_err)?;
    }

    writer
        .write_event(Event::End(BytesEnd::new("row")))
        .map_err(xml_err)?;
    Ok(())
}

/// Spreadsheet column letters for a zero-based index (0 -> A, 26 -> AA)
pub fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

/// Drop characters XML 1.0 cannot carry
fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}

fn xml_err(e: impl std::fmt::Display) -> Error {
    Error::Internal(format!("xlsx serialization failed: {}", e))
}

fn zip_err(e: zip::result::ZipError) -> Error {
    match e {
        zip::result::ZipError::Io(io) => Error::Io(io),
        other => Error::Internal(format!("xlsx packaging failed: {}", other)),
    }
}
