// ClassDesk - core/import.rs
//
// Local preview of a student spreadsheet before it is posted for bulk import.
// The file is sent to the server unchanged; this only lets the teacher see
// what is about to be imported and catches missing columns early.
//
// Supported formats: CSV (csv crate) and XLSX (calamine, first worksheet).

use crate::core::content::extension_of;
use crate::util::constants::{IMPORT_PREVIEW_ROWS, MAX_IMPORT_FILE_BYTES, MAX_IMPORT_ROWS};
use crate::util::error::{ExportError, ImportError};
use calamine::{Reader, Xlsx};
use std::io::{Cursor, Write};
use std::path::Path;

/// Canonical column names, in template order.
pub const TEMPLATE_HEADERS: [&str; 3] = ["name", "email", "rollNumber"];

/// One data row as shown in the preview table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRow {
    /// 1-based spreadsheet row number, as the user sees it in the file.
    pub row: usize,
    pub name: String,
    pub email: String,
    pub roll_number: String,
}

/// Summary of a spreadsheet's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPreview {
    /// The first `IMPORT_PREVIEW_ROWS` non-blank data rows.
    pub rows: Vec<PreviewRow>,
    /// Non-blank data rows in the file.
    pub total_rows: usize,
    /// Rows where every cell is empty (ignored).
    pub blank_rows: usize,
    /// Non-blank rows with an empty email cell.
    pub missing_email_rows: usize,
    pub has_roll_column: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    Email,
    RollNumber,
}

/// Map a header cell to a known column. Case, spaces, underscores and
/// hyphens are ignored, so "Roll Number", "roll_number" and "rollNumber"
/// are the same column.
fn classify_header(header: &str) -> Option<Column> {
    let normalised: String = header
        .chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect();
    match normalised.as_str() {
        "name" | "fullname" | "studentname" => Some(Column::Name),
        "email" | "emailaddress" | "mail" => Some(Column::Email),
        "rollnumber" | "rollno" | "roll" => Some(Column::RollNumber),
        _ => None,
    }
}

/// Build a preview from a header row and raw data rows. `header_row` is the
/// 1-based sheet row of the header; data rows follow it directly.
fn build_preview<I>(
    header: &[String],
    header_row: usize,
    rows: I,
) -> Result<ImportPreview, ImportError>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let find = |col: Column| header.iter().position(|h| classify_header(h) == Some(col));
    let name_idx = find(Column::Name).ok_or(ImportError::MissingColumn { column: "name" })?;
    let email_idx = find(Column::Email).ok_or(ImportError::MissingColumn { column: "email" })?;
    let roll_idx = find(Column::RollNumber);

    let mut preview = ImportPreview {
        rows: Vec::new(),
        total_rows: 0,
        blank_rows: 0,
        missing_email_rows: 0,
        has_roll_column: roll_idx.is_some(),
    };

    for (i, cells) in rows.into_iter().enumerate() {
        if cells.iter().all(|c| c.trim().is_empty()) {
            preview.blank_rows += 1;
            continue;
        }
        preview.total_rows += 1;

        let cell = |idx: usize| cells.get(idx).map(|c| c.trim().to_string()).unwrap_or_default();
        let row = PreviewRow {
            row: header_row + 1 + i,
            name: cell(name_idx),
            email: cell(email_idx),
            roll_number: roll_idx.map(cell).unwrap_or_default(),
        };
        if row.email.is_empty() {
            preview.missing_email_rows += 1;
        }
        if preview.rows.len() < IMPORT_PREVIEW_ROWS {
            preview.rows.push(row);
        }
    }

    if preview.total_rows == 0 {
        return Err(ImportError::Empty);
    }
    if preview.total_rows > MAX_IMPORT_ROWS {
        return Err(ImportError::TooManyRows {
            count: preview.total_rows,
            max: MAX_IMPORT_ROWS,
        });
    }
    Ok(preview)
}

/// Preview CSV bytes.
pub fn preview_csv(data: &[u8]) -> Result<ImportPreview, ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(data));

    let header: Vec<String> = rdr
        .headers()
        .map_err(|e| ImportError::Csv { source: e })?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record.map_err(|e| ImportError::Csv { source: e })?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    build_preview(&header, 1, rows)
}

/// Preview the first worksheet of XLSX bytes.
pub fn preview_xlsx(data: &[u8]) -> Result<ImportPreview, ImportError> {
    let mut workbook: Xlsx<_> =
        Xlsx::new(Cursor::new(data)).map_err(|e| ImportError::Xlsx { source: e })?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(ImportError::NoWorksheet)?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ImportError::Xlsx { source: e })?;

    // The range starts at the first used cell, not at A1.
    let header_row = range.start().map_or(1, |(row, _)| row as usize + 1);
    let mut rows_iter = range
        .rows()
        .map(|r| r.iter().map(|c| c.to_string()).collect::<Vec<String>>());
    let header = rows_iter.next().ok_or(ImportError::Empty)?;
    build_preview(&header, header_row, rows_iter)
}

/// Read and preview a spreadsheet from disk, dispatching on extension.
pub fn preview_file(path: &Path) -> Result<ImportPreview, ImportError> {
    let extension = extension_of(path);
    if !matches!(extension.as_str(), "csv" | "xlsx") {
        return Err(ImportError::UnsupportedFormat { extension });
    }

    let size = std::fs::metadata(path)
        .map_err(|e| ImportError::Io {
            path: path.to_path_buf(),
            source: e,
        })?
        .len();
    if size > MAX_IMPORT_FILE_BYTES {
        return Err(ImportError::FileTooLarge {
            size,
            max: MAX_IMPORT_FILE_BYTES,
        });
    }

    let data = std::fs::read(path).map_err(|e| ImportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let preview = if extension == "xlsx" {
        preview_xlsx(&data)?
    } else {
        preview_csv(&data)?
    };
    tracing::debug!(
        file = %path.display(),
        rows = preview.total_rows,
        blank = preview.blank_rows,
        "Import file previewed"
    );
    Ok(preview)
}

/// Write the CSV import template: header plus one example row.
pub fn write_template<W: Write>(writer: W, path: &Path) -> Result<(), ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e| ExportError::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    csv_writer.write_record(TEMPLATE_HEADERS).map_err(csv_err)?;
    csv_writer
        .write_record(["Ada Lovelace", "ada.lovelace@example.com", "1"])
        .map_err(csv_err)?;
    csv_writer.flush().map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(())
}
