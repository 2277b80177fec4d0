// ClassDesk - core/export.rs
//
// CSV and JSON export of the (filtered, sorted) student roster.
// Core layer: writes to any Write trait object.

use crate::core::model::Student;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// Suggested file name for a roster export of `classroom`.
    pub fn default_file_name(&self, classroom: &str) -> String {
        let stem: String = classroom
            .trim()
            .chars()
            .map(|c| if c.is_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        let stem = stem.trim_matches('_');
        let stem = if stem.is_empty() { "students" } else { stem };
        format!("{stem}_roster.{}", self.extension())
    }
}

/// Write `students` in `format`, returning the number written.
pub fn export<W: Write>(
    format: ExportFormat,
    students: &[&Student],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    match format {
        ExportFormat::Csv => export_csv(students, writer, export_path),
        ExportFormat::Json => export_json(students, writer, export_path),
    }
}

/// Export students to CSV.
///
/// Writes: name, email, roll_number, joined_at
pub fn export_csv<W: Write>(
    students: &[&Student],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    csv_writer
        .write_record(["name", "email", "roll_number", "joined_at"])
        .map_err(csv_err)?;

    let mut count = 0;
    for student in students {
        let joined = student
            .created_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        csv_writer
            .write_record([
                student.name.as_str(),
                student.email.as_str(),
                student.roll_number.as_str(),
                joined.as_str(),
            ])
            .map_err(csv_err)?;
        count += 1;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export students to JSON (array of objects).
pub fn export_json<W: Write>(
    students: &[&Student],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, students).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(students.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn make_student(id: &str, name: &str) -> Student {
        Student {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{id}@example.com"),
            roll_number: id.to_string(),
            created_at: Some(Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap()),
        }
    }

    #[test]
    fn test_csv_export() {
        let a = make_student("1", "Ada, Countess");
        let b = make_student("2", "Grace");
        let mut buf = Vec::new();
        let count = export_csv(&[&a, &b], &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("name,email,roll_number,joined_at"));
        assert!(output.contains("\"Ada, Countess\",1@example.com,1,2024-09-01T08:00:00+00:00"));
        assert!(output.contains("Grace"));
    }

    #[test]
    fn test_json_export() {
        let a = make_student("1", "Test student");
        let mut buf = Vec::new();
        let count = export_json(&[&a], &mut buf, &PathBuf::from("out.json")).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("Test student"));
        assert!(output.contains("\"rollNumber\": \"1\""));
    }

    #[test]
    fn test_default_file_name() {
        assert_eq!(
            ExportFormat::Csv.default_file_name("Physics 101"),
            "physics_101_roster.csv"
        );
        assert_eq!(ExportFormat::Json.default_file_name("  "), "students_roster.json");
    }
}
