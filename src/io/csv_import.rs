use std::path::Path;

use chrono::NaiveDate;

use crate::error::{Result, TrackerError};
use crate::model::{Assignment, Grade};

/// Try parsing a date string with several common formats.
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    for fmt in &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    crate::model::assignment::iso_date::parse(s)
}

/// Detect delimiter by checking the first line for common separators.
fn detect_delimiter(first_line: &str) -> u8 {
    let semicolons = first_line.matches(';').count();
    let commas = first_line.matches(',').count();
    let tabs = first_line.matches('\t').count();

    if semicolons > commas && semicolons >= tabs {
        b';'
    } else if tabs > commas {
        b'\t'
    } else {
        b','
    }
}

/// Normalize a header string to a canonical column key.
fn normalize_header(h: &str) -> String {
    h.trim().to_lowercase().replace([' ', '-', '_'], "")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Unit,
    Task,
    Grade,
    Start,
    Due,
    Notes,
}

fn header_to_col(normalized: &str) -> Option<Column> {
    match normalized {
        "unit" | "unitcode" | "code" | "subject" | "course" | "coursecode" => Some(Column::Unit),
        "task" | "taskname" | "name" | "assignment" | "title" => Some(Column::Task),
        "grade" | "taskgrade" | "targetgrade" => Some(Column::Grade),
        "start" | "startdate" | "from" | "begin" => Some(Column::Start),
        "due" | "duedate" | "end" | "enddate" | "deadline" => Some(Column::Due),
        "notes" | "note" | "description" | "comment" | "comments" => Some(Column::Notes),
        _ => None,
    }
}

/// Import assignments from a CSV file.
///
/// Auto-detects delimiter (comma, semicolon, tab) and matches column headers
/// flexibly ("Unit Code", "task_name", "Due Date", ...). Rows with a missing
/// unit code or task name, or an unreadable date, are skipped. An unknown
/// grade imports as Pass.
///
/// Returns `(assignments, skipped_count)`.
pub fn import_csv(path: &Path) -> Result<(Vec<Assignment>, usize)> {
    let content = std::fs::read_to_string(path)?;
    parse_csv(&content)
}

fn parse_csv(content: &str) -> Result<(Vec<Assignment>, usize)> {
    let first_line = content.lines().next().unwrap_or("");
    let delimiter = detect_delimiter(first_line);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers = reader.headers()?.clone();
    let col_map: Vec<Option<Column>> = headers
        .iter()
        .map(|h| header_to_col(&normalize_header(h)))
        .collect();

    let required = [Column::Unit, Column::Task, Column::Start, Column::Due];
    if !required.iter().all(|r| col_map.contains(&Some(*r))) {
        return Err(TrackerError::MissingColumns {
            found: headers.iter().map(str::to_string).collect(),
        });
    }

    let mut assignments = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let row = i + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(row, error = %e, "skipping csv row");
                skipped += 1;
                continue;
            }
        };

        let field = |col: Column| {
            col_map
                .iter()
                .position(|c| *c == Some(col))
                .and_then(|idx| record.get(idx))
                .unwrap_or("")
        };

        let unit = field(Column::Unit);
        let task = field(Column::Task);
        if unit.is_empty() || task.is_empty() {
            tracing::warn!(row, "skipping csv row without unit code or task name");
            skipped += 1;
            continue;
        }

        let (Some(start), Some(due)) = (
            parse_date(field(Column::Start)),
            parse_date(field(Column::Due)),
        ) else {
            tracing::warn!(
                row,
                start = field(Column::Start),
                due = field(Column::Due),
                "skipping csv row with unreadable dates"
            );
            skipped += 1;
            continue;
        };

        let grade_label = field(Column::Grade);
        let grade = Grade::from_label(grade_label).unwrap_or_else(|| {
            if !grade_label.is_empty() {
                tracing::warn!(row, grade = grade_label, "unknown grade, using Pass");
            }
            Grade::Pass
        });

        let mut assignment = Assignment::new(unit, task, grade, start, due);
        if assignment.span_days().is_none() {
            tracing::warn!(row, "due date precedes start date");
        }
        assignment.notes = field(Column::Notes).to_string();
        assignments.push(assignment);
    }

    if assignments.is_empty() {
        return Err(TrackerError::NoRows { skipped });
    }
    tracing::info!(imported = assignments.len(), skipped, "csv import finished");
    Ok((assignments, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn delimiter_detection() {
        assert_eq!(detect_delimiter("unit;task;start;due"), b';');
        assert_eq!(detect_delimiter("unit\ttask\tstart\tdue"), b'\t');
        assert_eq!(detect_delimiter("unit,task,start,due"), b',');
    }

    #[test]
    fn headers_match_flexibly() {
        assert_eq!(header_to_col(&normalize_header(" Unit Code ")), Some(Column::Unit));
        assert_eq!(header_to_col(&normalize_header("task_name")), Some(Column::Task));
        assert_eq!(header_to_col(&normalize_header("Due-Date")), Some(Column::Due));
        assert_eq!(header_to_col(&normalize_header("colour")), None);
    }

    #[test]
    fn imports_rows_and_counts_skipped() {
        let csv = "Unit Code;Task Name;Grade;Start Date;Due Date;Notes\n\
                   CS101;Lab 1;HD;2024-02-05;19/02/2024;bring laptop\n\
                   CS101;;Pass;2024-02-05;2024-02-19;\n\
                   MATH200;Quiz;Credit;not a date;2024-03-01;\n\
                   MATH200;Problem Set;Whatever;2024-03-01;2024-03-08;\n";
        let (rows, skipped) = parse_csv(csv).unwrap();

        assert_eq!(skipped, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].unit_code, "CS101");
        assert_eq!(rows[0].grade, Grade::HighDistinction);
        assert_eq!(rows[0].due_date, date(2024, 2, 19));
        assert_eq!(rows[0].notes, "bring laptop");
        assert_eq!(rows[1].grade, Grade::Pass);
        assert_ne!(rows[0].id, rows[1].id);
    }

    #[test]
    fn grade_column_is_optional() {
        let csv = "unit,task,start,due\nBIO150,Report,2024-07-01,2024-07-21\n";
        let (rows, skipped) = parse_csv(csv).unwrap();
        assert_eq!(skipped, 0);
        assert_eq!(rows[0].grade, Grade::Pass);
        assert_eq!(rows[0].start_date, date(2024, 7, 1));
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = parse_csv("unit,task,start\nCS101,Lab,2024-01-01\n").unwrap_err();
        assert!(matches!(err, TrackerError::MissingColumns { .. }));
    }

    #[test]
    fn no_valid_rows_is_an_error() {
        let err = parse_csv("unit,task,start,due\nCS101,Lab,bad,bad\n").unwrap_err();
        assert!(matches!(err, TrackerError::NoRows { skipped: 1 }));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("import.csv");
        std::fs::write(&path, "unit,task,start,due\nCS101,Lab,2024-01-01,2024-01-08\n").unwrap();
        let (rows, _) = import_csv(&path).unwrap();
        assert_eq!(rows.len(), 1);
    }
}
