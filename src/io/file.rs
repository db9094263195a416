use std::path::Path;

use crate::error::Result;
use crate::model::Assignment;

/// Save assignments as a pretty-printed JSON array.
///
/// The data is written to a sibling temp file and renamed into place, so an
/// interrupted save never leaves a truncated file behind.
pub fn save_assignments(records: &[Assignment], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(records)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, json)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// Load assignments from a JSON array.
pub fn load_assignments(path: &Path) -> Result<Vec<Assignment>> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Load assignments, treating a missing or unreadable file as "no records".
///
/// A file that exists but cannot be parsed is copied to `<name>.bak` first so
/// the next save does not destroy it.
pub fn load_or_empty(path: &Path) -> Vec<Assignment> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "no data file yet, starting empty");
        return Vec::new();
    }
    match load_assignments(path) {
        Ok(records) => {
            tracing::info!(path = %path.display(), count = records.len(), "loaded assignments");
            records
        }
        Err(e) => {
            let backup = path.with_extension("json.bak");
            tracing::warn!(
                path = %path.display(),
                backup = %backup.display(),
                error = %e,
                "unreadable data file, starting empty"
            );
            if let Err(copy_err) = std::fs::copy(path, &backup) {
                tracing::warn!(error = %copy_err, "could not back up unreadable data file");
            }
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Grade, Status};
    use chrono::NaiveDate;
    use egui::Color32;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn records() -> Vec<Assignment> {
        let mut a = Assignment::new("CS101", "Lab 1", Grade::HighDistinction, date(2024, 2, 5), date(2024, 2, 19));
        a.notes = "bring \"quotes\" and\nnewlines".into();
        a.reminder_date = Some(date(2024, 2, 12));
        a.status = Status::InProgress;
        a.unit_code_color = Color32::from_rgba_premultiplied(10, 20, 30, 128);
        a.grade_color = Color32::from_rgb(250, 128, 114);

        let b = Assignment::new("MATH200", "Problem Set 10", Grade::Pass, date(2024, 3, 1), date(2024, 3, 2));
        vec![a, b]
    }

    #[test]
    fn save_then_load_is_field_for_field_equal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assignments.json");
        let original = records();

        save_assignments(&original, &path).unwrap();
        let loaded = load_assignments(&path).unwrap();

        assert_eq!(loaded, original);
        assert_eq!(loaded[0].unit_code_color.to_array(), [10, 20, 30, 128]);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn missing_file_means_no_records() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_or_empty(&dir.path().join("absent.json")).is_empty());
    }

    #[test]
    fn malformed_file_means_no_records_and_is_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assignments.json");
        std::fs::write(&path, "[{ \"unitCode\": ").unwrap();

        assert!(load_or_empty(&path).is_empty());
        let backup = std::fs::read_to_string(path.with_extension("json.bak")).unwrap();
        assert_eq!(backup, "[{ \"unitCode\": ");
    }

    #[test]
    fn loads_pascal_case_files_with_datetime_stamps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assignments.json");
        std::fs::write(
            &path,
            r#"[{
                "UnitCode": "BIO150",
                "TaskName": "Field report",
                "TaskGrade": "Distinction",
                "StartDate": "2024-07-01T00:00:00",
                "DueDate": "2024-07-21T00:00:00",
                "Notes": "",
                "ReminderDate": "2024-07-14T00:00:00",
                "UnitCodeColor": 4289583334,
                "TaskGradeColor": 4290401747
            }]"#,
        )
        .unwrap();

        let loaded = load_or_empty(&path);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].reminder_date, Some(date(2024, 7, 14)));
        // 0xFFADD8E6 is opaque LightBlue.
        assert_eq!(loaded[0].unit_code_color, Color32::from_rgb(173, 216, 230));
        assert_eq!(loaded[0].grade, Grade::Distinction);
    }
}
