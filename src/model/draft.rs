use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use super::assignment::{Assignment, Grade};
use crate::error::{Result, TrackerError};

/// Editable form state behind the add/edit dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentDraft {
    /// Record being edited; `None` when adding.
    pub editing: Option<Uuid>,
    pub unit_code: String,
    pub task_name: String,
    pub grade: Grade,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub notes: String,
    pub reminder_enabled: bool,
    pub reminder_date: NaiveDate,
    /// Last validation failure, shown inline.
    pub error: Option<String>,
}

impl AssignmentDraft {
    /// Blank form starting today and due a week later.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            editing: None,
            unit_code: String::new(),
            task_name: String::new(),
            grade: Grade::Pass,
            start_date: today,
            due_date: today + Duration::days(7),
            notes: String::new(),
            reminder_enabled: false,
            reminder_date: today,
            error: None,
        }
    }

    pub fn from_assignment(record: &Assignment) -> Self {
        Self {
            editing: Some(record.id),
            unit_code: record.unit_code.clone(),
            task_name: record.task_name.clone(),
            grade: record.grade,
            start_date: record.start_date,
            due_date: record.due_date,
            notes: record.notes.clone(),
            reminder_enabled: record.reminder_date.is_some(),
            reminder_date: record.reminder_date.unwrap_or(record.start_date),
            error: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.unit_code.trim().is_empty() {
            return Err(TrackerError::MissingField("Unit code"));
        }
        if self.task_name.trim().is_empty() {
            return Err(TrackerError::MissingField("Task name"));
        }
        Ok(())
    }

    /// Copy the form values onto `record`, leaving id, status and colors alone.
    pub fn apply_to(&self, record: &mut Assignment) {
        record.unit_code = self.unit_code.trim().to_string();
        record.task_name = self.task_name.trim().to_string();
        record.grade = self.grade;
        record.start_date = self.start_date;
        record.due_date = self.due_date;
        record.notes = self.notes.clone();
        record.reminder_date = self.reminder_enabled.then_some(self.reminder_date);
    }

    /// Validate and build a new record.
    pub fn build(&self) -> Result<Assignment> {
        self.validate()?;
        let mut record = Assignment::new(
            self.unit_code.trim(),
            self.task_name.trim(),
            self.grade,
            self.start_date,
            self.due_date,
        );
        self.apply_to(&mut record);
        Ok(record)
    }
}
