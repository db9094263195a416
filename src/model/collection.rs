use chrono::NaiveDateTime;
use uuid::Uuid;

use super::assignment::{Assignment, Status};
use super::filter::FilterCriteria;
use super::palette::ColorAssignments;
use super::sort::SortSpec;
use crate::error::{Result, TrackerError};

/// Ordered set of assignments plus the filtered view derived from it.
///
/// The view is recomputed on every write (record mutation or criteria
/// change), so reads never observe a stale projection. Records are only
/// mutable through methods on this type for that reason.
#[derive(Debug, Clone, Default)]
pub struct AssignmentList {
    records: Vec<Assignment>,
    criteria: FilterCriteria,
    /// Indices into `records` that pass `criteria`, in collection order.
    view: Vec<usize>,
    /// Bumped on every record mutation; drives autosave.
    revision: u64,
}

impl AssignmentList {
    pub fn new(records: Vec<Assignment>) -> Self {
        let mut list = Self {
            records,
            ..Default::default()
        };
        list.refresh_view();
        list
    }

    pub fn records(&self) -> &[Assignment] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn get(&self, id: Uuid) -> Option<&Assignment> {
        self.records.iter().find(|a| a.id == id)
    }

    fn position(&self, id: Uuid) -> Option<usize> {
        self.records.iter().position(|a| a.id == id)
    }

    // --- Mutations ---

    pub fn add(&mut self, record: Assignment) -> Uuid {
        let id = record.id;
        self.records.push(record);
        self.touch();
        id
    }

    pub fn remove(&mut self, id: Uuid) -> Result<Assignment> {
        let idx = self.position(id).ok_or(TrackerError::NotFound(id))?;
        let removed = self.records.remove(idx);
        self.touch();
        Ok(removed)
    }

    pub fn update_status(&mut self, id: Uuid, status: Status) -> Result<()> {
        self.update(id, |a| a.status = status)
    }

    /// Apply an in-place edit to one record.
    pub fn update<F>(&mut self, id: Uuid, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Assignment),
    {
        let idx = self.position(id).ok_or(TrackerError::NotFound(id))?;
        edit(&mut self.records[idx]);
        // An edit must not change identity.
        self.records[idx].id = id;
        self.touch();
        Ok(())
    }

    /// Insert a deep copy directly after the original. Returns the copy's id.
    pub fn duplicate(&mut self, id: Uuid) -> Result<Uuid> {
        let idx = self.position(id).ok_or(TrackerError::NotFound(id))?;
        let copy = self.records[idx].duplicate();
        let copy_id = copy.id;
        self.records.insert(idx + 1, copy);
        self.touch();
        Ok(copy_id)
    }

    /// Clear the one-shot manual reminder of each listed record. Ids that no
    /// longer exist are ignored.
    pub fn consume_reminders(&mut self, ids: &[Uuid]) {
        let mut changed = false;
        for record in self.records.iter_mut().filter(|a| ids.contains(&a.id)) {
            changed |= record.reminder_date.take().is_some();
        }
        if changed {
            self.touch();
        }
    }

    pub fn apply_colors(&mut self, colors: &ColorAssignments) {
        colors.apply(&mut self.records);
        self.touch();
    }

    // --- Filtering ---

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        if self.criteria != criteria {
            self.criteria = criteria;
            self.refresh_view();
        }
    }

    /// Records passing the active criteria, in collection order.
    pub fn filtered(&self) -> Vec<&Assignment> {
        self.view.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.view.len()
    }

    /// Filtered view ordered by `spec`; collection order when `spec` is `None`.
    pub fn sorted_view(&self, spec: Option<SortSpec>, now: NaiveDateTime) -> Vec<&Assignment> {
        let mut view = self.filtered();
        if let Some(spec) = spec {
            spec.sort(&mut view, now);
        }
        view
    }

    /// Distinct unit codes in first-seen order.
    pub fn unit_codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = Vec::new();
        for record in &self.records {
            if !codes.contains(&record.unit_code) {
                codes.push(record.unit_code.clone());
            }
        }
        codes
    }

    /// Owned copy of every record, for passes that must not observe
    /// concurrent edits.
    pub fn snapshot(&self) -> Vec<Assignment> {
        self.records.clone()
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.refresh_view();
    }

    fn refresh_view(&mut self) {
        let criteria = &self.criteria;
        self.view = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, a)| criteria.matches(a))
            .map(|(i, _)| i)
            .collect();
    }
}
