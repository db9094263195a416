use super::assignment::{Assignment, Status};

/// Active list/dashboard filter. All set conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring matched against task name and unit code.
    pub search: String,
    pub status: Option<Status>,
    /// Exact unit code; `None` or empty means any.
    pub unit_code: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.trim().is_empty()
            && self.status.is_none()
            && self.unit_code.as_deref().map_or(true, str::is_empty)
    }

    pub fn matches_search(&self, record: &Assignment) -> bool {
        if self.search.trim().is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        record.task_name.to_lowercase().contains(&needle)
            || record.unit_code.to_lowercase().contains(&needle)
    }

    pub fn matches_status(&self, record: &Assignment) -> bool {
        self.status.map_or(true, |s| record.status == s)
    }

    pub fn matches_unit(&self, record: &Assignment) -> bool {
        match self.unit_code.as_deref() {
            None | Some("") => true,
            Some(code) => record.unit_code == code,
        }
    }

    pub fn matches(&self, record: &Assignment) -> bool {
        self.matches_search(record) && self.matches_status(record) && self.matches_unit(record)
    }
}
