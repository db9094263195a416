use std::cmp::Ordering;

use chrono::NaiveDateTime;

use super::assignment::Assignment;

/// Sortable list columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    UnitCode,
    TaskName,
    Grade,
    StartDate,
    DueDate,
    DaysUntilStart,
    DaysUntilDue,
    Status,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::UnitCode,
        SortField::TaskName,
        SortField::Grade,
        SortField::StartDate,
        SortField::DueDate,
        SortField::DaysUntilStart,
        SortField::DaysUntilDue,
        SortField::Status,
    ];

    pub fn header(self) -> &'static str {
        match self {
            SortField::UnitCode => "Unit Code",
            SortField::TaskName => "Task Name",
            SortField::Grade => "Task Grade",
            SortField::StartDate => "Start Date",
            SortField::DueDate => "Due Date",
            SortField::DaysUntilStart => "Days Until Start",
            SortField::DaysUntilDue => "Days Until Due",
            SortField::Status => "Status",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    /// Header-click semantics: the same field flips direction, a new field
    /// starts ascending.
    pub fn toggled(current: Option<SortSpec>, field: SortField) -> SortSpec {
        match current {
            Some(spec) if spec.field == field => SortSpec::new(field, spec.direction.flipped()),
            _ => SortSpec::new(field, SortDirection::Ascending),
        }
    }

    /// Total order for two records under this spec. `now` anchors the
    /// days-until columns.
    pub fn compare(&self, a: &Assignment, b: &Assignment, now: NaiveDateTime) -> Ordering {
        let primary = self.direction.apply(compare_field(self.field, a, b, now));
        match self.field {
            // Ties on unit code always fall back to earliest due date first.
            SortField::UnitCode => primary.then_with(|| a.due_date.cmp(&b.due_date)),
            _ => primary,
        }
    }

    /// Stable in-place sort of a view.
    pub fn sort(&self, items: &mut [&Assignment], now: NaiveDateTime) {
        items.sort_by(|a, b| self.compare(a, b, now));
    }
}

/// Ascending comparator for a single field.
fn compare_field(field: SortField, a: &Assignment, b: &Assignment, now: NaiveDateTime) -> Ordering {
    match field {
        SortField::UnitCode => a.unit_code.cmp(&b.unit_code),
        SortField::TaskName => natural_cmp(&a.task_name, &b.task_name),
        SortField::Grade => a.grade.rank().cmp(&b.grade.rank()),
        SortField::StartDate => a.start_date.cmp(&b.start_date),
        SortField::DueDate => a.due_date.cmp(&b.due_date),
        SortField::DaysUntilStart => a.days_until_start(now).cmp(&b.days_until_start(now)),
        SortField::DaysUntilDue => a.days_until_due(now).cmp(&b.days_until_due(now)),
        SortField::Status => a.status.cmp(&b.status),
    }
}

/// String comparison that treats embedded ASCII digit runs as integers,
/// so "Task 2" sorts before "Task 10".
///
/// Digit runs are compared by value without parsing, so arbitrarily long
/// runs cannot overflow. When every compared position is equal the shorter
/// string sorts first.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let xs: Vec<char> = a.chars().collect();
    let ys: Vec<char> = b.chars().collect();
    let (mut i, mut j) = (0, 0);

    while i < xs.len() && j < ys.len() {
        if xs[i].is_ascii_digit() && ys[j].is_ascii_digit() {
            let (x_start, y_start) = (i, j);
            while i < xs.len() && xs[i].is_ascii_digit() {
                i += 1;
            }
            while j < ys.len() && ys[j].is_ascii_digit() {
                j += 1;
            }
            let ord = cmp_digit_runs(&xs[x_start..i], &ys[y_start..j]);
            if ord != Ordering::Equal {
                return ord;
            }
        } else {
            let ord = xs[i].cmp(&ys[j]);
            if ord != Ordering::Equal {
                return ord;
            }
            i += 1;
            j += 1;
        }
    }

    xs.len().cmp(&ys.len())
}

fn cmp_digit_runs(x: &[char], y: &[char]) -> Ordering {
    let trim = |run: &[char]| -> usize { run.iter().take_while(|c| **c == '0').count() };
    let x = &x[trim(x)..];
    let y = &y[trim(y)..];
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::assignment::{Grade, Status};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> NaiveDateTime {
        date(2024, 1, 1).and_hms_opt(9, 0, 0).unwrap()
    }

    fn named(name: &str) -> Assignment {
        Assignment::new("CS101", name, Grade::Pass, date(2024, 1, 1), date(2024, 1, 2))
    }

    fn sorted<'a>(items: &'a [Assignment], spec: SortSpec) -> Vec<&'a Assignment> {
        let mut view: Vec<&Assignment> = items.iter().collect();
        spec.sort(&mut view, now());
        view
    }

    #[test]
    fn natural_sort_compares_digit_runs_numerically() {
        let items = vec![named("Task 2"), named("Task 10"), named("Task 1")];
        let view = sorted(&items, SortSpec::new(SortField::TaskName, SortDirection::Ascending));
        let names: Vec<&str> = view.iter().map(|a| a.task_name.as_str()).collect();
        assert_eq!(names, vec!["Task 1", "Task 2", "Task 10"]);

        let view = sorted(&items, SortSpec::new(SortField::TaskName, SortDirection::Descending));
        let names: Vec<&str> = view.iter().map(|a| a.task_name.as_str()).collect();
        assert_eq!(names, vec!["Task 10", "Task 2", "Task 1"]);
    }

    #[test]
    fn natural_cmp_edge_cases() {
        assert_eq!(natural_cmp("Lab", "Lab 1"), Ordering::Less);
        assert_eq!(natural_cmp("a2b", "a10a"), Ordering::Less);
        assert_eq!(natural_cmp("abc", "abc"), Ordering::Equal);
        assert_eq!(natural_cmp("B", "a"), Ordering::Less);
        assert_eq!(natural_cmp("x99999999999999999999", "x100000000000000000000"), Ordering::Less);
        assert_eq!(natural_cmp("a1", "a01"), Ordering::Less);
    }

    #[test]
    fn grade_sort_uses_rank_not_label() {
        let grades = [Grade::Distinction, Grade::Pass, Grade::Credit, Grade::HighDistinction];
        let items: Vec<Assignment> = grades
            .iter()
            .map(|g| Assignment::new("CS101", "x", *g, date(2024, 1, 1), date(2024, 1, 2)))
            .collect();
        let view = sorted(&items, SortSpec::new(SortField::Grade, SortDirection::Ascending));
        let got: Vec<Grade> = view.iter().map(|a| a.grade).collect();
        assert_eq!(got, vec![Grade::Pass, Grade::Credit, Grade::Distinction, Grade::HighDistinction]);
    }

    #[test]
    fn unit_code_ties_break_on_ascending_due_date_in_both_directions() {
        let items = vec![
            Assignment::new("CS101", "late", Grade::Pass, date(2024, 3, 1), date(2024, 5, 1)),
            Assignment::new("CS101", "early", Grade::Pass, date(2024, 3, 1), date(2024, 4, 1)),
            Assignment::new("AAA100", "other", Grade::Pass, date(2024, 3, 1), date(2024, 6, 1)),
        ];

        let asc = sorted(&items, SortSpec::new(SortField::UnitCode, SortDirection::Ascending));
        let names: Vec<&str> = asc.iter().map(|a| a.task_name.as_str()).collect();
        assert_eq!(names, vec!["other", "early", "late"]);

        let desc = sorted(&items, SortSpec::new(SortField::UnitCode, SortDirection::Descending));
        let names: Vec<&str> = desc.iter().map(|a| a.task_name.as_str()).collect();
        assert_eq!(names, vec!["early", "late", "other"]);
    }

    #[test]
    fn status_sorts_by_declaration_order() {
        let mut items = Vec::new();
        for status in [Status::Completed, Status::NotStarted, Status::InProgress] {
            let mut a = named("x");
            a.status = status;
            items.push(a);
        }
        let view = sorted(&items, SortSpec::new(SortField::Status, SortDirection::Ascending));
        let got: Vec<Status> = view.iter().map(|a| a.status).collect();
        assert_eq!(got, vec![Status::NotStarted, Status::InProgress, Status::Completed]);
    }

    #[test]
    fn date_and_days_until_fields_sort_numerically() {
        let items = vec![
            Assignment::new("A", "b", Grade::Pass, date(2024, 2, 1), date(2024, 2, 10)),
            Assignment::new("A", "a", Grade::Pass, date(2024, 1, 5), date(2024, 3, 10)),
        ];
        let view = sorted(&items, SortSpec::new(SortField::DaysUntilStart, SortDirection::Ascending));
        assert_eq!(view[0].task_name, "a");
        let view = sorted(&items, SortSpec::new(SortField::DueDate, SortDirection::Descending));
        assert_eq!(view[0].task_name, "a");
        let view = sorted(&items, SortSpec::new(SortField::DaysUntilDue, SortDirection::Ascending));
        assert_eq!(view[0].task_name, "b");
    }

    #[test]
    fn toggling_flips_same_field_and_resets_new_field() {
        let first = SortSpec::toggled(None, SortField::Grade);
        assert_eq!(first.direction, SortDirection::Ascending);
        let second = SortSpec::toggled(Some(first), SortField::Grade);
        assert_eq!(second.direction, SortDirection::Descending);
        let third = SortSpec::toggled(Some(second), SortField::Grade);
        assert_eq!(third.direction, SortDirection::Ascending);
        let other = SortSpec::toggled(Some(second), SortField::DueDate);
        assert_eq!(other, SortSpec::new(SortField::DueDate, SortDirection::Ascending));
    }
}
