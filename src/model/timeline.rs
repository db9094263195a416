use chrono::{Datelike, Duration, NaiveDate};
use uuid::Uuid;

use super::assignment::{Assignment, Grade};

/// Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The 7-day window the dashboard highlights. Always starts on a Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusedWeek {
    start: NaiveDate,
}

impl FocusedWeek {
    /// The week containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: monday_of(date),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end: the following Monday.
    pub fn end(&self) -> NaiveDate {
        self.start + Duration::days(7)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end()
    }

    pub fn previous(&mut self) {
        self.start -= Duration::days(7);
    }

    pub fn next(&mut self) {
        self.start += Duration::days(7);
    }

    /// Week choices offered by the selector: every Monday from three months
    /// before to three months after the week containing `today`.
    pub fn options_around(today: NaiveDate) -> Vec<NaiveDate> {
        let current = monday_of(today);
        let earliest = current
            .checked_sub_months(chrono::Months::new(3))
            .unwrap_or(current);
        let latest = current
            .checked_add_months(chrono::Months::new(3))
            .unwrap_or(current);
        // Step from the current Monday so every option stays week-aligned.
        let mut week = current;
        while week - Duration::days(7) >= earliest {
            week -= Duration::days(7);
        }
        let mut weeks = Vec::new();
        while week <= latest {
            weeks.push(week);
            week += Duration::days(7);
        }
        weeks
    }

    /// `dd/mm/YYYY - dd/mm/YYYY` label for the week header.
    pub fn range_label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%d/%m/%Y"),
            self.end().format("%d/%m/%Y")
        )
    }
}

/// Geometry parameters for a timeline layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimelineMetrics {
    /// Width available to the chart; the chart never renders narrower.
    pub viewport_width: f32,
    /// Minimum width of one day.
    pub min_day_width: f32,
    pub row_height: f32,
    pub row_spacing: f32,
}

/// One task bar.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineBar {
    pub id: Uuid,
    pub unit_code: String,
    pub task_name: String,
    pub start: NaiveDate,
    pub due: NaiveDate,
    pub x: f32,
    pub width: f32,
    pub row: usize,
    pub y: f32,
}

/// A weekly separator with its date label.
#[derive(Debug, Clone, PartialEq)]
pub struct Gridline {
    pub date: NaiveDate,
    pub x: f32,
    pub label: String,
}

/// Highlighted focused-week band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekBand {
    pub start: NaiveDate,
    pub x: f32,
    pub width: f32,
}

/// Computed week-scaled timeline: bars, weekly gridlines and the focus band.
///
/// Horizontal positions are offsets from `min_date`. An empty layout has no
/// bars, no gridlines and no band.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineLayout {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub total_days: i64,
    pub day_width: f32,
    pub width: f32,
    pub height: f32,
    pub bars: Vec<TimelineBar>,
    pub gridlines: Vec<Gridline>,
    pub focus_band: Option<WeekBand>,
}

impl TimelineLayout {
    /// Lay out `records` against `week`.
    ///
    /// `day_width = max(viewport_width, total_days * min_day_width) / total_days`
    /// where `total_days` spans the earliest start to the latest due date
    /// inclusive. Rows are stacked in ascending start-date order.
    pub fn compute<'a, I>(records: I, week: FocusedWeek, metrics: TimelineMetrics) -> Self
    where
        I: IntoIterator<Item = &'a Assignment>,
    {
        let mut sorted: Vec<&Assignment> = records.into_iter().collect();
        if sorted.is_empty() {
            return Self::default();
        }
        sorted.sort_by_key(|a| a.start_date);

        let min_date = sorted.iter().map(|a| a.start_date).min().unwrap_or(week.start());
        let max_date = sorted.iter().map(|a| a.due_date).max().unwrap_or(min_date);
        // Guard against every record being inverted (due before start).
        let total_days = ((max_date - min_date).num_days() + 1).max(1);
        let width = metrics
            .viewport_width
            .max(total_days as f32 * metrics.min_day_width);
        let day_width = width / total_days as f32;
        let row_pitch = metrics.row_height + metrics.row_spacing;

        let offset = |date: NaiveDate| (date - min_date).num_days() as f32 * day_width;

        let bars = sorted
            .iter()
            .enumerate()
            .map(|(row, a)| TimelineBar {
                id: a.id,
                unit_code: a.unit_code.clone(),
                task_name: a.task_name.clone(),
                start: a.start_date,
                due: a.due_date,
                x: offset(a.start_date),
                width: (a.due_date - a.start_date).num_days() as f32 * day_width,
                row,
                y: row as f32 * row_pitch,
            })
            .collect();

        let mut gridlines = Vec::new();
        let mut monday = monday_of(min_date);
        while monday <= max_date {
            gridlines.push(Gridline {
                date: monday,
                x: offset(monday),
                label: monday.format("%d/%m/%Y").to_string(),
            });
            monday += Duration::days(7);
        }

        let focus_band = Some(WeekBand {
            start: week.start(),
            x: offset(week.start()),
            width: 7.0 * day_width,
        });

        Self {
            min_date: Some(min_date),
            max_date: Some(max_date),
            total_days,
            day_width,
            width,
            height: sorted.len() as f32 * row_pitch,
            bars,
            gridlines,
            focus_band,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Convert a date to an x offset from the layout origin.
    pub fn date_to_x(&self, date: NaiveDate) -> Option<f32> {
        self.min_date
            .map(|min| (date - min).num_days() as f32 * self.day_width)
    }

    /// Convert an x offset back to the date it falls on.
    pub fn x_to_date(&self, x: f32) -> Option<NaiveDate> {
        let min = self.min_date?;
        if self.day_width <= 0.0 {
            return None;
        }
        let days = (x / self.day_width).floor() as i64;
        Some(min + Duration::days(days))
    }
}

/// Count of records due inside `week`, grouped by grade in rank order.
/// Grades with no records are omitted.
pub fn grade_counts_for_week<'a, I>(records: I, week: FocusedWeek) -> Vec<(Grade, usize)>
where
    I: IntoIterator<Item = &'a Assignment>,
{
    let mut counts = [0usize; 4];
    for record in records.into_iter().filter(|a| week.contains(a.due_date)) {
        counts[usize::from(record.grade.rank() - 1)] += 1;
    }
    Grade::ALL
        .iter()
        .zip(counts)
        .filter(|(_, n)| *n > 0)
        .map(|(g, n)| (*g, n))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn metrics(viewport_width: f32) -> TimelineMetrics {
        TimelineMetrics {
            viewport_width,
            min_day_width: 10.0,
            row_height: 10.0,
            row_spacing: 5.0,
        }
    }

    fn task(name: &str, start: NaiveDate, due: NaiveDate) -> Assignment {
        Assignment::new("CS101", name, Grade::Pass, start, due)
    }

    #[test]
    fn day_width_uses_viewport_floor() {
        let records = vec![
            task("a", date(2024, 1, 1), date(2024, 1, 3)),
            task("b", date(2024, 1, 4), date(2024, 1, 8)),
        ];
        let week = FocusedWeek::containing(date(2024, 1, 1));
        let layout = TimelineLayout::compute(&records, week, metrics(160.0));

        assert_eq!(layout.total_days, 8);
        assert_eq!(layout.day_width, 20.0);
        assert_eq!(layout.bars[0].x, 0.0);
        assert_eq!(layout.bars[0].width, 40.0);
        assert_eq!(layout.bars[1].x, 60.0);
        assert_eq!(layout.bars[1].width, 80.0);
    }

    #[test]
    fn day_width_uses_minimum_unit_when_range_is_long() {
        let records = vec![task("a", date(2024, 1, 1), date(2024, 3, 30))];
        let week = FocusedWeek::containing(date(2024, 1, 1));
        let layout = TimelineLayout::compute(&records, week, metrics(100.0));
        assert_eq!(layout.total_days, 90);
        assert_eq!(layout.width, 900.0);
        assert_eq!(layout.day_width, 10.0);
    }

    #[test]
    fn single_day_range_resolves_through_viewport() {
        let d = date(2024, 5, 8);
        let records = vec![task("a", d, d), task("b", d, d)];
        let layout = TimelineLayout::compute(&records, FocusedWeek::containing(d), metrics(300.0));
        assert_eq!(layout.total_days, 1);
        assert_eq!(layout.day_width, 300.0);
        assert_eq!(layout.bars[1].width, 0.0);
    }

    #[test]
    fn empty_input_yields_empty_layout() {
        let layout = TimelineLayout::compute(
            std::iter::empty::<&Assignment>(),
            FocusedWeek::containing(date(2024, 1, 1)),
            metrics(500.0),
        );
        assert!(layout.is_empty());
        assert!(layout.gridlines.is_empty());
        assert!(layout.focus_band.is_none());
        assert_eq!(layout, TimelineLayout::default());
    }

    #[test]
    fn rows_stack_in_start_date_order() {
        let records = vec![
            task("late", date(2024, 1, 10), date(2024, 1, 12)),
            task("early", date(2024, 1, 2), date(2024, 1, 20)),
            task("mid", date(2024, 1, 5), date(2024, 1, 6)),
        ];
        let layout = TimelineLayout::compute(&records, FocusedWeek::containing(date(2024, 1, 2)), metrics(0.0));
        let names: Vec<&str> = layout.bars.iter().map(|b| b.task_name.as_str()).collect();
        assert_eq!(names, vec!["early", "mid", "late"]);
        assert_eq!(layout.bars[2].y, 30.0);
        assert_eq!(layout.height, 45.0);
    }

    #[test]
    fn gridlines_start_at_monday_of_min_date() {
        // 2024-01-03 is a Wednesday.
        let records = vec![task("a", date(2024, 1, 3), date(2024, 1, 22))];
        let layout = TimelineLayout::compute(&records, FocusedWeek::containing(date(2024, 1, 10)), metrics(0.0));
        let dates: Vec<NaiveDate> = layout.gridlines.iter().map(|g| g.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 8), date(2024, 1, 15), date(2024, 1, 22)]);
        assert_eq!(layout.gridlines[0].x, -20.0);
        assert_eq!(layout.gridlines[1].x - layout.gridlines[0].x, 70.0);
        assert_eq!(layout.gridlines[1].label, "08/01/2024");

        let band = layout.focus_band.unwrap();
        assert_eq!(band.start, date(2024, 1, 8));
        assert_eq!(band.x, 50.0);
        assert_eq!(band.width, 70.0);
    }

    #[test]
    fn x_and_date_convert_both_ways() {
        let records = vec![task("a", date(2024, 1, 1), date(2024, 1, 8))];
        let layout = TimelineLayout::compute(&records, FocusedWeek::containing(date(2024, 1, 1)), metrics(160.0));
        assert_eq!(layout.date_to_x(date(2024, 1, 4)), Some(60.0));
        assert_eq!(layout.x_to_date(65.0), Some(date(2024, 1, 4)));
        assert_eq!(TimelineLayout::default().x_to_date(10.0), None);
    }

    #[test]
    fn focused_week_normalizes_and_steps() {
        // Sunday 2024-01-14 belongs to the week of Monday 2024-01-08.
        let mut week = FocusedWeek::containing(date(2024, 1, 14));
        assert_eq!(week.start(), date(2024, 1, 8));
        assert!(week.contains(date(2024, 1, 14)));
        assert!(!week.contains(date(2024, 1, 15)));
        week.next();
        assert_eq!(week.start(), date(2024, 1, 15));
        week.previous();
        week.previous();
        assert_eq!(week.start(), date(2024, 1, 1));
        assert_eq!(week.range_label(), "01/01/2024 - 08/01/2024");
    }

    #[test]
    fn week_options_span_three_months_each_side() {
        let options = FocusedWeek::options_around(date(2024, 6, 12));
        assert!(options.iter().all(|d| d.weekday() == chrono::Weekday::Mon));
        assert!(options.contains(&date(2024, 6, 10)));
        assert_eq!(options.first(), Some(&date(2024, 3, 11)));
        assert_eq!(options.last(), Some(&date(2024, 9, 9)));
    }

    #[test]
    fn grade_counts_cover_only_the_focused_week() {
        let week = FocusedWeek::containing(date(2024, 4, 3));
        let mut records = vec![
            task("a", date(2024, 3, 1), date(2024, 4, 1)),
            task("b", date(2024, 3, 1), date(2024, 4, 7)),
            task("c", date(2024, 3, 1), date(2024, 4, 8)),
        ];
        records[1].grade = Grade::HighDistinction;
        let counts = grade_counts_for_week(&records, week);
        assert_eq!(counts, vec![(Grade::Pass, 1), (Grade::HighDistinction, 1)]);
    }
}
