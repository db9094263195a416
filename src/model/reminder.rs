use std::collections::HashSet;
use std::time::{Duration as StdDuration, Instant};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use uuid::Uuid;

use super::assignment::{midnight, Assignment};
use crate::error::{Result, TrackerError};

/// What caused a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReminderKind {
    OnStart,
    FiveDaysBeforeDue,
    TenDaysBeforeDue,
    /// User-set reminder date; consumed once fired.
    Manual,
    /// Startup check: due within the given number of days.
    DueSoon(i64),
}

impl ReminderKind {
    pub fn message(self) -> String {
        match self {
            ReminderKind::OnStart => "Start your task!".to_string(),
            ReminderKind::FiveDaysBeforeDue => "5 days until the due date!".to_string(),
            ReminderKind::TenDaysBeforeDue => "10 days until the due date!".to_string(),
            ReminderKind::Manual => "Reminder for your task!".to_string(),
            ReminderKind::DueSoon(days) => format!("Due in less than {} days", days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub assignment_id: Uuid,
    pub kind: ReminderKind,
    pub task_name: String,
    pub due_date: NaiveDate,
    pub fired_at: NaiveDateTime,
}

impl Notification {
    fn new(record: &Assignment, kind: ReminderKind, fired_at: NaiveDateTime) -> Self {
        Self {
            assignment_id: record.id,
            kind,
            task_name: record.task_name.clone(),
            due_date: record.due_date,
            fired_at,
        }
    }

    pub fn text(&self) -> String {
        format!(
            "{}: {} is due on {}!",
            self.kind.message(),
            self.task_name,
            self.due_date.format("%d/%m/%Y")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReminderConfig {
    /// How often the periodic scan runs.
    pub interval: StdDuration,
    /// Width of the firing window that opens at each date-derived trigger.
    pub window: Duration,
    /// Suppress repeat firings of the same date-derived trigger across passes.
    pub dedupe_date_triggers: bool,
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            interval: StdDuration::from_secs(60),
            window: Duration::minutes(1),
            dedupe_date_triggers: true,
        }
    }
}

/// Output of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReminderPass {
    pub notifications: Vec<Notification>,
    /// Records whose manual reminder fired and must be cleared.
    pub consumed: Vec<Uuid>,
}

/// Periodic scanner for date-based reminders.
///
/// Passes operate on a snapshot of the records, so the caller is free to
/// mutate its collection between (or during) passes. Clearing consumed
/// manual reminders is the caller's job, using [`ReminderPass::consumed`].
#[derive(Debug)]
pub struct ReminderEvaluator {
    config: ReminderConfig,
    last_run: Option<Instant>,
    fired: HashSet<(Uuid, ReminderKind, NaiveDateTime)>,
}

impl ReminderEvaluator {
    pub fn new(config: ReminderConfig) -> Self {
        Self {
            config,
            last_run: None,
            fired: HashSet::new(),
        }
    }

    /// True when a pass is due at `now`; records the pass as started.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self
            .last_run
            .map_or(true, |last| now.duration_since(last) >= self.config.interval);
        if due {
            self.last_run = Some(now);
        }
        due
    }

    /// Time left until the next pass, for scheduling a wake-up.
    pub fn until_next(&self, now: Instant) -> StdDuration {
        match self.last_run {
            Some(last) => self.config.interval.saturating_sub(now.duration_since(last)),
            None => StdDuration::ZERO,
        }
    }

    /// Scan `snapshot` at wall-clock `now`.
    ///
    /// A record whose dates cannot be evaluated is logged and skipped; the
    /// rest of the pass continues.
    pub fn evaluate(&mut self, snapshot: &[Assignment], now: NaiveDateTime) -> ReminderPass {
        let mut pass = ReminderPass::default();
        let window = self.config.window;
        // Forget triggers whose window has long closed.
        self.fired
            .retain(|(_, _, at)| at.checked_add_signed(window).map_or(false, |end| end > now));

        for record in snapshot {
            if let Some(at) = record.manual_reminder() {
                if at <= now {
                    tracing::info!(task = %record.task_name, "manual reminder fired");
                    pass.notifications
                        .push(Notification::new(record, ReminderKind::Manual, now));
                    pass.consumed.push(record.id);
                }
            }

            let triggers = match date_triggers(record) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(id = %record.id, error = %e, "skipping reminder checks");
                    continue;
                }
            };
            for (kind, at) in triggers {
                let Some(end) = at.checked_add_signed(window) else {
                    continue;
                };
                if now < at || now >= end {
                    continue;
                }
                if self.config.dedupe_date_triggers && !self.fired.insert((record.id, kind, at)) {
                    continue;
                }
                tracing::info!(task = %record.task_name, ?kind, "reminder fired");
                pass.notifications.push(Notification::new(record, kind, now));
            }
        }
        pass
    }
}

fn date_triggers(record: &Assignment) -> Result<[(ReminderKind, NaiveDateTime); 3]> {
    let invalid = || TrackerError::InvalidDate {
        field: "due date",
        value: record.due_date.to_string(),
    };
    Ok([
        (ReminderKind::OnStart, record.reminder_on_start()),
        (
            ReminderKind::FiveDaysBeforeDue,
            record.reminder_5_days_before_due().ok_or_else(invalid)?,
        ),
        (
            ReminderKind::TenDaysBeforeDue,
            record.reminder_10_days_before_due().ok_or_else(invalid)?,
        ),
    ])
}

/// Startup check: every record due between `now` and `soon_days` from now,
/// earliest first. Records within `urgent_days` get the tighter message.
pub fn due_soon(
    records: &[Assignment],
    now: NaiveDateTime,
    urgent_days: i64,
    soon_days: i64,
) -> Vec<Notification> {
    let horizon = now + Duration::days(soon_days);
    let mut upcoming: Vec<&Assignment> = records
        .iter()
        .filter(|a| {
            let due = midnight(a.due_date);
            due >= now && due <= horizon
        })
        .collect();
    upcoming.sort_by_key(|a| a.due_date);

    upcoming
        .into_iter()
        .filter_map(|a| {
            let days = a.days_until_due(now);
            let threshold = if days <= urgent_days {
                urgent_days
            } else if days <= soon_days {
                soon_days
            } else {
                return None;
            };
            Some(Notification::new(a, ReminderKind::DueSoon(threshold), now))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::assignment::Grade;
    use crate::model::collection::AssignmentList;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, s).unwrap()
    }

    fn task(name: &str, start: NaiveDate, due: NaiveDate) -> Assignment {
        Assignment::new("CS101", name, Grade::Credit, start, due)
    }

    fn kinds(pass: &ReminderPass) -> Vec<ReminderKind> {
        pass.notifications.iter().map(|n| n.kind).collect()
    }

    #[test]
    fn manual_reminder_fires_once_and_is_consumed() {
        let now = at(2024, 4, 10, 9, 30, 0);
        let mut record = task("Essay", date(2024, 3, 1), date(2024, 6, 1));
        record.reminder_date = Some(date(2024, 4, 10));
        let mut list = AssignmentList::new(vec![record]);
        let mut evaluator = ReminderEvaluator::new(ReminderConfig::default());

        let pass = evaluator.evaluate(&list.snapshot(), now);
        assert_eq!(kinds(&pass), vec![ReminderKind::Manual]);
        list.consume_reminders(&pass.consumed);
        assert_eq!(list.records()[0].reminder_date, None);

        let again = evaluator.evaluate(&list.snapshot(), now + Duration::seconds(5));
        assert!(again.notifications.is_empty());
    }

    #[test]
    fn date_triggers_fire_inside_one_minute_window_only() {
        let record = task("Lab", date(2024, 5, 1), date(2024, 5, 20));
        let mut evaluator = ReminderEvaluator::new(ReminderConfig::default());

        let pass = evaluator.evaluate(std::slice::from_ref(&record), at(2024, 5, 1, 0, 0, 30));
        assert_eq!(kinds(&pass), vec![ReminderKind::OnStart]);
        assert!(pass.consumed.is_empty());

        let pass = evaluator.evaluate(std::slice::from_ref(&record), at(2024, 5, 1, 0, 1, 0));
        assert!(pass.notifications.is_empty());

        let pass = evaluator.evaluate(std::slice::from_ref(&record), at(2024, 5, 15, 0, 0, 10));
        assert_eq!(kinds(&pass), vec![ReminderKind::FiveDaysBeforeDue]);

        let pass = evaluator.evaluate(std::slice::from_ref(&record), at(2024, 5, 10, 0, 0, 59));
        assert_eq!(kinds(&pass), vec![ReminderKind::TenDaysBeforeDue]);
    }

    #[test]
    fn dedupe_suppresses_refire_within_same_window() {
        let record = task("Lab", date(2024, 5, 1), date(2024, 5, 20));
        let snapshot = vec![record];

        let mut deduped = ReminderEvaluator::new(ReminderConfig::default());
        assert_eq!(deduped.evaluate(&snapshot, at(2024, 5, 1, 0, 0, 5)).notifications.len(), 1);
        assert!(deduped.evaluate(&snapshot, at(2024, 5, 1, 0, 0, 50)).notifications.is_empty());

        let mut legacy = ReminderEvaluator::new(ReminderConfig {
            dedupe_date_triggers: false,
            ..ReminderConfig::default()
        });
        assert_eq!(legacy.evaluate(&snapshot, at(2024, 5, 1, 0, 0, 5)).notifications.len(), 1);
        assert_eq!(legacy.evaluate(&snapshot, at(2024, 5, 1, 0, 0, 50)).notifications.len(), 1);
    }

    #[test]
    fn unevaluable_record_does_not_stop_the_pass() {
        let broken = task("Broken", NaiveDate::MIN, NaiveDate::MIN);
        let fine = task("Fine", date(2024, 5, 1), date(2024, 5, 20));
        let mut evaluator = ReminderEvaluator::new(ReminderConfig::default());
        let pass = evaluator.evaluate(&[broken, fine], at(2024, 5, 1, 0, 0, 1));
        assert_eq!(pass.notifications.len(), 1);
        assert_eq!(pass.notifications[0].task_name, "Fine");
    }

    #[test]
    fn poll_respects_interval() {
        let mut evaluator = ReminderEvaluator::new(ReminderConfig {
            interval: StdDuration::from_secs(60),
            ..ReminderConfig::default()
        });
        let t0 = Instant::now();
        assert!(evaluator.poll(t0));
        assert!(!evaluator.poll(t0 + StdDuration::from_secs(30)));
        assert_eq!(evaluator.until_next(t0 + StdDuration::from_secs(45)), StdDuration::from_secs(15));
        assert!(evaluator.poll(t0 + StdDuration::from_secs(60)));
    }

    #[test]
    fn due_soon_picks_threshold_and_orders_by_due_date() {
        let now = at(2024, 5, 1, 12, 0, 0);
        let records = vec![
            task("far", date(2024, 4, 1), date(2024, 5, 30)),
            task("soon", date(2024, 4, 1), date(2024, 5, 9)),
            task("urgent", date(2024, 4, 1), date(2024, 5, 4)),
            task("past", date(2024, 4, 1), date(2024, 4, 30)),
        ];
        let notes = due_soon(&records, now, 5, 10);
        let got: Vec<(&str, ReminderKind)> = notes.iter().map(|n| (n.task_name.as_str(), n.kind)).collect();
        assert_eq!(
            got,
            vec![("urgent", ReminderKind::DueSoon(5)), ("soon", ReminderKind::DueSoon(10))]
        );
        assert_eq!(notes[0].text(), "Due in less than 5 days: urgent is due on 04/05/2024!");
    }
}
