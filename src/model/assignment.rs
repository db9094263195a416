use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use egui::Color32;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use super::palette;

/// Grade a student is aiming for on a task.
///
/// Ordering and [`Grade::rank`] follow the academic scale, not the label text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum Grade {
    #[default]
    Pass,
    Credit,
    Distinction,
    HighDistinction,
}

impl Grade {
    pub const ALL: [Grade; 4] = [
        Grade::Pass,
        Grade::Credit,
        Grade::Distinction,
        Grade::HighDistinction,
    ];

    /// Fixed rank used by the grade comparator: Pass = 1 .. High Distinction = 4.
    pub fn rank(self) -> u8 {
        match self {
            Grade::Pass => 1,
            Grade::Credit => 2,
            Grade::Distinction => 3,
            Grade::HighDistinction => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Grade::Pass => "Pass",
            Grade::Credit => "Credit",
            Grade::Distinction => "Distinction",
            Grade::HighDistinction => "High Distinction",
        }
    }

    /// Parse a grade label, ignoring case and spacing ("High Distinction", "highdistinction", "HD").
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "pass" | "p" => Some(Grade::Pass),
            "credit" | "cr" => Some(Grade::Credit),
            "distinction" | "d" => Some(Grade::Distinction),
            "highdistinction" | "hd" => Some(Grade::HighDistinction),
            _ => None,
        }
    }
}

impl From<Option<String>> for Grade {
    fn from(label: Option<String>) -> Self {
        match label.as_deref().map(str::trim) {
            None | Some("") => Grade::default(),
            Some(l) => Grade::from_label(l).unwrap_or_else(|| {
                tracing::warn!(label = l, "unknown grade label, ranking as Pass");
                Grade::default()
            }),
        }
    }
}

impl From<Grade> for String {
    fn from(grade: Grade) -> Self {
        grade.label().to_string()
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Progress state of a task. Declaration order is the sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::NotStarted, Status::InProgress, Status::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Status::NotStarted => "Not Started",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single academic task.
///
/// Serialized field names match the persisted `assignments.json` schema;
/// PascalCase keys written by older versions are accepted on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    #[serde(default = "Uuid::new_v4", alias = "Id")]
    pub id: Uuid,
    #[serde(alias = "UnitCode")]
    pub unit_code: String,
    #[serde(alias = "TaskName")]
    pub task_name: String,
    #[serde(rename = "taskGrade", alias = "TaskGrade", default)]
    pub grade: Grade,
    #[serde(with = "iso_date", alias = "StartDate")]
    pub start_date: NaiveDate,
    #[serde(with = "iso_date", alias = "DueDate")]
    pub due_date: NaiveDate,
    #[serde(default, alias = "Notes", deserialize_with = "null_as_empty")]
    pub notes: String,
    /// One-shot manual reminder; cleared once it fires.
    #[serde(default, alias = "ReminderDate", with = "iso_date::option")]
    pub reminder_date: Option<NaiveDate>,
    #[serde(default, alias = "Status")]
    pub status: Status,
    #[serde(with = "argb", alias = "UnitCodeColor", default = "palette::fallback_color")]
    pub unit_code_color: Color32,
    #[serde(
        rename = "taskGradeColor",
        alias = "TaskGradeColor",
        with = "argb",
        default = "palette::fallback_color"
    )]
    pub grade_color: Color32,
}

impl Assignment {
    pub fn new(
        unit_code: impl Into<String>,
        task_name: impl Into<String>,
        grade: Grade,
        start_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            unit_code: unit_code.into(),
            task_name: task_name.into(),
            grade,
            start_date,
            due_date,
            notes: String::new(),
            reminder_date: None,
            status: Status::NotStarted,
            unit_code_color: palette::fallback_color(),
            grade_color: palette::fallback_color(),
        }
    }

    /// Independent copy with identical field values and a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: Uuid::new_v4(),
            ..self.clone()
        }
    }

    /// Whole days from `now` until the start date (truncated toward zero).
    pub fn days_until_start(&self, now: NaiveDateTime) -> i64 {
        (self.reminder_on_start() - now).num_days()
    }

    /// Whole days from `now` until the due date (truncated toward zero).
    pub fn days_until_due(&self, now: NaiveDateTime) -> i64 {
        (midnight(self.due_date) - now).num_days()
    }

    pub fn reminder_on_start(&self) -> NaiveDateTime {
        midnight(self.start_date)
    }

    /// `None` only when the due date is too close to the calendar minimum.
    pub fn reminder_5_days_before_due(&self) -> Option<NaiveDateTime> {
        midnight(self.due_date).checked_sub_signed(Duration::days(5))
    }

    pub fn reminder_10_days_before_due(&self) -> Option<NaiveDateTime> {
        midnight(self.due_date).checked_sub_signed(Duration::days(10))
    }

    pub fn manual_reminder(&self) -> Option<NaiveDateTime> {
        self.reminder_date.map(midnight)
    }

    /// Days from start to due, or `None` when the due date precedes the start date.
    pub fn span_days(&self) -> Option<i64> {
        let days = (self.due_date - self.start_date).num_days();
        (days >= 0).then_some(days)
    }
}

pub fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Dates are written as `YYYY-MM-DD`. Full date-time strings are accepted on
/// read and truncated to their date.
pub mod iso_date {
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn parse(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, FORMAT)
            .ok()
            .or_else(|| {
                ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                    .map(|dt| dt.date())
            })
            .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
    }

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s)))
    }

    pub mod option {
        use chrono::NaiveDate;
        use serde::{self, Deserialize, Deserializer, Serializer};

        pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(d) => serializer.serialize_some(&d.format(super::FORMAT).to_string()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(s) if s.trim().is_empty() => Ok(None),
                Some(s) => super::parse(&s)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
            }
        }
    }
}

/// Serde helper for `Color32` packed as a 32-bit ARGB integer
/// (alpha in bits 24-31, then red, green, blue).
pub mod argb {
    use egui::Color32;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn pack(color: Color32) -> u32 {
        let [r, g, b, a] = color.to_array();
        (u32::from(a) << 24) | (u32::from(r) << 16) | (u32::from(g) << 8) | u32::from(b)
    }

    pub fn unpack(value: u32) -> Color32 {
        Color32::from_rgba_premultiplied(
            ((value >> 16) & 0xFF) as u8,
            ((value >> 8) & 0xFF) as u8,
            (value & 0xFF) as u8,
            ((value >> 24) & 0xFF) as u8,
        )
    }

    pub fn serialize<S>(color: &Color32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(pack(*color))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Color32, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(unpack(u32::deserialize(deserializer)?))
    }
}
