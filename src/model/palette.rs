use std::collections::HashMap;

use egui::Color32;

use super::assignment::{Assignment, Grade};

/// Color given to records whose unit code or grade has no assigned color.
pub const FALLBACK_COLOR: Color32 = Color32::from_rgb(211, 211, 211); // LightGray
/// Color given to a unit code the first time it is seen.
pub const DEFAULT_UNIT_COLOR: Color32 = Color32::from_rgb(173, 216, 230); // LightBlue

pub fn fallback_color() -> Color32 {
    FALLBACK_COLOR
}

pub fn default_grade_color(grade: Grade) -> Color32 {
    match grade {
        Grade::Pass => Color32::from_rgb(32, 178, 170),           // LightSeaGreen
        Grade::Credit => Color32::from_rgb(30, 144, 255),         // DodgerBlue
        Grade::Distinction => Color32::from_rgb(186, 85, 211),    // MediumOrchid
        Grade::HighDistinction => Color32::from_rgb(250, 128, 114), // Salmon
    }
}

/// Unit-code and grade colors shared by the list and the dashboard.
#[derive(Debug, Clone)]
pub struct ColorAssignments {
    /// Insertion-ordered so the legend lists unit codes as they were first seen.
    unit_colors: Vec<(String, Color32)>,
    grade_colors: HashMap<Grade, Color32>,
}

impl Default for ColorAssignments {
    fn default() -> Self {
        Self {
            unit_colors: Vec::new(),
            grade_colors: Grade::ALL
                .iter()
                .map(|g| (*g, default_grade_color(*g)))
                .collect(),
        }
    }
}

impl ColorAssignments {
    /// Seed unit colors from loaded records: the first color seen per unit code wins.
    pub fn from_records(records: &[Assignment]) -> Self {
        let mut colors = Self::default();
        for record in records {
            if colors.unit_color(&record.unit_code).is_none() {
                colors
                    .unit_colors
                    .push((record.unit_code.clone(), record.unit_code_color));
            }
        }
        colors
    }

    pub fn unit_color(&self, unit_code: &str) -> Option<Color32> {
        self.unit_colors
            .iter()
            .find(|(code, _)| code == unit_code)
            .map(|(_, c)| *c)
    }

    /// Color for drawing a unit code, falling back to light gray when unassigned.
    pub fn unit_color_or_fallback(&self, unit_code: &str) -> Color32 {
        self.unit_color(unit_code).unwrap_or(FALLBACK_COLOR)
    }

    pub fn grade_color(&self, grade: Grade) -> Color32 {
        self.grade_colors
            .get(&grade)
            .copied()
            .unwrap_or(FALLBACK_COLOR)
    }

    /// Give `unit_code` the default color unless it already has one.
    /// Returns true when a new entry was created.
    pub fn ensure_unit(&mut self, unit_code: &str) -> bool {
        if self.unit_color(unit_code).is_some() {
            return false;
        }
        self.unit_colors
            .push((unit_code.to_string(), DEFAULT_UNIT_COLOR));
        true
    }

    pub fn set_unit_color(&mut self, unit_code: &str, color: Color32) {
        match self.unit_colors.iter_mut().find(|(code, _)| code == unit_code) {
            Some(entry) => entry.1 = color,
            None => self.unit_colors.push((unit_code.to_string(), color)),
        }
    }

    pub fn set_grade_color(&mut self, grade: Grade, color: Color32) {
        self.grade_colors.insert(grade, color);
    }

    pub fn legend(&self) -> &[(String, Color32)] {
        &self.unit_colors
    }

    /// Push the mapped colors onto each record's display attributes.
    pub fn apply(&self, records: &mut [Assignment]) {
        for record in records {
            if let Some(color) = self.unit_color(&record.unit_code) {
                record.unit_code_color = color;
            }
            record.grade_color = self.grade_color(record.grade);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(unit: &str, color: Color32) -> Assignment {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut a = Assignment::new(unit, "Task", Grade::Distinction, d, d);
        a.unit_code_color = color;
        a
    }

    #[test]
    fn first_loaded_color_wins_per_unit() {
        let red = Color32::from_rgb(255, 0, 0);
        let green = Color32::from_rgb(0, 255, 0);
        let colors = ColorAssignments::from_records(&[
            record("CS101", red),
            record("CS101", green),
            record("MATH200", green),
        ]);
        assert_eq!(colors.unit_color("CS101"), Some(red));
        assert_eq!(colors.unit_color("MATH200"), Some(green));
        assert_eq!(colors.legend().len(), 2);
    }

    #[test]
    fn new_units_get_default_color_once() {
        let mut colors = ColorAssignments::default();
        assert!(colors.ensure_unit("PHYS101"));
        assert!(!colors.ensure_unit("PHYS101"));
        assert_eq!(colors.unit_color("PHYS101"), Some(DEFAULT_UNIT_COLOR));
        assert_eq!(colors.unit_color_or_fallback("CHEM100"), FALLBACK_COLOR);
    }

    #[test]
    fn apply_pushes_unit_and_grade_colors() {
        let mut colors = ColorAssignments::default();
        let blue = Color32::from_rgb(0, 0, 255);
        colors.set_unit_color("CS101", blue);
        colors.set_grade_color(Grade::Distinction, Color32::BLACK);

        let mut records = vec![record("CS101", FALLBACK_COLOR), record("OTHER", FALLBACK_COLOR)];
        colors.apply(&mut records);
        assert_eq!(records[0].unit_code_color, blue);
        assert_eq!(records[0].grade_color, Color32::BLACK);
        assert_eq!(records[1].unit_code_color, FALLBACK_COLOR);
    }
}
