//! Weighted course grade from per-category scores.
//!
//! Only categories that have at least one entry take part, so the result is
//! renormalized against the scored share of the weighting scheme. A student
//! who has only entered exam scores sees a grade computed from exam weight
//! alone. No clamping is applied.

use std::collections::BTreeMap;

use crate::models::{Course, GradeCategory};

/// Raw score text typed into the calculator. Blank or non-numeric counts as 0,
/// including text with a numeric prefix such as "85abc".
pub fn parse_score(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Per-category score entries for one calculator session. Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeEntrySet {
    entries: BTreeMap<String, Vec<String>>,
}

impl GradeEntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a blank entry to `category`.
    pub fn add_entry(&mut self, category: &str) {
        self.entries
            .entry(category.to_string())
            .or_default()
            .push(String::new());
    }

    /// Append a filled-in entry to `category`.
    pub fn push_score(&mut self, category: &str, value: impl Into<String>) {
        self.entries
            .entry(category.to_string())
            .or_default()
            .push(value.into());
    }

    /// Out-of-range indexes are ignored.
    pub fn update_entry(&mut self, category: &str, index: usize, value: impl Into<String>) {
        if let Some(slot) = self
            .entries
            .get_mut(category)
            .and_then(|scores| scores.get_mut(index))
        {
            *slot = value.into();
        }
    }

    pub fn remove_entry(&mut self, category: &str, index: usize) {
        if let Some(scores) = self.entries.get_mut(category) {
            if index < scores.len() {
                scores.remove(index);
            }
        }
    }

    pub fn entries(&self, category: &str) -> &[String] {
        self.entries
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Mean of the entries for `category`, or `None` when it has none.
    pub fn category_mean(&self, category: &str) -> Option<f64> {
        let scores = self.entries(category);
        if scores.is_empty() {
            return None;
        }
        let sum: f64 = scores.iter().map(|s| parse_score(s)).sum();
        Some(sum / scores.len() as f64)
    }
}

pub fn compute_course_grade(categories: &[GradeCategory], entries: &GradeEntrySet) -> Option<f64> {
    let mut weighted_sum = 0.0;
    let mut weight_total = 0.0;

    for category in categories {
        if let Some(mean) = entries.category_mean(&category.name) {
            weighted_sum += mean * (category.weight / 100.0);
            weight_total += category.weight;
        }
    }

    if weight_total == 0.0 {
        return None;
    }

    Some((weighted_sum / weight_total) * 100.0)
}

/// Interactive calculator bound to one course's weighting scheme.
#[derive(Debug, Clone)]
pub struct GradeCalculator {
    categories: Vec<GradeCategory>,
    entries: GradeEntrySet,
}

impl GradeCalculator {
    pub fn for_course(course: &Course) -> Self {
        Self {
            categories: course.grade_categories.clone(),
            entries: GradeEntrySet::new(),
        }
    }

    pub fn categories(&self) -> &[GradeCategory] {
        &self.categories
    }

    pub fn entries(&self) -> &GradeEntrySet {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut GradeEntrySet {
        &mut self.entries
    }

    pub fn calculated_grade(&self) -> Option<f64> {
        compute_course_grade(&self.categories, &self.entries)
    }
}

/// One decimal place, the way grades are displayed.
pub fn format_percentage(value: f64) -> String {
    format!("{:.1}%", value)
}
