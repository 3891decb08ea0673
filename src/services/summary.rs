//! Dashboard and grades-page aggregates.
//!
//! Two GPA figures exist and stay separate: the dashboard shows the plain
//! mean of graded courses on the 4.0 scale, the grades page weights each
//! course by its credits.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{Assignment, Course, EffectiveStatus};
use crate::services::letter_grade::{GpaStanding, LetterBucket};
use crate::services::status::assignment_status;

pub const UPCOMING_WINDOW_DAYS: i64 = 7;
pub const UPCOMING_PREVIEW_LIMIT: usize = 5;
pub const RECENT_GRADES_LIMIT: usize = 4;
const GPA_DIVISOR: f64 = 25.0;

/// Linear map from the 100-point scale to 4.0.
pub fn percentage_to_gpa(percentage: f64) -> f64 {
    percentage / GPA_DIVISOR
}

fn graded(courses: &[Course]) -> impl Iterator<Item = (&Course, f64)> {
    courses
        .iter()
        .filter_map(|c| c.graded_percentage().map(|g| (c, g)))
}

/// Unweighted mean GPA over graded courses; 0 when none are graded.
pub fn average_gpa(courses: &[Course]) -> f64 {
    let (sum, count) = graded(courses).fold((0.0, 0usize), |(sum, count), (_, grade)| {
        (sum + percentage_to_gpa(grade), count + 1)
    });
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Credit-weighted GPA over graded courses; 0 when none are graded or they carry no credits.
pub fn credit_weighted_gpa(courses: &[Course]) -> f64 {
    let (weighted_sum, total_credits) =
        graded(courses).fold((0.0, 0.0), |(sum, credits), (course, grade)| {
            let c = f64::from(course.credits);
            (sum + grade * c, credits + c)
        });
    if total_credits > 0.0 {
        percentage_to_gpa(weighted_sum / total_credits)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary<'a> {
    pub total_courses: usize,
    pub upcoming_count: usize,
    pub overdue_count: usize,
    pub completion_rate: f64,
    pub average_gpa: f64,
    pub upcoming: Vec<&'a Assignment>,
    pub overdue: Vec<&'a Assignment>,
    pub recent_grades: Vec<&'a Course>,
}

impl<'a> DashboardSummary<'a> {
    /// The first few upcoming assignments, as the dashboard card lists them.
    pub fn upcoming_preview(&self) -> &[&'a Assignment] {
        let end = self.upcoming.len().min(UPCOMING_PREVIEW_LIMIT);
        &self.upcoming[..end]
    }
}

pub fn build_dashboard_summary<'a>(
    courses: &'a [Course],
    assignments: &'a [Assignment],
    now: DateTime<Utc>,
) -> DashboardSummary<'a> {
    let week_from_now = now + Duration::days(UPCOMING_WINDOW_DAYS);

    let upcoming: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| assignment_status(a, now) != EffectiveStatus::Completed)
        .filter(|a| a.due_at > now && a.due_at < week_from_now)
        .collect();

    let overdue: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| assignment_status(a, now) == EffectiveStatus::Overdue)
        .collect();

    let completed = assignments.iter().filter(|a| a.is_completed()).count();
    let completion_rate = if assignments.is_empty() {
        0.0
    } else {
        completed as f64 / assignments.len() as f64 * 100.0
    };

    let recent_grades: Vec<&Course> = courses
        .iter()
        .filter(|c| c.is_graded())
        .take(RECENT_GRADES_LIMIT)
        .collect();

    debug!(
        "dashboard: {} courses, {} assignments, {} upcoming, {} overdue",
        courses.len(),
        assignments.len(),
        upcoming.len(),
        overdue.len()
    );

    DashboardSummary {
        total_courses: courses.len(),
        upcoming_count: upcoming.len(),
        overdue_count: overdue.len(),
        completion_rate,
        average_gpa: average_gpa(courses),
        upcoming,
        overdue,
        recent_grades,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeStats {
    pub overall_gpa: f64,
    pub standing: GpaStanding,
    pub average_grade: f64,
    pub highest_grade: f64,
    pub lowest_grade: f64,
    pub total_credits: u64,
    pub completed_assignments: usize,
}

pub fn build_grade_stats(courses: &[Course], assignments: &[Assignment]) -> GradeStats {
    let completed_assignments = assignments
        .iter()
        .filter(|a| a.is_completed() && a.is_graded())
        .count();

    let grades: Vec<f64> = graded(courses).map(|(_, g)| g).collect();
    if grades.is_empty() {
        // Nothing graded yet: credits are summed over every course.
        return GradeStats {
            overall_gpa: 0.0,
            standing: GpaStanding::of(0.0),
            average_grade: 0.0,
            highest_grade: 0.0,
            lowest_grade: 0.0,
            total_credits: courses.iter().map(|c| u64::from(c.credits)).sum(),
            completed_assignments,
        };
    }

    let overall_gpa = credit_weighted_gpa(courses);
    GradeStats {
        overall_gpa,
        standing: GpaStanding::of(overall_gpa),
        average_grade: grades.iter().sum::<f64>() / grades.len() as f64,
        highest_grade: grades.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        lowest_grade: grades.iter().copied().fold(f64::INFINITY, f64::min),
        total_credits: graded(courses).map(|(c, _)| u64::from(c.credits)).sum(),
        completed_assignments,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub bucket: LetterBucket,
    pub count: usize,
}

/// Graded courses per letter bucket, always all five buckets from A to F.
pub fn grade_distribution(courses: &[Course]) -> Vec<BucketCount> {
    LetterBucket::ALL
        .iter()
        .map(|bucket| BucketCount {
            bucket: *bucket,
            count: graded(courses)
                .filter(|(_, g)| LetterBucket::of(*g) == *bucket)
                .count(),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

/// `pending` counts stored status, so overdue assignments are in it too.
pub fn assignment_counts(assignments: &[Assignment], now: DateTime<Utc>) -> AssignmentCounts {
    assignments
        .iter()
        .fold(AssignmentCounts::default(), |mut counts, a| {
            counts.total += 1;
            if a.is_completed() {
                counts.completed += 1;
            } else {
                counts.pending += 1;
            }
            if assignment_status(a, now) == EffectiveStatus::Overdue {
                counts.overdue += 1;
            }
            counts
        })
}
