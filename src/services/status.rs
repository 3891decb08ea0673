use chrono::{DateTime, Utc};

use crate::models::{Assignment, AssignmentStatus, EffectiveStatus};

/// Classify a due timestamp against `now`.
///
/// Completed always wins. Otherwise the assignment is overdue only when it
/// is due strictly before `now`; due exactly at `now` is still pending.
pub fn effective_status(
    due_at: DateTime<Utc>,
    stored: AssignmentStatus,
    now: DateTime<Utc>,
) -> EffectiveStatus {
    match stored {
        AssignmentStatus::Completed => EffectiveStatus::Completed,
        AssignmentStatus::Pending if due_at < now => EffectiveStatus::Overdue,
        AssignmentStatus::Pending => EffectiveStatus::Pending,
    }
}

pub fn assignment_status(assignment: &Assignment, now: DateTime<Utc>) -> EffectiveStatus {
    effective_status(assignment.due_at, assignment.status, now)
}

pub fn is_overdue(assignment: &Assignment, now: DateTime<Utc>) -> bool {
    assignment_status(assignment, now) == EffectiveStatus::Overdue
}
