use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::models::Assignment;

/// Assignments whose due timestamp falls on `date` (UTC calendar day).
pub fn assignments_due_on(assignments: &[Assignment], date: NaiveDate) -> Vec<&Assignment> {
    assignments
        .iter()
        .filter(|a| a.due_at.date_naive() == date)
        .collect()
}

/// Move by whole months, clamping the day to the target month's length.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    if months >= 0 {
        date.checked_add_months(Months::new(months.unsigned_abs()))
    } else {
        date.checked_sub_months(Months::new(months.unsigned_abs()))
    }
}

/// Whole weeks (Sunday to Saturday) covering the given month.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<NaiveDate>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let last = shift_month(first, 1)?.pred_opt()?;

    let lead = i64::from(first.weekday().num_days_from_sunday());
    let trail = 6 - i64::from(last.weekday().num_days_from_sunday());
    let start = first - Duration::days(lead);
    let end = last + Duration::days(trail);

    Some(start.iter_days().take_while(|d| *d <= end).collect())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay<'a> {
    pub date: NaiveDate,
    pub in_month: bool,
    pub due: Vec<&'a Assignment>,
}

pub fn calendar_month(
    assignments: &[Assignment],
    year: i32,
    month: u32,
) -> Option<Vec<CalendarDay<'_>>> {
    let days = month_grid(year, month)?;
    Some(
        days.into_iter()
            .map(|date| CalendarDay {
                date,
                in_month: date.month() == month && date.year() == year,
                due: assignments_due_on(assignments, date),
            })
            .collect(),
    )
}
