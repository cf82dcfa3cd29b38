//! Completion statistics derived from a task list.
//!
//! Everything here is a pure function of the tasks passed in (plus "today"
//! where a date anchor is needed), so callers recompute after every change.

use std::collections::BTreeSet;

use chrono::{Duration, Local, NaiveDate};
use serde::Serialize;

use crate::models::{Category, Task};

/// Tasks due on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub total: usize,
    pub completed: usize,
}

/// Completed task count for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: Category,
    pub completed: usize,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub completed_today: usize,
    pub pending_today: usize,
    pub total_completed: usize,
    pub total: usize,
    pub streak: usize,
    pub completion_rate: u8,
    /// Completed tasks due within the last seven days.
    pub week_completed: usize,
}

/// Seven entries, `today - 6` through `today`, oldest first.
pub fn weekly_series(tasks: &[Task], today: NaiveDate) -> Vec<DayPoint> {
    let mut days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset);
        let due: Vec<&Task> = tasks.iter().filter(|t| t.due_date == date).collect();
        days.push(DayPoint {
            date,
            label: date.format("%a").to_string(),
            total: due.len(),
            completed: due.iter().filter(|t| t.completed).count(),
        });
    }
    days
}

/// Completed tasks per category, in category order, skipping zeros.
pub fn category_breakdown(tasks: &[Task]) -> Vec<CategoryCount> {
    Category::ALL
        .iter()
        .map(|&category| CategoryCount {
            category,
            completed: tasks
                .iter()
                .filter(|t| t.category == category && t.completed)
                .count(),
        })
        .filter(|c| c.completed > 0)
        .collect()
}

/// Percentage of tasks completed, rounded half up. Zero for an empty list.
pub fn completion_rate(tasks: &[Task]) -> u8 {
    let total = tasks.len();
    if total == 0 {
        return 0;
    }
    let completed = tasks.iter().filter(|t| t.completed).count();
    // floor(100 * c / t + 1/2) without floating point
    ((200 * completed + total) / (2 * total)) as u8
}

/// Number of fully completed due dates, counting back from the latest one.
///
/// Dates are the distinct due dates that have tasks; calendar days without
/// any task are skipped rather than breaking the run.
pub fn streak(tasks: &[Task]) -> usize {
    let dates: BTreeSet<NaiveDate> = tasks.iter().map(|t| t.due_date).collect();
    let mut streak = 0;
    for date in dates.into_iter().rev() {
        let mut due = tasks.iter().filter(|t| t.due_date == date).peekable();
        let any = due.peek().is_some();
        if any && due.all(|t| t.completed) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

pub fn summary(tasks: &[Task]) -> DashboardSummary {
    summary_at(tasks, Local::now().date_naive())
}

pub fn summary_at(tasks: &[Task], today: NaiveDate) -> DashboardSummary {
    let (completed_today, pending_today) = tasks
        .iter()
        .filter(|t| t.due_date == today)
        .fold((0, 0), |(done, pending), t| {
            if t.completed {
                (done + 1, pending)
            } else {
                (done, pending + 1)
            }
        });

    DashboardSummary {
        completed_today,
        pending_today,
        total_completed: tasks.iter().filter(|t| t.completed).count(),
        total: tasks.len(),
        streak: streak(tasks),
        completion_rate: completion_rate(tasks),
        week_completed: weekly_series(tasks, today)
            .iter()
            .map(|d| d.completed)
            .sum(),
    }
}
