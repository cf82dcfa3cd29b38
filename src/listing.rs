use std::cmp::Ordering;
use std::str::FromStr;

use crate::errors::InputError;
use crate::models::{Category, Priority, Task};

/// Column the task table is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Priority,
    DueDate,
    Status,
}

impl SortField {
    pub fn next(self) -> SortField {
        match self {
            SortField::Priority => SortField::DueDate,
            SortField::DueDate => SortField::Status,
            SortField::Status => SortField::Priority,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Priority => "priority",
            SortField::DueDate => "due",
            SortField::Status => "status",
        }
    }
}

impl FromStr for SortField {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "priority" => Ok(SortField::Priority),
            "due" | "date" | "due_date" => Ok(SortField::DueDate),
            "status" => Ok(SortField::Status),
            _ => Err(InputError::UnknownSortField(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> SortDirection {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Narrow the table to one category and/or one priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.category.map_or(true, |c| task.category == c)
            && self.priority.map_or(true, |p| task.priority == p)
    }
}

/// Table ordering: pending tasks always before completed ones, then by
/// `field` in `direction`. The sort is stable, so ties keep insertion order.
pub fn sort_tasks(tasks: &mut [Task], field: SortField, direction: SortDirection) {
    tasks.sort_by(|a, b| {
        if a.completed != b.completed {
            return a.completed.cmp(&b.completed);
        }
        let ord = compare(a, b, field);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare(a: &Task, b: &Task, field: SortField) -> Ordering {
    match field {
        SortField::Priority => a.priority.rank().cmp(&b.priority.rank()),
        SortField::DueDate => a.due_date.cmp(&b.due_date),
        SortField::Status => a.completed.cmp(&b.completed),
    }
}

/// Filters then sorts a copy of `tasks`.
pub fn select(
    tasks: &[Task],
    filter: &TaskFilter,
    field: SortField,
    direction: SortDirection,
) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    sort_tasks(&mut out, field, direction);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn task(id: u64, priority: Priority, due: u32, completed: bool) -> Task {
        Task {
            id,
            user_id: "guest".into(),
            title: format!("t{id}"),
            category: if id % 2 == 0 { Category::Work } else { Category::Health },
            priority,
            due_date: NaiveDate::from_ymd_opt(2026, 1, due).unwrap(),
            time_slot: None,
            completed,
            created_at: String::new(),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            task(1, Priority::Low, 3, false),
            task(2, Priority::High, 5, true),
            task(3, Priority::High, 4, false),
            task(4, Priority::Medium, 1, false),
        ]
    }

    #[test]
    fn default_sort_is_priority_with_pending_first() {
        let out = select(&sample(), &TaskFilter::default(), SortField::Priority, SortDirection::Asc);
        assert_eq!(ids(&out), vec![3, 4, 1, 2]);
    }

    #[test]
    fn descending_keeps_completed_last() {
        let out = select(&sample(), &TaskFilter::default(), SortField::DueDate, SortDirection::Desc);
        assert_eq!(ids(&out), vec![3, 1, 4, 2]);
    }

    #[test]
    fn filter_by_category_and_priority() {
        let filter = TaskFilter {
            category: Some(Category::Health),
            priority: Some(Priority::High),
        };
        let out = select(&sample(), &filter, SortField::Priority, SortDirection::Asc);
        assert_eq!(ids(&out), vec![3]);
    }

    #[test]
    fn sort_field_parses_aliases() {
        assert_eq!("due".parse::<SortField>().unwrap(), SortField::DueDate);
        assert_eq!("Status".parse::<SortField>().unwrap(), SortField::Status);
        assert!("urgency".parse::<SortField>().is_err());
    }
}
