use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::InputError;

/// Owner id used when no profile has been created.
pub const GUEST_ID: &str = "guest";

/// Life area a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Health,
    Study,
    Work,
    Personal,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 4] = [
        Category::Health,
        Category::Study,
        Category::Work,
        Category::Personal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Health => "Health",
            Category::Study => "Study",
            Category::Work => "Work",
            Category::Personal => "Personal",
        }
    }

    /// The next category in display order, wrapping around.
    pub fn next(self) -> Category {
        match self {
            Category::Health => Category::Study,
            Category::Study => Category::Work,
            Category::Work => Category::Personal,
            Category::Personal => Category::Health,
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Category::Personal
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = InputError;

    /// Case-insensitive, so both the `"Health"` and `"health"` spellings load.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "health" => Ok(Category::Health),
            "study" => Ok(Category::Study),
            "work" => Ok(Category::Work),
            "personal" => Ok(Category::Personal),
            _ => Err(InputError::UnknownCategory(s.to_string())),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Sort rank: High sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 0,
            Priority::Medium => 1,
            Priority::Low => 2,
        }
    }

    pub fn next(self) -> Priority {
        match self {
            Priority::Low => Priority::Medium,
            Priority::Medium => Priority::High,
            Priority::High => Priority::Low,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(InputError::UnknownPriority(s.to_string())),
        }
    }
}

macro_rules! serde_via_str {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

serde_via_str!(Category);
serde_via_str!(Priority);

/// Represents a single dated task.
///
/// Field aliases let exports from the camelCase schema (`dueDate`, `status`,
/// ...) load without conversion. Writes always use the snake_case names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Task {
    /// Unique identifier for the task.
    #[serde(deserialize_with = "de_task_id")]
    pub id: u64,
    /// Owning user.
    #[serde(alias = "userId")]
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub priority: Priority,
    /// The day the task is scheduled for.
    #[serde(alias = "dueDate")]
    pub due_date: NaiveDate,
    /// Optional time of day, stored as `HH:MM`.
    #[serde(
        default,
        alias = "timeSlot",
        with = "time_slot",
        skip_serializing_if = "Option::is_none"
    )]
    pub time_slot: Option<NaiveTime>,
    /// Whether the task has been completed.
    #[serde(default, alias = "status")]
    pub completed: bool,
    /// Timestamp when the task was created (RFC 3339).
    #[serde(alias = "createdAt")]
    pub created_at: String,
}

/// Fields supplied when creating a task. Id, owner and timestamp are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub category: Category,
    pub priority: Priority,
    pub due_date: NaiveDate,
    pub time_slot: Option<NaiveTime>,
}

/// Partial update applied by `edit`. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    /// `Some(None)` clears the slot.
    pub time_slot: Option<Option<NaiveTime>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

// Foreign exports use UUID strings for ids; those become 0 and are
// renumbered on import.
fn de_task_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Num(u64),
        Text(String),
    }
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Num(n) => n,
        RawId::Text(s) => s.parse().unwrap_or(0),
    })
}

mod time_slot {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(t) => s.serialize_str(&t.format("%H:%M").to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => super::parse_time(s).map(Some).map_err(serde::de::Error::custom),
        }
    }
}

/// Parses a `YYYY-MM-DD` due date.
pub fn parse_date(s: &str) -> Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| InputError::InvalidDate(s.to_string()))
}

/// Parses an `HH:MM` (or `HH:MM:SS`) time slot.
pub fn parse_time(s: &str) -> Result<NaiveTime, InputError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| InputError::InvalidTime(s.to_string()))
}

/// Author of a chat message.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One entry in the coach transcript.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: u64,
    pub role: Role,
    pub content: String,
    pub timestamp: String,
}

/// Local user profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, alias = "profileImage", skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    #[serde(alias = "createdAt")]
    pub created_at: String,
}

impl User {
    /// First word of the display name, used in greetings.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}
