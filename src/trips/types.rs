use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Planning,
    Active,
    Completed,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Planning => "planning",
            TripStatus::Active => "active",
            TripStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for TripStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TripStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "planning" => Ok(TripStatus::Planning),
            "active" => Ok(TripStatus::Active),
            "completed" => Ok(TripStatus::Completed),
            _ => Err(format!("Unknown trip status: {s}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecklistCategory {
    Travel,
    Preparation,
    Documentation,
    Health,
    Other,
}

impl ChecklistCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChecklistCategory::Travel => "travel",
            ChecklistCategory::Preparation => "preparation",
            ChecklistCategory::Documentation => "documentation",
            ChecklistCategory::Health => "health",
            ChecklistCategory::Other => "other",
        }
    }
}

impl fmt::Display for ChecklistCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChecklistCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "travel" => Ok(ChecklistCategory::Travel),
            "preparation" => Ok(ChecklistCategory::Preparation),
            "documentation" => Ok(ChecklistCategory::Documentation),
            "health" => Ok(ChecklistCategory::Health),
            "other" => Ok(ChecklistCategory::Other),
            _ => Err(format!("Unknown checklist category: {s}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(format!("Unknown priority: {s}")),
        }
    }
}

/// A checklist entry owned by exactly one trip. `completed_at` is present
/// exactly when `is_completed` is true.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ChecklistCategory,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub priority: Priority,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: String,
    pub title: String,
    pub description: String,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: TripStatus,
    #[serde(default)]
    pub checklist: Vec<ChecklistItem>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Trip {
    pub fn checklist_item(&self, item_id: &str) -> Option<&ChecklistItem> {
        self.checklist.iter().find(|item| item.id == item_id)
    }

    pub fn completed_count(&self) -> usize {
        self.checklist.iter().filter(|item| item.is_completed).count()
    }

    /// Whole-number share of completed checklist items; 0 for an empty list.
    pub fn progress_percentage(&self) -> u8 {
        let total = self.checklist.len();
        if total == 0 {
            return 0;
        }
        ((self.completed_count() as f64 / total as f64) * 100.0).round() as u8
    }
}

/// Trip fields supplied by the caller; id and timestamps are assigned on
/// create.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTrip {
    pub title: String,
    pub description: String,
    pub destination: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: TripStatus,
    pub checklist: Vec<NewChecklistItem>,
    pub created_by: String,
}

impl NewTrip {
    pub fn new(
        title: impl Into<String>,
        destination: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            destination: destination.into(),
            start_date,
            end_date,
            status: TripStatus::Planning,
            checklist: Vec::new(),
            created_by: String::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TripUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub destination: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<TripStatus>,
    pub created_by: Option<String>,
}

impl TripUpdate {
    pub(crate) fn apply_to(self, trip: &mut Trip) {
        if let Some(title) = self.title {
            trip.title = title;
        }
        if let Some(description) = self.description {
            trip.description = description;
        }
        if let Some(destination) = self.destination {
            trip.destination = destination;
        }
        if let Some(start_date) = self.start_date {
            trip.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            trip.end_date = end_date;
        }
        if let Some(status) = self.status {
            trip.status = status;
        }
        if let Some(created_by) = self.created_by {
            trip.created_by = created_by;
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewChecklistItem {
    pub title: String,
    pub description: String,
    pub category: ChecklistCategory,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub priority: Priority,
}

impl NewChecklistItem {
    pub fn new(title: impl Into<String>, category: ChecklistCategory, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            category,
            is_completed: false,
            due_date: None,
            priority,
        }
    }

    pub(crate) fn into_item(self, id: String, now: DateTime<Utc>) -> ChecklistItem {
        ChecklistItem {
            id,
            title: self.title,
            description: self.description,
            category: self.category,
            is_completed: self.is_completed,
            due_date: self.due_date,
            completed_at: self.is_completed.then_some(now),
            priority: self.priority,
        }
    }
}

/// Partial checklist item. `due_date: Some(None)` clears the due date.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChecklistItemUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<ChecklistCategory>,
    pub is_completed: Option<bool>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub priority: Option<Priority>,
}

impl ChecklistItemUpdate {
    pub fn completed(is_completed: bool) -> Self {
        Self {
            is_completed: Some(is_completed),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, item: &mut ChecklistItem, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            item.title = title;
        }
        if let Some(description) = self.description {
            item.description = description;
        }
        if let Some(category) = self.category {
            item.category = category;
        }
        if let Some(due_date) = self.due_date {
            item.due_date = due_date;
        }
        if let Some(priority) = self.priority {
            item.priority = priority;
        }

        let was_completed = item.is_completed;
        let is_completed = self.is_completed.unwrap_or(was_completed);
        item.is_completed = is_completed;
        item.completed_at = match (was_completed, is_completed) {
            (_, false) => None,
            (false, true) => Some(now),
            (true, true) => item.completed_at.or(Some(now)),
        };
    }
}
