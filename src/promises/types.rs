use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PromiseStatus {
    Pending,
    InProgress,
    Fulfilled,
    Cancelled,
}

impl PromiseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromiseStatus::Pending => "pending",
            PromiseStatus::InProgress => "in-progress",
            PromiseStatus::Fulfilled => "fulfilled",
            PromiseStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for PromiseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromiseStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(PromiseStatus::Pending),
            "in-progress" | "in_progress" => Ok(PromiseStatus::InProgress),
            "fulfilled" => Ok(PromiseStatus::Fulfilled),
            "cancelled" => Ok(PromiseStatus::Cancelled),
            _ => Err(format!("Unknown promise status: {s}")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromiseCategory {
    Financial,
    Volunteer,
    Resource,
    Advocacy,
    Other,
}

impl PromiseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromiseCategory::Financial => "financial",
            PromiseCategory::Volunteer => "volunteer",
            PromiseCategory::Resource => "resource",
            PromiseCategory::Advocacy => "advocacy",
            PromiseCategory::Other => "other",
        }
    }
}

impl fmt::Display for PromiseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PromiseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "financial" => Ok(PromiseCategory::Financial),
            "volunteer" => Ok(PromiseCategory::Volunteer),
            "resource" => Ok(PromiseCategory::Resource),
            "advocacy" => Ok(PromiseCategory::Advocacy),
            "other" => Ok(PromiseCategory::Other),
            _ => Err(format!("Unknown promise category: {s}")),
        }
    }
}

/// A donor's commitment. `fulfilled_at` is present exactly when `status` is
/// [`PromiseStatus::Fulfilled`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promise {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub category: PromiseCategory,
    pub status: PromiseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fulfilled_at: Option<DateTime<Utc>>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Promise {
    pub fn is_fulfilled(&self) -> bool {
        self.status == PromiseStatus::Fulfilled
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewPromise {
    pub title: String,
    pub description: String,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub category: PromiseCategory,
    pub status: PromiseStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_by: String,
    pub notes: Option<String>,
}

impl NewPromise {
    pub fn new(title: impl Into<String>, category: PromiseCategory) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            amount: None,
            currency: None,
            category,
            status: PromiseStatus::Pending,
            due_date: None,
            created_by: String::new(),
            notes: None,
        }
    }
}

/// Partial promise. For the optional fields `Some(None)` clears the value.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PromiseUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub amount: Option<Option<f64>>,
    pub currency: Option<Option<String>>,
    pub category: Option<PromiseCategory>,
    pub status: Option<PromiseStatus>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub created_by: Option<String>,
    pub notes: Option<Option<String>>,
}

impl PromiseUpdate {
    pub fn status(status: PromiseStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub(crate) fn apply_to(self, promise: &mut Promise, now: DateTime<Utc>) {
        if let Some(title) = self.title {
            promise.title = title;
        }
        if let Some(description) = self.description {
            promise.description = description;
        }
        if let Some(amount) = self.amount {
            promise.amount = amount;
        }
        if let Some(currency) = self.currency {
            promise.currency = currency;
        }
        if let Some(category) = self.category {
            promise.category = category;
        }
        if let Some(due_date) = self.due_date {
            promise.due_date = due_date;
        }
        if let Some(created_by) = self.created_by {
            promise.created_by = created_by;
        }
        if let Some(notes) = self.notes {
            promise.notes = notes;
        }

        let was_fulfilled = promise.is_fulfilled();
        if let Some(status) = self.status {
            promise.status = status;
        }
        promise.fulfilled_at = match (was_fulfilled, promise.is_fulfilled()) {
            (_, false) => None,
            (false, true) => Some(now),
            (true, true) => promise.fulfilled_at.or(Some(now)),
        };
        promise.updated_at = now;
    }
}
