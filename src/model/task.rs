use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user-defined task category. Tasks embed copies of the categories they
/// belong to, so edits have to be propagated (see
/// [`crate::ops::update_category`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    pub color: String,
}

impl Category {
    pub fn new(name: &str, emoji: Option<&str>, color: &str) -> Self {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            emoji: emoji.map(str::to_string),
            color: color.to_string(),
        }
    }

    pub fn apply(&mut self, patch: &CategoryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(emoji) = &patch.emoji {
            self.emoji = emoji.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
    }
}

/// Partial edit of a category. `emoji: Some(None)` clears the emoji;
/// `emoji: None` leaves it alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    pub id: Uuid,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub emoji: Option<Option<String>>,
    #[serde(default)]
    pub color: Option<String>,
}

/// A single task. Field names mirror the serialized shape the application
/// stores under the `"user"` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
    #[serde(default)]
    pub color: String,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Vec<Category>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_save: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(name: &str) -> Self {
        Task {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            emoji: None,
            color: String::new(),
            date: Utc::now(),
            deadline: None,
            category: Vec::new(),
            done: false,
            pinned: false,
            shared_by: None,
            last_save: None,
        }
    }
}
