use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::task::{Category, Task};

/// Current schema version of the stored preferences shape. Bump on breaking
/// changes and extend [`UserPrefs::migrated`] accordingly.
pub const PREFS_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DarkMode {
    #[default]
    System,
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmojisStyle {
    #[default]
    Native,
    Apple,
    Google,
    Twitter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReduceMotion {
    #[default]
    System,
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    #[default]
    DateCreated,
    DueDate,
    Alphabetical,
}

/// User-tunable behavior, all serde-defaulted so older stored shapes load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_true")]
    pub enable_categories: bool,
    #[serde(default)]
    pub app_badge: bool,
    #[serde(default)]
    pub done_to_bottom: bool,
    #[serde(default = "default_true")]
    pub show_progress_bar: bool,
    #[serde(default)]
    pub reduce_motion: ReduceMotion,
    #[serde(default = "default_true")]
    pub enable_glow: bool,
    #[serde(default)]
    pub simple_emoji_picker: bool,
    #[serde(default = "default_true")]
    pub enable_read_aloud: bool,
    #[serde(default)]
    pub voice: String,
    #[serde(default = "default_voice_volume")]
    pub voice_volume: f32,
    #[serde(default)]
    pub sort_option: SortOption,
}

fn default_true() -> bool {
    true
}

fn default_voice_volume() -> f32 {
    0.6
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            enable_categories: true,
            app_badge: false,
            done_to_bottom: false,
            show_progress_bar: true,
            reduce_motion: ReduceMotion::System,
            enable_glow: true,
            simple_emoji_picker: false,
            enable_read_aloud: true,
            voice: String::new(),
            voice_volume: 0.6,
            sort_option: SortOption::DateCreated,
        }
    }
}

/// The root preferences object, stored under the durable `"user"` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPrefs {
    /// Schema version tag; `0` marks shapes written before the tag existed.
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default, rename = "darkmode")]
    pub dark_mode: DarkMode,
    #[serde(default)]
    pub emojis_style: EmojisStyle,
    #[serde(default)]
    pub settings: Settings,
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

fn default_theme() -> String {
    "system".to_string()
}

fn default_categories() -> Vec<Category> {
    vec![
        Category::new("Home", Some("🏠"), "#1fff44"),
        Category::new("Work", Some("💼"), "#248eff"),
        Category::new("Personal", Some("👤"), "#e843fe"),
        Category::new("Health/Fitness", Some("💪"), "#ffdf3d"),
        Category::new("Education", Some("📚"), "#ff8e24"),
    ]
}

impl Default for UserPrefs {
    fn default() -> Self {
        UserPrefs {
            version: PREFS_VERSION,
            name: None,
            created_at: Utc::now(),
            theme: default_theme(),
            dark_mode: DarkMode::System,
            emojis_style: EmojisStyle::Native,
            settings: Settings::default(),
            categories: default_categories(),
            tasks: Vec::new(),
        }
    }
}

impl UserPrefs {
    /// Normalize a shape loaded from an older schema version.
    ///
    /// Version 0 predates the tag; its missing fields are already filled by
    /// serde defaults, so migration is just stamping the current version.
    pub fn migrated(mut self) -> Self {
        if self.version < PREFS_VERSION {
            self.version = PREFS_VERSION;
        }
        self
    }
}
