pub mod app_state;
pub mod task;
pub mod user;

pub use app_state::AppState;
pub use task::{Category, CategoryPatch, Task};
pub use user::{DarkMode, EmojisStyle, ReduceMotion, Settings, SortOption, UserPrefs};
