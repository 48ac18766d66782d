use uuid::Uuid;

use crate::cell::{Cell, CellError};
use crate::context::Context;
use crate::model::user::{PREFS_VERSION, UserPrefs};

/// Durable slot holding the whole preferences object.
pub const USER_KEY: &str = "user";
/// Session slots for transient UI state.
pub const EXPANDED_TASKS_KEY: &str = "expandedTasks";
pub const SELECTED_TASKS_KEY: &str = "selectedTasks";
pub const SEARCH_KEY: &str = "search";
pub const MOVE_MODE_KEY: &str = "moveMode";

/// The application's persisted state for one context: the durable user
/// preferences plus the session-scoped UI cells.
pub struct AppState {
    pub user: Cell<UserPrefs>,
    pub expanded_tasks: Cell<Vec<Uuid>>,
    pub selected_tasks: Cell<Vec<Uuid>>,
    pub search: Cell<String>,
    pub move_mode: Cell<bool>,
}

impl AppState {
    /// Bind all application cells in `ctx`, migrating the stored
    /// preferences shape if it predates the current schema version.
    pub fn load(ctx: &Context) -> Result<Self, CellError> {
        let user = ctx.durable_cell(UserPrefs::default(), USER_KEY)?;
        if user.with(|u| u.version) < PREFS_VERSION {
            user.update(|u| u.clone().migrated())?;
        }
        Ok(AppState {
            user,
            expanded_tasks: ctx.session_cell(Vec::new(), EXPANDED_TASKS_KEY)?,
            selected_tasks: ctx.session_cell(Vec::new(), SELECTED_TASKS_KEY)?,
            search: ctx.session_cell(String::new(), SEARCH_KEY)?,
            move_mode: ctx.session_cell(false, MOVE_MODE_KEY)?,
        })
    }
}
