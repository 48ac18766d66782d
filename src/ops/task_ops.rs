//! State transitions over the application cells. Everything goes through
//! `Cell::update` so edits apply to the latest value, composing with
//! changes that arrived from sibling contexts in the meantime.

use uuid::Uuid;

use crate::cell::CellError;
use crate::model::app_state::AppState;
use crate::model::task::{CategoryPatch, Task};
use crate::model::user::{SortOption, UserPrefs};

/// Toggle a task in the expanded set.
pub fn toggle_expanded(state: &AppState, id: Uuid) -> Result<(), CellError> {
    state.expanded_tasks.update(|ids| toggled(ids, id))
}

/// Toggle a task in the multi-selection.
pub fn toggle_selected(state: &AppState, id: Uuid) -> Result<(), CellError> {
    state.selected_tasks.update(|ids| toggled(ids, id))
}

fn toggled(ids: &[Uuid], id: Uuid) -> Vec<Uuid> {
    if ids.contains(&id) {
        ids.iter().copied().filter(|x| *x != id).collect()
    } else {
        ids.iter().copied().chain([id]).collect()
    }
}

/// Change the task sort order, writing through to the stored preferences.
pub fn set_sort_option(state: &AppState, option: SortOption) -> Result<(), CellError> {
    state.user.update(|u| {
        let mut u = u.clone();
        u.settings.sort_option = option;
        u
    })
}

/// Apply a category edit to the user's category list and to the category
/// copies embedded in every task.
pub fn update_category(state: &AppState, patch: &CategoryPatch) -> Result<(), CellError> {
    state.user.update(|u| {
        let mut u = u.clone();
        for cat in u.categories.iter_mut().filter(|c| c.id == patch.id) {
            cat.apply(patch);
        }
        for task in &mut u.tasks {
            for cat in task.category.iter_mut().filter(|c| c.id == patch.id) {
                cat.apply(patch);
            }
        }
        u
    })
}

/// Tasks in display order: the active sort option, pinned tasks first, and
/// completed tasks last when `doneToBottom` is on.
pub fn sorted_tasks(prefs: &UserPrefs) -> Vec<&Task> {
    let mut tasks: Vec<&Task> = prefs.tasks.iter().collect();

    match prefs.settings.sort_option {
        // Newest first.
        SortOption::DateCreated => tasks.sort_by(|a, b| b.date.cmp(&a.date)),
        // Soonest deadline first; tasks without one sink to the end.
        SortOption::DueDate => {
            tasks.sort_by_key(|t| (t.deadline.is_none(), t.deadline));
        }
        SortOption::Alphabetical => {
            tasks.sort_by_key(|t| t.name.to_lowercase());
        }
    }

    // Stable passes, outermost criterion last.
    tasks.sort_by_key(|t| !t.pinned);
    if prefs.settings.done_to_bottom {
        tasks.sort_by_key(|t| t.done);
    }
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::model::task::Category;
    use chrono::{Duration, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn state() -> (TempDir, AppState) {
        let tmp = TempDir::new().unwrap();
        let ctx = Context::open_unwatched(tmp.path()).unwrap();
        let state = AppState::load(&ctx).unwrap();
        (tmp, state)
    }

    #[test]
    fn expanded_toggle_round_trip() {
        let (_tmp, state) = state();
        let id = Uuid::new_v4();

        toggle_expanded(&state, id).unwrap();
        assert_eq!(state.expanded_tasks.get(), vec![id]);

        toggle_expanded(&state, id).unwrap();
        assert!(state.expanded_tasks.get().is_empty());
    }

    #[test]
    fn selection_keeps_other_ids() {
        let (_tmp, state) = state();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        toggle_selected(&state, a).unwrap();
        toggle_selected(&state, b).unwrap();
        toggle_selected(&state, a).unwrap();
        assert_eq!(state.selected_tasks.get(), vec![b]);
    }

    #[test]
    fn sort_option_writes_through() {
        let (_tmp, state) = state();
        set_sort_option(&state, SortOption::Alphabetical).unwrap();
        assert_eq!(
            state.user.with(|u| u.settings.sort_option),
            SortOption::Alphabetical
        );
    }

    #[test]
    fn category_edit_reaches_embedded_copies() {
        let (_tmp, state) = state();
        let cat = Category::new("Work", Some("💼"), "#248eff");
        let cat_id = cat.id;

        state
            .user
            .update(|u| {
                let mut u = u.clone();
                u.categories = vec![cat.clone()];
                let mut task = Task::new("report");
                task.category = vec![cat.clone()];
                u.tasks = vec![task];
                u
            })
            .unwrap();

        update_category(
            &state,
            &CategoryPatch {
                id: cat_id,
                name: Some("Office".into()),
                emoji: None,
                color: None,
            },
        )
        .unwrap();

        state.user.with(|u| {
            assert_eq!(u.categories[0].name, "Office");
            assert_eq!(u.tasks[0].category[0].name, "Office");
        });
    }

    fn named_task(name: &str, days_ago: i64) -> Task {
        let mut t = Task::new(name);
        t.date = Utc::now() - Duration::days(days_ago);
        t
    }

    #[test]
    fn date_created_sorts_newest_first() {
        let mut prefs = UserPrefs::default();
        prefs.tasks = vec![named_task("old", 5), named_task("new", 1)];

        let names: Vec<&str> = sorted_tasks(&prefs).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["new", "old"]);
    }

    #[test]
    fn due_date_sorts_missing_deadlines_last() {
        let mut prefs = UserPrefs::default();
        prefs.settings.sort_option = SortOption::DueDate;

        let mut soon = named_task("soon", 0);
        soon.deadline = Some(Utc::now() + Duration::days(1));
        let mut later = named_task("later", 0);
        later.deadline = Some(Utc::now() + Duration::days(9));
        let none = named_task("none", 0);
        prefs.tasks = vec![none, later, soon];

        let names: Vec<&str> = sorted_tasks(&prefs).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["soon", "later", "none"]);
    }

    #[test]
    fn pinned_first_done_last() {
        let mut prefs = UserPrefs::default();
        prefs.settings.sort_option = SortOption::Alphabetical;
        prefs.settings.done_to_bottom = true;

        let mut done = named_task("aaa done", 0);
        done.done = true;
        let mut pinned = named_task("zzz pinned", 0);
        pinned.pinned = true;
        let plain = named_task("mmm plain", 0);
        prefs.tasks = vec![done, pinned, plain];

        let names: Vec<&str> = sorted_tasks(&prefs).iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["zzz pinned", "mmm plain", "aaa done"]);
    }
}
