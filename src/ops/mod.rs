mod task_ops;

pub use task_ops::{
    set_sort_option, sorted_tasks, toggle_expanded, toggle_selected, update_category,
};
