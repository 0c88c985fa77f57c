pub mod dates;
pub mod task;
pub mod views;

pub use task::{Subtask, SubtaskPatch, Task, TaskPatch};
pub use views::{
    check_mark, completed, display_title, flatten_tasks, future_tasks, home_summary,
    leftover_tasks, progress_label, today_tasks, tree_connector, uncompleted, FlatRow,
    HomeSummary,
};
