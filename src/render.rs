use chrono::NaiveDate;
use daylist::domain::dates::format_date;
use daylist::domain::{
    check_mark, completed, display_title, flatten_tasks, future_tasks, home_summary,
    leftover_tasks, today_tasks, tree_connector, uncompleted, Task,
};

/// Render tasks as a tree, one line per task or subtask
pub fn render_task_list(tasks: &[&Task], show_date: bool) -> String {
    let mut output = String::new();

    for row in flatten_tasks(tasks) {
        let task = tasks[row.task_index];
        match row.subtask_index {
            None => {
                if show_date {
                    output.push_str(&format!("{}  ", format_date(task.date)));
                }
                output.push_str(&format!(
                    "{} {}  #{}\n",
                    check_mark(task.completed),
                    display_title(task),
                    task.id
                ));
            }
            Some(st_idx) => {
                let subtask = &task.subtasks[st_idx];
                let indent = if show_date { " ".repeat(14) } else { "  ".to_string() };
                output.push_str(&format!(
                    "{}{} {} {}  #{}\n",
                    indent,
                    tree_connector(row.is_last),
                    check_mark(subtask.completed),
                    subtask.text,
                    subtask.id
                ));
            }
        }
    }

    output
}

/// Home screen: today's counters, reminders and task list
pub fn render_home(tasks: &[Task], today: NaiveDate) -> String {
    let summary = home_summary(tasks, today);
    let mut output = String::new();

    output.push_str(&format!("# Today ({})\n\n", format_date(today)));
    output.push_str(&format!(
        "Completed: {}   Uncompleted: {}\n",
        summary.completed_count, summary.uncompleted_count
    ));
    if summary.has_pending_today {
        output.push_str("You assigned some tasks for today!\n");
    }
    output.push('\n');

    let todays = today_tasks(tasks, today);
    if todays.is_empty() {
        output.push_str("Nothing planned for today.\n");
    } else {
        output.push_str(&render_task_list(&todays, false));
    }

    if summary.has_leftovers {
        output.push_str("\nLeftover from yesterday!\n");
        output.push_str(&render_task_list(&leftover_tasks(tasks, today), false));
    }

    output
}

/// All of today's tasks split into uncompleted and completed
pub fn render_all(tasks: &[Task], today: NaiveDate) -> String {
    let todays = today_tasks(tasks, today);
    let open = uncompleted(todays.iter().copied());
    let done = completed(todays.iter().copied());
    let mut output = String::new();

    output.push_str("## Uncompleted\n\n");
    output.push_str(&render_task_list(&open, false));
    output.push_str("\n## Completed\n\n");
    output.push_str(&render_task_list(&done, false));

    if !done.is_empty() {
        output.push_str("\nRun `daylist clear` to delete all completed tasks.\n");
    }

    output
}

/// Tasks dated after today, with their dates
pub fn render_future(tasks: &[Task], today: NaiveDate) -> String {
    let futures = future_tasks(tasks, today);
    if futures.is_empty() {
        return "No future tasks.\n".to_string();
    }

    let mut output = String::from("# Future\n\n");
    output.push_str(&render_task_list(&futures, true));
    output
}
