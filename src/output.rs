use crate::model::{format_deadline, Task};
use crate::project::{DueStatus, Projected};

fn due_marker(due: DueStatus) -> &'static str {
    match due {
        DueStatus::Overdue => " !",
        DueStatus::DueToday => " ~",
        DueStatus::Normal => "",
    }
}

pub fn format_task_list(rows: &[Projected]) -> String {
    let mut out = String::new();
    for row in rows {
        let task = row.task;
        let deadline = task
            .deadline
            .as_ref()
            .map(format_deadline)
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{} {}  {}{}  {}/{}  {}\n",
            task.icon(),
            task.id,
            deadline,
            due_marker(row.due),
            task.priority,
            task.category,
            task.text
        ));
    }
    out
}

pub fn format_task_detail(task: &Task, due: DueStatus) -> String {
    let mut out = String::new();
    out.push_str(&format!("Id:        {}\n", task.id));
    out.push_str(&format!("Text:      {}\n", task.text));
    out.push_str(&format!(
        "Done:      {}\n",
        if task.done { "yes" } else { "no" }
    ));
    match task.deadline {
        Some(ref d) => {
            out.push_str(&format!(
                "Deadline:  {}{}\n",
                format_deadline(d),
                match due {
                    DueStatus::Overdue => " (overdue)",
                    DueStatus::DueToday => " (due today)",
                    DueStatus::Normal => "",
                }
            ));
        }
        None => out.push_str("Deadline:  -\n"),
    }
    out.push_str(&format!("Priority:  {}\n", task.priority));
    out.push_str(&format!("Category:  {}\n", task.category));
    out.push_str(&format!(
        "Reminded:  {}\n",
        if task.reminded_at { "yes" } else { "no" }
    ));
    out
}
