use chrono::Local;

use crate::model::{format_deadline, parse_deadline, Category, Priority, Task, TaskId};
use crate::project::{self, DueStatus};
use crate::store::TaskStore;

/// A projected row snapshot for display.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: TaskId,
    pub text: String,
    pub done: bool,
    pub deadline: Option<String>,
    pub priority: Priority,
    pub category: Category,
    pub due: DueStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Form,
    Search,
    Confirm,
    Message,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Deadline,
    Priority,
    Category,
}

pub struct TaskForm {
    pub editing: Option<TaskId>,
    pub text: String,
    pub deadline: String,
    pub priority: Priority,
    pub category: Category,
    pub focused: FormField,
    pub error: Option<String>,
}

impl TaskForm {
    pub fn blank() -> Self {
        Self {
            editing: None,
            text: String::new(),
            deadline: String::new(),
            priority: Priority::default(),
            category: Category::default(),
            focused: FormField::Text,
            error: None,
        }
    }

    pub fn for_task(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            text: task.text.clone(),
            deadline: task
                .deadline
                .as_ref()
                .map(format_deadline)
                .unwrap_or_default(),
            priority: task.priority,
            category: task.category,
            focused: FormField::Text,
            error: None,
        }
    }

    pub fn next_field(&mut self) {
        self.focused = match self.focused {
            FormField::Text => FormField::Deadline,
            FormField::Deadline => FormField::Priority,
            FormField::Priority => FormField::Category,
            FormField::Category => FormField::Text,
        };
    }

    pub fn prev_field(&mut self) {
        self.focused = match self.focused {
            FormField::Text => FormField::Category,
            FormField::Deadline => FormField::Text,
            FormField::Priority => FormField::Deadline,
            FormField::Category => FormField::Priority,
        };
    }

    /// Text-entry buffer for the focused field, if it has one. The priority
    /// and category fields are cycled instead of typed.
    pub fn focused_buf_mut(&mut self) -> Option<&mut String> {
        match self.focused {
            FormField::Text => Some(&mut self.text),
            FormField::Deadline => Some(&mut self.deadline),
            FormField::Priority | FormField::Category => None,
        }
    }

    pub fn cycle_forward(&mut self) {
        match self.focused {
            FormField::Priority => {
                self.priority = match self.priority {
                    Priority::High => Priority::Medium,
                    Priority::Medium => Priority::Low,
                    Priority::Low => Priority::High,
                }
            }
            FormField::Category => {
                self.category = match self.category {
                    Category::Work => Category::Personal,
                    Category::Personal => Category::College,
                    Category::College => Category::Other,
                    Category::Other => Category::Work,
                }
            }
            _ => {}
        }
    }

    pub fn cycle_back(&mut self) {
        // Three/four element rings, so going back is cycling forward the
        // remaining steps.
        match self.focused {
            FormField::Priority => {
                self.cycle_forward();
                self.cycle_forward();
            }
            FormField::Category => {
                self.cycle_forward();
                self.cycle_forward();
                self.cycle_forward();
            }
            _ => {}
        }
    }
}

pub struct App {
    pub rows: Vec<Row>,
    pub cursor: usize,
    pub search: String,
    pub mode: Mode,
    pub form: Option<TaskForm>,
    pub pending_delete: Option<(TaskId, String)>,
    pub message: Option<String>,
}

impl App {
    pub fn new(store: &TaskStore) -> Self {
        let mut app = App {
            rows: Vec::new(),
            cursor: 0,
            search: String::new(),
            mode: Mode::Normal,
            form: None,
            pending_delete: None,
            message: None,
        };
        app.refresh(store);
        app
    }

    pub fn refresh(&mut self, store: &TaskStore) {
        let now = Local::now();
        self.rows = project::project(store.tasks(), &self.search, now)
            .into_iter()
            .map(|p| Row {
                id: p.task.id,
                text: p.task.text.clone(),
                done: p.task.done,
                deadline: p.task.deadline.as_ref().map(format_deadline),
                priority: p.task.priority,
                category: p.task.category,
                due: p.due,
            })
            .collect();
        // Clamp cursor
        if !self.rows.is_empty() {
            if self.cursor >= self.rows.len() {
                self.cursor = self.rows.len() - 1;
            }
        } else {
            self.cursor = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        if !self.rows.is_empty() && self.cursor < self.rows.len() - 1 {
            self.cursor += 1;
        }
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.rows.get(self.cursor).map(|r| r.id)
    }

    pub fn enter_add_form(&mut self) {
        self.form = Some(TaskForm::blank());
        self.mode = Mode::Form;
    }

    pub fn enter_edit_form(&mut self, store: &TaskStore) {
        if let Some(task) = self.selected_id().and_then(|id| store.get(id)) {
            self.form = Some(TaskForm::for_task(task));
            self.mode = Mode::Form;
        }
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
        self.mode = Mode::Normal;
    }

    pub fn submit_form(&mut self, store: &mut TaskStore) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        let deadline = if form.deadline.trim().is_empty() {
            None
        } else {
            match parse_deadline(&form.deadline) {
                Ok(d) => Some(d),
                Err(e) => {
                    form.error = Some(e.to_string());
                    return;
                }
            }
        };
        let text = form.text.clone();
        let priority = form.priority;
        let category = form.category;
        let editing = form.editing;

        let outcome = match editing {
            Some(id) => store
                .update(id, &text, deadline, priority, category)
                .map(|_| "Task updated"),
            None => store
                .create(&text, deadline, priority, category, Local::now())
                .map(|_| "Task added"),
        };
        match outcome {
            Ok(msg) => {
                self.form = None;
                self.refresh(store);
                self.show_message(msg);
            }
            Err(e) => {
                if let Some(f) = self.form.as_mut() {
                    f.error = Some(e.to_string());
                }
            }
        }
    }

    pub fn toggle_selected(&mut self, store: &mut TaskStore) {
        if let Some(id) = self.selected_id() {
            // The id was on screen a moment ago; a concurrent removal makes
            // this a no-op.
            let _ = store.toggle_done(id);
            self.refresh(store);
        }
    }

    pub fn request_delete(&mut self) {
        if let Some(row) = self.rows.get(self.cursor) {
            self.pending_delete = Some((row.id, row.text.clone()));
            self.mode = Mode::Confirm;
        }
    }

    pub fn confirm_delete(&mut self, store: &mut TaskStore) {
        if let Some((id, _)) = self.pending_delete.take() {
            match store.delete(id) {
                Ok(()) => {
                    self.refresh(store);
                    self.show_message("Task deleted");
                }
                Err(_) => {
                    self.mode = Mode::Normal;
                    self.refresh(store);
                }
            }
        } else {
            self.mode = Mode::Normal;
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.mode = Mode::Normal;
    }

    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.mode = Mode::Message;
    }

    pub fn show_reminders(&mut self, lines: Vec<String>) {
        self.show_message(&lines.join("\n"));
    }

    pub fn dismiss_message(&mut self) {
        self.message = None;
        self.mode = Mode::Normal;
    }

    /// Popups (reminders) may only interrupt the idle list view.
    pub fn idle(&self) -> bool {
        self.mode == Mode::Normal
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Help => Mode::Normal,
            _ => Mode::Help,
        };
    }
}
