use std::collections::HashSet;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::debug;
use smarttask_shared::{
    NewTask, Storage, StorageError, StoreWarning, SuggestError, Task, TaskStore,
};
use uuid::Uuid;

pub const FIELD_LABELS: [&str; 3] = ["Title", "Description", "Due date (YYYY-MM-DD)"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub level: Level,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct TaskForm {
    /// `None` while adding a new task.
    pub editing: Option<Uuid>,
    pub fields: [String; 3],
    pub focus: usize,
}

impl TaskForm {
    fn for_task(task: &Task) -> Self {
        Self {
            editing: Some(task.id),
            fields: [
                task.title.clone(),
                task.description.clone(),
                task.due_date.clone(),
            ],
            focus: 0,
        }
    }
}

#[derive(Debug)]
pub enum Mode {
    Normal,
    Form(TaskForm),
}

/// A suggestion request for the event loop to run off the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestJob {
    pub id: Uuid,
    pub title: String,
}

pub struct App<S> {
    store: TaskStore<S>,
    pub selected: usize,
    pub mode: Mode,
    pub status: Option<StatusLine>,
    in_flight: HashSet<Uuid>,
    pub should_quit: bool,
}

impl<S: Storage> App<S> {
    pub fn new(store: TaskStore<S>, warning: Option<StoreWarning>) -> Self {
        let mut app = Self {
            store,
            selected: 0,
            mode: Mode::Normal,
            status: None,
            in_flight: HashSet::new(),
            should_quit: false,
        };
        if let Some(warning) = warning {
            app.set_status(Level::Warning, warning.to_string());
        }
        app
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.store.tasks().get(self.selected)
    }

    pub fn is_suggesting(&self, id: Uuid) -> bool {
        self.in_flight.contains(&id)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<SuggestJob> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('c') {
                self.should_quit = true;
            }
            return None;
        }
        match self.mode {
            Mode::Normal => self.handle_normal_key(key),
            Mode::Form(_) => {
                self.handle_form_key(key);
                None
            }
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) -> Option<SuggestJob> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.tasks().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('a') => self.mode = Mode::Form(TaskForm::default()),
            KeyCode::Char('e') => {
                if let Some(task) = self.selected_task() {
                    self.mode = Mode::Form(TaskForm::for_task(task));
                }
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_selected(),
            KeyCode::Char('d') => self.delete_selected(),
            KeyCode::Char('s') => return self.start_suggestion(),
            _ => {}
        }
        None
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Mode::Form(form) = &mut self.mode else {
            return;
        };
        match key.code {
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Tab | KeyCode::Down => form.focus = (form.focus + 1) % FIELD_LABELS.len(),
            KeyCode::BackTab | KeyCode::Up => {
                form.focus = (form.focus + FIELD_LABELS.len() - 1) % FIELD_LABELS.len()
            }
            KeyCode::Enter if form.focus + 1 < FIELD_LABELS.len() => form.focus += 1,
            KeyCode::Enter => self.submit_form(),
            KeyCode::Backspace => {
                form.fields[form.focus].pop();
            }
            KeyCode::Char(c) => form.fields[form.focus].push(c),
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        let Mode::Form(form) = std::mem::replace(&mut self.mode, Mode::Normal) else {
            return;
        };
        let [title, description, due_date] = &form.fields;

        let editing = form.editing;
        match editing {
            None => match NewTask::new(title, description, due_date) {
                Ok(new_task) => {
                    let result = self.store.create(new_task);
                    self.selected = self.tasks().len().saturating_sub(1);
                    self.report(result.map(|_| ()), "Task added.");
                }
                Err(e) => {
                    self.set_status(Level::Error, format!("All fields are required ({e})."));
                    self.mode = Mode::Form(form);
                }
            },
            Some(id) => {
                let Some(task) = self.store.get(id) else {
                    return;
                };
                let edited = task.edited(title, description, due_date);
                let result = self.store.update(edited);
                self.report(result, "Task updated successfully.");
            }
        }
    }

    fn toggle_selected(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        let id = task.id;
        let next = task.status.toggled();
        let result = self.store.toggle_status(id);
        self.report(result, &format!("Task marked as {}.", next.as_str()));
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id) else {
            return;
        };
        let result = self.store.delete(id);
        if self.selected >= self.tasks().len() {
            self.selected = self.tasks().len().saturating_sub(1);
        }
        self.report(result, "Task deleted.");
    }

    fn start_suggestion(&mut self) -> Option<SuggestJob> {
        let task = self.selected_task()?;
        if !task.subtasks.is_empty() {
            self.set_status(Level::Info, "Task already has subtasks.".to_string());
            return None;
        }
        if self.in_flight.contains(&task.id) {
            return None;
        }
        let job = SuggestJob {
            id: task.id,
            title: task.title.clone(),
        };
        self.in_flight.insert(job.id);
        self.set_status(Level::Info, "Suggesting subtasks...".to_string());
        Some(job)
    }

    /// Applies a finished suggestion. Results for tasks that were deleted or
    /// already got subtasks in the meantime are dropped.
    pub fn finish_suggestion(&mut self, id: Uuid, outcome: Result<Vec<String>, SuggestError>) {
        self.in_flight.remove(&id);
        match outcome {
            Ok(subtasks) => {
                let Some(task) = self.store.get(id).filter(|t| t.subtasks.is_empty()) else {
                    debug!("Discarding stale suggestions for {}", id);
                    return;
                };
                let mut task = task.clone();
                task.subtasks = subtasks;
                let result = self.store.update(task);
                self.report(result, "Subtasks suggested!");
            }
            Err(SuggestError::EmptyResult) => {
                self.set_status(Level::Info, "No subtasks suggested.".to_string())
            }
            Err(SuggestError::Upstream { message, .. }) => self.set_status(Level::Error, message),
            Err(SuggestError::InvalidInput) => self.set_status(
                Level::Error,
                "A task title is required to suggest subtasks.".to_string(),
            ),
            Err(SuggestError::Transport(_)) => self.set_status(
                Level::Error,
                "Failed to get subtask suggestions. Is the server running?".to_string(),
            ),
        }
    }

    fn report(&mut self, result: Result<(), StorageError>, success: &str) {
        match result {
            Ok(()) => self.set_status(Level::Info, success.to_string()),
            Err(e) => self.set_status(Level::Warning, format!("Change not saved to disk: {e}")),
        }
    }

    fn set_status(&mut self, level: Level, text: String) {
        self.status = Some(StatusLine { level, text });
    }
}
