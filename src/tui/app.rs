use ratatui::widgets::TableState;

use crate::manager::TaskManager;
use crate::models::{parse_day, Priority, Task, TaskDetails, TaskStatus};

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

pub enum InputField {
    None,
    Name,
    Due,
    Priority,
    Category,
    Search,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub name: String,
    pub due: Option<String>,
    pub priority: Option<Priority>,
    pub step: usize, // 0: Name, 1: Due, 2: Priority, 3: Category
}

pub struct App {
    manager: TaskManager,
    pub visible: Vec<Task>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<String>,
    pub search: String,
    pub hide_done: bool,
    pub add_state: AddState,
}

impl App {
    /// Creates a new App instance and loads the task list.
    pub fn new() -> App {
        let mut app = App {
            manager: TaskManager::open(),
            visible: Vec::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            search: String::new(),
            hide_done: false,
            add_state: AddState::default(),
        };
        app.reload();
        app
    }

    /// Refreshes the visible list from the manager: search filter, done
    /// filter, then dated tasks first by due day.
    pub fn reload(&mut self) {
        let mut tasks = self.manager.filter(&self.search, None, None);
        if self.hide_done {
            tasks.retain(|t| t.status != TaskStatus::Done);
        }
        tasks.sort_by_key(|t| (t.due_day().is_none(), t.due_day()));
        self.visible = tasks;

        if self.visible.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.visible.len() {
                self.state.select(Some(self.visible.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Selects the next task in the list.
    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= self.visible.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous task in the list.
    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    self.visible.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn selected_id(&self) -> Option<String> {
        self.state
            .selected()
            .and_then(|i| self.visible.get(i))
            .map(|t| t.id.clone())
    }

    /// Advances the selected task's status one step in the cycle.
    pub fn cycle_status_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            if let Some(task) = self.manager.get(&id) {
                let next = task.status.next();
                self.manager.set_status(&id, next);
                self.reload();
            }
        }
    }

    /// Deletes the selected task.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.manager.remove(&id);
            self.reload();
        }
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Initiates editing of a specific field for the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        let Some(id) = self.selected_id() else {
            return;
        };
        let Some(task) = self.manager.get(&id) else {
            return;
        };
        self.input_buffer = match field {
            InputField::Name => task.name.clone(),
            InputField::Due => task.details.due_date.clone().unwrap_or_default(),
            InputField::Priority => task
                .details
                .priority
                .map(|p| p.as_str().to_string())
                .unwrap_or_default(),
            InputField::Category => task.details.category.clone().unwrap_or_default(),
            _ => String::new(),
        };
        self.target_id = Some(id);
        self.input_mode = InputMode::Editing;
        self.input_field = field;
    }

    /// Initiates editing the search filter.
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Editing;
        self.input_field = InputField::Search;
        self.input_buffer = self.search.clone();
        self.target_id = None;
    }

    /// Toggles the visibility of done tasks.
    pub fn toggle_done_hidden(&mut self) {
        self.hide_done = !self.hide_done;
        self.reload();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            _ => {}
        }
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                // Name (required)
                if !self.input_buffer.is_empty() {
                    self.add_state.name = self.input_buffer.clone();
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => {
                // Due (optional, must parse when given)
                if self.input_buffer.is_empty() {
                    self.add_state.due = None;
                    self.add_state.step += 1;
                } else if parse_day(&self.input_buffer).is_some() {
                    self.add_state.due = Some(self.input_buffer.clone());
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            2 => {
                // Priority (optional)
                if self.input_buffer.is_empty() {
                    self.add_state.priority = None;
                    self.add_state.step += 1;
                } else if let Some(p) = Priority::parse(&self.input_buffer) {
                    self.add_state.priority = Some(p);
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            3 => {
                // Category (optional), then finish
                let category = if self.input_buffer.is_empty() {
                    None
                } else {
                    Some(self.input_buffer.clone())
                };
                self.manager.add(
                    self.add_state.name.clone(),
                    TaskDetails {
                        due_date: self.add_state.due.clone(),
                        priority: self.add_state.priority,
                        category,
                        ..TaskDetails::default()
                    },
                );
                self.input_mode = InputMode::Normal;
                self.input_buffer.clear();
                self.reload();
            }
            _ => {}
        }
    }

    /// Handles input for the single-field edit mode.
    fn handle_editing_input(&mut self) {
        match self.input_field {
            InputField::Search => {
                self.search = self.input_buffer.clone();
            }
            InputField::Name | InputField::Due | InputField::Priority | InputField::Category => {
                let Some(id) = self.target_id.clone() else {
                    return;
                };
                let Some(task) = self.manager.get(&id).cloned() else {
                    return;
                };
                let mut updated = task;
                match self.input_field {
                    InputField::Name => {
                        if self.input_buffer.is_empty() {
                            return;
                        }
                        updated.name = self.input_buffer.clone();
                    }
                    InputField::Due => {
                        if self.input_buffer.is_empty() {
                            updated.details.due_date = None;
                        } else if parse_day(&self.input_buffer).is_some() {
                            updated.details.due_date = Some(self.input_buffer.clone());
                        } else {
                            return;
                        }
                    }
                    InputField::Priority => {
                        if self.input_buffer.is_empty() {
                            updated.details.priority = None;
                        } else if let Some(p) = Priority::parse(&self.input_buffer) {
                            updated.details.priority = Some(p);
                        } else {
                            return;
                        }
                    }
                    InputField::Category => {
                        updated.details.category = if self.input_buffer.is_empty() {
                            None
                        } else {
                            Some(self.input_buffer.clone())
                        };
                    }
                    _ => {}
                }
                self.manager.update(updated);
            }
            InputField::None => {}
        }
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
        self.reload();
    }
}
