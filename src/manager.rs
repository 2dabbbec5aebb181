use crate::ai::types::ScheduleTaskEntry;
use crate::models::{ImportantDate, Priority, Task, TaskDetails, TaskStatus};
use crate::storage::{JsonStore, IMPORTANT_DATES_FILE, TASKS_FILE};

/// In-memory task collection synchronized to its JSON store.
///
/// Every mutation triggers an immediate full re-save; there is no batching
/// or debouncing. Mutations targeting an unknown id are silent no-ops.
pub struct TaskManager {
    tasks: Vec<Task>,
    store: JsonStore<Task>,
}

impl TaskManager {
    /// Opens the default store and loads the collection.
    pub fn open() -> TaskManager {
        let store = JsonStore::open(TASKS_FILE);
        let tasks = store.load();
        TaskManager { tasks, store }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Adds a new task with a fresh id and default `todo` status,
    /// prepending it to the collection. Returns the assigned id.
    pub fn add(&mut self, name: impl Into<String>, details: TaskDetails) -> String {
        let task = Task::new(name, details);
        let id = task.id.clone();
        self.tasks.insert(0, task);
        self.persist();
        id
    }

    /// Replaces the task carrying `updated.id` with `updated`.
    pub fn update(&mut self, updated: Task) {
        if let Some(t) = self.tasks.iter_mut().find(|t| t.id == updated.id) {
            *t = updated;
            self.persist();
        }
    }

    pub fn set_status(&mut self, id: &str, status: TaskStatus) {
        if let Some(t) = self.tasks.iter_mut().find(|t| t.id == id) {
            t.status = status;
            self.persist();
        }
    }

    /// Sets a sub-task's status and persists the parent task.
    pub fn set_subtask_status(&mut self, task_id: &str, subtask_id: &str, status: TaskStatus) {
        if let Some(t) = self.tasks.iter_mut().find(|t| t.id == task_id) {
            let Some(sub_tasks) = t.details.sub_tasks.as_mut() else {
                return;
            };
            if let Some(st) = sub_tasks.iter_mut().find(|st| st.id == subtask_id) {
                st.status = status;
                self.persist();
            }
        }
    }

    pub fn remove(&mut self, id: &str) {
        let len_before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() != len_before {
            self.persist();
        }
    }

    /// Filters the collection without mutating it. See [`filter_tasks`].
    pub fn filter(
        &self,
        term: &str,
        status: Option<TaskStatus>,
        priority: Option<Priority>,
    ) -> Vec<Task> {
        filter_tasks(&self.tasks, term, status, priority)
    }

    /// Merges AI-generated schedule entries as new tasks with fresh ids.
    /// No dedup against existing tasks is performed. Returns the new ids.
    pub fn absorb_schedule(&mut self, entries: Vec<ScheduleTaskEntry>) -> Vec<String> {
        let mut ids = Vec::with_capacity(entries.len());
        for entry in entries {
            let task = Task::new(
                entry.name,
                TaskDetails {
                    description: entry.description,
                    category: entry.category,
                    ..TaskDetails::default()
                },
            );
            ids.push(task.id.clone());
            self.tasks.insert(0, task);
        }
        if !ids.is_empty() {
            self.persist();
        }
        ids
    }

    fn persist(&self) {
        self.store.save(&self.tasks);
    }
}

/// Filters a task slice into a new vector.
///
/// `term` matches case-insensitively as a substring of the name or
/// description; `status`/`priority` are exact matches when present.
pub fn filter_tasks(
    tasks: &[Task],
    term: &str,
    status: Option<TaskStatus>,
    priority: Option<Priority>,
) -> Vec<Task> {
    let needle = term.to_lowercase();
    tasks
        .iter()
        .filter(|t| {
            let matches_term = t.name.to_lowercase().contains(&needle)
                || t.details
                    .description
                    .as_ref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle));
            let matches_status = status.is_none_or(|s| t.status == s);
            let matches_priority = priority.is_none_or(|p| t.details.priority == Some(p));
            matches_term && matches_status && matches_priority
        })
        .cloned()
        .collect()
}

/// In-memory important-date collection synchronized to its JSON store.
pub struct DateBook {
    dates: Vec<ImportantDate>,
    store: JsonStore<ImportantDate>,
}

impl DateBook {
    pub fn open() -> DateBook {
        let store = JsonStore::open(IMPORTANT_DATES_FILE);
        let dates = store.load();
        DateBook { dates, store }
    }

    pub fn dates(&self) -> &[ImportantDate] {
        &self.dates
    }

    /// Appends a new marker and returns its id.
    pub fn add(&mut self, date: impl Into<String>, description: impl Into<String>) -> String {
        let marker = ImportantDate::new(date, description);
        let id = marker.id.clone();
        self.dates.push(marker);
        self.store.save(&self.dates);
        id
    }

    pub fn remove(&mut self, id: &str) {
        let len_before = self.dates.len();
        self.dates.retain(|d| d.id != id);
        if self.dates.len() != len_before {
            self.store.save(&self.dates);
        }
    }
}
