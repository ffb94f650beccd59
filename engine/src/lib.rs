//! Core engine for rota - coordinator state and action orchestration.
//!
//! This crate contains the [`App`] coordinator without TUI dependencies. The
//! coordinator is the sole owner of the in-memory task list: every task in it
//! originated from a server response (the initial bulk read, a creation
//! response, or an update response), and the list mutates only when an
//! action's completion event is applied.

use tokio::sync::mpsc;
use unicode_segmentation::UnicodeSegmentation;

pub use rota_api::TaskApi;
pub use rota_types::{Task, TaskId};

mod config;
pub use config::{ApiSection, AppSection, ConfigError, RotaConfig, UiOptions, DEFAULT_BASE_URL};


// ============================================================================
// TaskEvent - completion of one remote operation
// ============================================================================

/// Completion of a single remote operation, sent by the spawned action task
/// and applied to coordinator state in [`App::process_api_events`].
///
/// A failed operation sends no event: state stays at its last consistent
/// value and the failure is only logged.
#[derive(Debug)]
pub enum TaskEvent {
    /// Full collection read finished (initial load or a reload).
    Loaded(Vec<Task>),
    /// Creation finished; the record carries the server-assigned id.
    Created(Task),
    /// Update finished; replaces the matching element wholesale.
    Updated(Task),
    /// Deletion confirmed by the server.
    Deleted(TaskId),
}

/// Whole-list synchronization phase.
///
/// Entered once: `Loading -> Ready` when the initial read completes. `Ready`
/// is the only steady state; later actions expose no in-flight phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    #[default]
    Loading,
    Ready,
}

/// Input mode for the application.
///
/// `Normal` navigates the list; `Insert` edits the draft title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Insert,
}

// ============================================================================
// DraftInput - the in-progress task title
// ============================================================================

/// Single-line text input with a grapheme-aware cursor.
#[derive(Debug, Default)]
pub struct DraftInput {
    text: String,
    cursor: usize,
}

impl DraftInput {
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in graphemes.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Text before the cursor; the view measures this to place the terminal
    /// cursor.
    #[must_use]
    pub fn text_before_cursor(&self) -> &str {
        &self.text[..self.byte_index()]
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn enter_char(&mut self, new_char: char) {
        let index = self.byte_index();
        self.text.insert(index, new_char);
        self.move_cursor_right();
    }

    pub fn delete_char(&mut self) {
        if self.cursor == 0 {
            return;
        }

        let start = self.byte_index_at(self.cursor - 1);
        let end = self.byte_index_at(self.cursor);
        self.text.replace_range(start..end, "");
        self.move_cursor_left();
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor >= self.grapheme_count() {
            return;
        }

        let start = self.byte_index_at(self.cursor);
        let end = self.byte_index_at(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    pub fn delete_word_backwards(&mut self) {
        while self.cursor > 0 && self.grapheme_is_whitespace(self.cursor - 1) {
            self.delete_char();
        }
        while self.cursor > 0 && !self.grapheme_is_whitespace(self.cursor - 1) {
            self.delete_char();
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = self.clamp_cursor(self.cursor.saturating_add(1));
    }

    pub fn move_cursor_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.grapheme_count();
    }

    fn grapheme_count(&self) -> usize {
        self.text.graphemes(true).count()
    }

    fn grapheme_is_whitespace(&self, index: usize) -> bool {
        self.text
            .graphemes(true)
            .nth(index)
            .is_some_and(|grapheme| grapheme.chars().all(char::is_whitespace))
    }

    fn byte_index(&self) -> usize {
        self.byte_index_at(self.cursor)
    }

    fn byte_index_at(&self, grapheme_index: usize) -> usize {
        self.text
            .grapheme_indices(true)
            .nth(grapheme_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn clamp_cursor(&self, new_cursor_pos: usize) -> usize {
        new_cursor_pos.min(self.grapheme_count())
    }
}

// ============================================================================
// App - the coordinator
// ============================================================================

/// Coordinator between user intent and the remote collection.
///
/// Constructed once at startup and explicitly owned by the binary; the
/// network is first touched by [`App::start`]. Each user action spawns one
/// task performing exactly one remote call; completions funnel through an
/// unbounded channel and are applied on the next frame by
/// [`App::process_api_events`].
///
/// Overlapping actions are deliberately unsynchronized: each completion
/// carries its own captured task or id, and a completion whose target row is
/// already gone (a toggle landing after a delete) finds no matching id and
/// leaves the list unchanged.
#[derive(Debug)]
pub struct App {
    api: TaskApi,
    tasks: Vec<Task>,
    phase: SyncPhase,
    selected: usize,
    draft: DraftInput,
    input_mode: InputMode,
    options: UiOptions,
    events_tx: mpsc::UnboundedSender<TaskEvent>,
    events_rx: mpsc::UnboundedReceiver<TaskEvent>,
}

impl App {
    #[must_use]
    pub fn new(api: TaskApi, options: UiOptions) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            api,
            tasks: Vec::new(),
            phase: SyncPhase::Loading,
            selected: 0,
            draft: DraftInput::default(),
            input_mode: InputMode::default(),
            options,
            events_tx,
            events_rx,
        }
    }

    /// Kicks off the initial collection read. Call once, after construction.
    pub fn start(&self) {
        self.spawn_fetch_all();
    }

    /// Re-reads the whole collection. The current list stays visible until
    /// the read completes.
    pub fn reload(&self) {
        self.spawn_fetch_all();
    }

    /// Submits the draft as a new task.
    ///
    /// An empty (or whitespace-only) draft is a no-op: no network call, no
    /// event, no cleared input.
    pub fn add_task(&mut self) {
        let title = self.draft.text().trim().to_string();
        if title.is_empty() {
            return;
        }

        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match api.create(&title).await {
                Ok(task) => {
                    let _ = tx.send(TaskEvent::Created(task));
                }
                Err(e) => tracing::warn!(error = %e, "create failed"),
            }
        });
    }

    /// Flips `completed` on the given task via a full-replace update.
    ///
    /// The task is captured as-is; when the server's record arrives it
    /// replaces the element with the same id, or nothing if that id has
    /// since been deleted.
    pub fn toggle_task(&self, task: &Task) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        let id = task.id;
        let title = task.title.clone();
        let completed = !task.completed;
        tokio::spawn(async move {
            match api.update(id, &title, completed).await {
                Ok(task) => {
                    let _ = tx.send(TaskEvent::Updated(task));
                }
                Err(e) => tracing::warn!(error = %e, %id, "update failed"),
            }
        });
    }

    /// Deletes the task with the given id; the row disappears only after the
    /// server confirms.
    pub fn delete_task(&self, id: TaskId) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match api.remove(id).await {
                Ok(()) => {
                    let _ = tx.send(TaskEvent::Deleted(id));
                }
                Err(e) => tracing::warn!(error = %e, %id, "delete failed"),
            }
        });
    }

    /// Toggles the task under the selection cursor, if any.
    pub fn toggle_selected(&self) {
        if let Some(task) = self.selected_task() {
            self.toggle_task(task);
        }
    }

    /// Deletes the task under the selection cursor, if any.
    pub fn delete_selected(&self) {
        if let Some(task) = self.selected_task() {
            self.delete_task(task.id);
        }
    }

    /// Drains pending completion events and applies them to the list.
    ///
    /// Non-blocking; called once per frame by the binary. Events apply in
    /// arrival order, one at a time.
    pub fn process_api_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: TaskEvent) {
        match event {
            TaskEvent::Loaded(tasks) => {
                self.tasks = tasks;
                self.phase = SyncPhase::Ready;
            }
            TaskEvent::Created(task) => {
                self.tasks.push(task);
                self.draft.clear();
            }
            TaskEvent::Updated(task) => {
                if let Some(slot) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *slot = task;
                }
            }
            TaskEvent::Deleted(id) => {
                self.tasks.retain(|t| t.id != id);
            }
        }
        self.clamp_selection();
    }

    fn spawn_fetch_all(&self) {
        let api = self.api.clone();
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            match api.fetch_all().await {
                Ok(tasks) => {
                    let _ = tx.send(TaskEvent::Loaded(tasks));
                }
                Err(e) => tracing::warn!(error = %e, "collection read failed"),
            }
        });
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.tasks.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    #[must_use]
    pub fn selected(&self) -> usize {
        self.selected
    }

    #[must_use]
    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.tasks.len().saturating_sub(1));
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    #[must_use]
    pub fn draft(&self) -> &DraftInput {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DraftInput {
        &mut self.draft
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    #[must_use]
    pub fn options(&self) -> UiOptions {
        self.options
    }
}
