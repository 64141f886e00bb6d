use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone, Utc};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::recovery::log_task_deletion;
use crate::io::storage::FileStore;
use crate::io::store_io::open_task_store;
use crate::model::config::{AppConfig, TimeZonePolicy};
use crate::model::filter::ViewFilters;
use crate::model::task::{Task, TaskId};
use crate::ops::task_store::{StoreError, TaskStore};
use crate::ops::view::{MaterializedView, ViewRow};

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::{Theme, ThemeMode};

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the search prompt; the list filters live
    Search,
    /// Two-step add prompt
    Add,
    /// Edit modal open
    Edit,
}

/// Which rows show their action strip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OpenActions {
    #[default]
    None,
    Row(TaskId),
    All,
}

impl OpenActions {
    pub fn is_open(self, id: TaskId) -> bool {
        match self {
            OpenActions::None => false,
            OpenActions::Row(open) => open == id,
            OpenActions::All => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddStep {
    Text,
    Due,
}

/// State of the add prompt: title first, then due date
#[derive(Debug, Clone)]
pub struct AddPrompt {
    pub step: AddStep,
    pub text: String,
    pub input: TextInput,
}

/// Focused part of the edit modal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Title,
    Due,
    Subtasks,
    NewSubtask,
}

impl EditField {
    pub fn next(self) -> Self {
        match self {
            EditField::Title => EditField::Due,
            EditField::Due => EditField::Subtasks,
            EditField::Subtasks => EditField::NewSubtask,
            EditField::NewSubtask => EditField::Title,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            EditField::Title => EditField::NewSubtask,
            EditField::Due => EditField::Title,
            EditField::Subtasks => EditField::Due,
            EditField::NewSubtask => EditField::Subtasks,
        }
    }
}

/// The edit modal. Title and due date are applied on save; subtask changes
/// go to the store as they are made.
#[derive(Debug, Clone)]
pub struct EditModal {
    pub task_id: TaskId,
    pub title: TextInput,
    pub due: TextInput,
    pub focus: EditField,
    pub subtask_cursor: usize,
    pub new_subtask: TextInput,
    /// Inline edit of the subtask under the cursor
    pub editing_subtask: Option<TextInput>,
}

impl EditModal {
    pub fn new(task: &Task) -> Self {
        EditModal {
            task_id: task.id,
            title: TextInput::new(&task.text),
            due: TextInput::new(&task.due_date),
            focus: EditField::Title,
            subtask_cursor: 0,
            new_subtask: TextInput::default(),
            editing_subtask: None,
        }
    }
}

/// Transient notification in the status row
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub is_error: bool,
    pub until: Instant,
}

/// Main application state
pub struct App {
    pub store: TaskStore<FileStore>,
    pub filters: ViewFilters,
    pub view: MaterializedView,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub time_zone: TimeZonePolicy,
    pub tick: Duration,
    pub toast_duration: Duration,
    pub show_key_hints: bool,
    /// Cursor index into the visible rows
    pub cursor: usize,
    /// First visible row
    pub scroll_offset: usize,
    pub open_actions: OpenActions,
    pub search_input: TextInput,
    pub add_prompt: Option<AddPrompt>,
    pub edit_modal: Option<EditModal>,
    pub toast: Option<Toast>,
    pub show_help: bool,
    config: AppConfig,
}

impl App {
    pub fn new(store: TaskStore<FileStore>, config: AppConfig) -> Self {
        let fallback: ThemeMode = config.ui.default_theme.parse().unwrap_or_default();
        let mode = ThemeMode::load(store.storage(), fallback);
        let mut app = App {
            store,
            filters: ViewFilters::default(),
            view: MaterializedView::default(),
            mode: Mode::Navigate,
            should_quit: false,
            theme: Theme::from_config(mode, &config.ui),
            time_zone: config.view.time_zone,
            tick: Duration::from_millis(config.view.tick_ms.max(1)),
            toast_duration: Duration::from_millis(config.ui.toast_ms),
            show_key_hints: config.ui.show_key_hints,
            cursor: 0,
            scroll_offset: 0,
            open_actions: OpenActions::None,
            search_input: TextInput::default(),
            add_prompt: None,
            edit_modal: None,
            toast: None,
            show_help: false,
            config,
        };
        app.refresh();
        app
    }

    // -----------------------------------------------------------------------
    // View maintenance
    // -----------------------------------------------------------------------

    /// Re-project the list at the current instant
    pub fn refresh(&mut self) {
        match self.time_zone {
            TimeZonePolicy::Local => self.refresh_at(&Local::now()),
            TimeZonePolicy::Utc => self.refresh_at(&Utc::now()),
        }
    }

    /// Re-project the list, keeping the cursor on the same task if it is
    /// still visible.
    pub fn refresh_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) {
        let selected = self.selected_id();
        self.view =
            MaterializedView::build(self.store.tasks(), &self.filters, self.store.revision(), now);
        if let Some(id) = selected
            && let Some(pos) = self.view.position(id)
        {
            self.cursor = pos;
        }
        self.clamp_cursor();
        if let OpenActions::Row(id) = self.open_actions
            && self.view.position(id).is_none()
        {
            self.open_actions = OpenActions::None;
        }
    }

    /// Re-project only when the store or the filters moved on
    pub fn sync_view(&mut self) {
        if self.view.is_stale(self.store.revision(), &self.filters) {
            self.refresh();
        }
    }

    /// Countdown-only refresh; true if any text changed
    pub fn tick_countdowns(&mut self) -> bool {
        match self.time_zone {
            TimeZonePolicy::Local => self.view.tick(&Local::now()),
            TimeZonePolicy::Utc => self.view.tick(&Utc::now()),
        }
    }

    pub fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.view.len().saturating_sub(1));
    }

    pub fn selected_row(&self) -> Option<&ViewRow> {
        self.view.rows.get(self.cursor)
    }

    pub fn selected_id(&self) -> Option<TaskId> {
        self.selected_row().map(ViewRow::id)
    }

    /// Row the task actions apply to: the one whose strip is open, else the
    /// selection
    pub fn action_row(&self) -> Option<&ViewRow> {
        if let OpenActions::Row(id) = self.open_actions
            && let Some(pos) = self.view.position(id)
        {
            return self.view.rows.get(pos);
        }
        self.selected_row()
    }

    // -----------------------------------------------------------------------
    // Notifications
    // -----------------------------------------------------------------------

    pub fn toast(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error: false,
            until: Instant::now() + self.toast_duration,
        });
    }

    pub fn toast_error(&mut self, message: impl Into<String>) {
        self.toast = Some(Toast {
            message: message.into(),
            is_error: true,
            until: Instant::now() + self.toast_duration,
        });
    }

    pub fn expire_toast(&mut self) {
        if self.toast.as_ref().is_some_and(|t| Instant::now() >= t.until) {
            self.toast = None;
        }
    }

    /// Report the outcome of a store operation. A failed write still applied
    /// the change in memory, so it gets its own message.
    pub fn report<T>(&mut self, result: Result<T, StoreError>, success: &str) -> Option<T> {
        match result {
            Ok(value) => {
                self.toast(success);
                Some(value)
            }
            Err(e) => {
                self.report_error(e);
                None
            }
        }
    }

    pub fn report_error(&mut self, error: StoreError) {
        match error {
            StoreError::PersistenceFailed(e) | StoreError::DeleteNotPersisted { source: e, .. } => {
                self.toast_error(format!("Not saved: {}", e))
            }
            StoreError::ValidationFailed(_) => self.toast_error("Please fill all fields!"),
            e => self.toast_error(e.to_string()),
        }
    }

    // -----------------------------------------------------------------------
    // Actions shared by several input modes
    // -----------------------------------------------------------------------

    pub fn toggle_selected(&mut self) {
        let Some(id) = self.action_row().map(ViewRow::id) else {
            return;
        };
        match self.store.toggle_complete(id) {
            Ok(task) if task.is_completed => self.toast("Task completed!"),
            Ok(_) => self.toast("Task set to active."),
            Err(e) => self.report_error(e),
        }
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.action_row().map(ViewRow::id) else {
            return;
        };
        let result = self.store.delete_task(id);
        let dir = self.store.storage().dir();
        match &result {
            Ok(task) => log_task_deletion(&dir, task),
            Err(e) => {
                if let Some(task) = e.deleted_task() {
                    log_task_deletion(&dir, task);
                }
            }
        }
        self.report(result, "Task deleted!");
    }

    pub fn open_edit(&mut self) {
        let Some(task) = self.action_row().map(|r| r.task.clone()) else {
            return;
        };
        self.edit_modal = Some(EditModal::new(&task));
        self.mode = Mode::Edit;
    }

    pub fn toggle_theme(&mut self) {
        let mode = self.theme.mode.toggled();
        self.theme = Theme::from_config(mode, &self.config.ui);
        if let Err(e) = mode.save(self.store.storage_mut()) {
            self.toast_error(format!("Theme not saved: {}", e));
        }
    }

    /// Flush a pending write before leaving
    pub fn finish(&mut self) {
        if self.store.has_unsaved_changes()
            && let Err(e) = self.store.save()
        {
            tracing::warn!(error = %e, "unsaved changes could not be written on exit");
        }
    }
}

/// Run the TUI application
pub fn run(config: AppConfig, storage_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_task_store(storage_path, config.storage.quota_bytes);
    tracing::info!(path = %storage_path.display(), tasks = store.len(), "starting tui");
    let mut app = App::new(store, config);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);
    app.finish();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut last_tick = Instant::now();
    loop {
        app.sync_view();
        app.expire_toast();
        terminal.draw(|frame| render::render(frame, app))?;

        let timeout = app.tick.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if last_tick.elapsed() >= app.tick {
            app.tick_countdowns();
            last_tick = Instant::now();
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
