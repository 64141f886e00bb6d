mod recovery;
pub use recovery::cmd_recovery;

use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io::{self, ConfigError};
use crate::io::recovery::log_task_deletion;
use crate::io::storage::{FileStore, KeyValueStore};
use crate::io::store_io::open_task_store;
use crate::model::config::AppConfig;
use crate::model::filter::{DetailFilter, StatusFilter, ViewFilters};
use crate::model::task::{Task, TaskId};
use crate::ops::task_store::{StoreError, TaskStore};
use crate::ops::view::{self, ViewRow};
use crate::tui::theme::ThemeMode;

/// Resolved settings every command runs with
pub struct Context {
    pub config: AppConfig,
    pub storage_path: PathBuf,
    pub json: bool,
}

impl Context {
    pub fn new(cli: &Cli) -> Result<Self, ConfigError> {
        let config = load_config(cli.config.as_deref())?;
        let storage_path =
            config_io::resolve_storage_path(&config, cli.store.as_deref().map(Path::new));
        Ok(Context {
            config,
            storage_path,
            json: cli.json,
        })
    }

    fn open_store(&self) -> TaskStore<FileStore> {
        open_task_store(&self.storage_path, self.config.storage.quota_bytes)
    }

    /// Directory holding the storage file and its recovery log
    pub fn data_dir(&self) -> PathBuf {
        match self.storage_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// Read the config from `--config`, else the default location
pub fn load_config(path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let path = path
        .map(PathBuf::from)
        .unwrap_or_else(config_io::default_config_path);
    config_io::read_config(&path)
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(command: Commands, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        // Read commands
        Commands::List(args) => cmd_list(args, ctx),
        Commands::Show(args) => cmd_show(args, ctx),
        Commands::Countdown(args) => cmd_countdown(args, ctx),

        // Write commands
        Commands::Add(args) => cmd_add(args, ctx),
        Commands::Done(args) => cmd_done(args, ctx),
        Commands::Edit(args) => cmd_edit(args, ctx),
        Commands::Rm(args) => cmd_rm(args, ctx),
        Commands::Sub(args) => cmd_sub(args, ctx),

        // UI settings and maintenance
        Commands::Theme(args) => cmd_theme(args, ctx),
        Commands::Recovery(args) => cmd_recovery(args, ctx),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_filters(args: &ListArgs) -> Result<ViewFilters, Box<dyn std::error::Error>> {
    let status = args
        .status
        .as_deref()
        .map(str::parse::<StatusFilter>)
        .transpose()?
        .unwrap_or_default();
    let detail = args
        .due
        .as_deref()
        .map(str::parse::<DetailFilter>)
        .transpose()?
        .unwrap_or_default();
    Ok(ViewFilters {
        status,
        search: args.search.clone().unwrap_or_default(),
        detail,
    })
}

/// Project a single task as an unfiltered row
fn single_row(task: &Task, ctx: &Context) -> ViewRow {
    let mut rows = view::project_now(
        std::slice::from_ref(task),
        &ViewFilters::default(),
        ctx.config.view.time_zone,
    );
    rows.remove(0)
}

fn find_task<S: KeyValueStore>(store: &TaskStore<S>, id: TaskId) -> Result<&Task, StoreError> {
    store.get(id).ok_or(StoreError::NotFound(id))
}

/// Convert a 1-based subtask number to a position, checking bounds
fn subtask_index(
    store: &TaskStore<FileStore>,
    id: TaskId,
    n: usize,
) -> Result<usize, Box<dyn std::error::Error>> {
    let len = find_task(store, id)?.subtasks.len();
    if n == 0 || n > len {
        return Err(format!(
            "subtask {} out of range: task {} has {} subtasks",
            n, id, len
        )
        .into());
    }
    Ok(n - 1)
}

fn print_task(task: &Task, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let row = single_row(task, ctx);
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&row_to_json(&row))?);
    } else {
        for line in format_task_detail(&row) {
            println!("{}", line);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let filters = parse_filters(&args)?;
    let store = ctx.open_store();
    let rows = view::project_now(store.tasks(), &filters, ctx.config.view.time_zone);

    if ctx.json {
        let json: Vec<_> = rows.iter().map(row_to_json).collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        for line in format_listing(&rows) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_show(args: IdArg, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store();
    let task = find_task(&store, args.id)?;
    print_task(task, ctx)
}

fn cmd_countdown(args: IdArg, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let store = ctx.open_store();
    let row = single_row(find_task(&store, args.id)?, ctx);
    if ctx.json {
        let json = CountdownJson {
            id: args.id,
            countdown: &row.countdown,
        };
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        println!("{}", row.countdown);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ctx.open_store();
    let task = store.add_task(&args.text, &args.due)?;
    if ctx.json {
        print_task(&task, ctx)
    } else {
        println!("{}", task.id);
        Ok(())
    }
}

fn cmd_done(args: IdArg, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ctx.open_store();
    let task = store.toggle_complete(args.id)?;
    if ctx.json {
        return print_task(&task, ctx);
    }
    let status = if task.is_completed { "completed" } else { "active" };
    println!("{} {}", task.id, status);
    Ok(())
}

fn cmd_edit(args: EditArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    if args.text.is_none() && args.due.is_none() {
        return Err("nothing to change: pass --text and/or --due".into());
    }
    let mut store = ctx.open_store();
    let current = find_task(&store, args.id)?;
    let text = args.text.unwrap_or_else(|| current.text.clone());
    let due = args.due.unwrap_or_else(|| current.due_date.clone());
    let task = store.update_task(args.id, &text, &due)?;
    print_task(&task, ctx)
}

fn cmd_rm(args: IdArg, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ctx.open_store();
    let task = match store.delete_task(args.id) {
        Ok(task) => task,
        Err(e) => {
            if let Some(task) = e.deleted_task() {
                log_task_deletion(&ctx.data_dir(), task);
            }
            return Err(e.into());
        }
    };
    log_task_deletion(&ctx.data_dir(), &task);
    if ctx.json {
        println!("{}", serde_json::json!({ "deleted": task.id }));
    } else {
        println!("deleted {}", task.id);
    }
    Ok(())
}

fn cmd_sub(args: SubCmd, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = ctx.open_store();
    let task = match args.action {
        SubAction::Add(a) => store.add_subtask(a.id, &a.text)?,
        SubAction::Check(a) => {
            let index = subtask_index(&store, a.id, a.n)?;
            store.toggle_subtask(a.id, index, !a.undo)?
        }
        SubAction::Edit(a) => {
            let index = subtask_index(&store, a.id, a.n)?;
            store.edit_subtask(a.id, index, &a.text)?
        }
        SubAction::Rm(a) => {
            let index = subtask_index(&store, a.id, a.n)?;
            store.delete_subtask(a.id, index)?
        }
    };
    print_task(&task, ctx)
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

fn cmd_theme(args: ThemeArgs, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    let mut storage = FileStore::open_or_recover(&ctx.storage_path, ctx.config.storage.quota_bytes);
    let fallback: ThemeMode = ctx.config.ui.default_theme.parse().unwrap_or_default();

    let mode = match args.mode {
        Some(value) => {
            let mode: ThemeMode = value.parse()?;
            mode.save(&mut storage)?;
            mode
        }
        None => ThemeMode::load(&storage, fallback),
    };

    if ctx.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ThemeJson {
                theme: mode.as_str()
            })?
        );
    } else {
        println!("{}", mode);
    }
    Ok(())
}
