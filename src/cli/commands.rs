use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("tasklist v", env!("CARGO_PKG_VERSION"), " - due dates with live countdowns"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Storage file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<String>,

    /// Config file (default: $XDG_CONFIG_HOME/tasklist/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List tasks, optionally filtered
    List(ListArgs),
    /// Show one task with its subtasks
    Show(IdArg),
    /// Toggle a task between active and completed
    Done(IdArg),
    /// Change a task's text or due date
    Edit(EditArgs),
    /// Delete a task
    Rm(IdArg),
    /// Manage a task's subtasks
    Sub(SubCmd),
    /// Print a task's countdown
    Countdown(IdArg),
    /// Show or set the UI theme
    Theme(ThemeArgs),
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    pub text: String,
    /// Due date (e.g. 2026-10-18T14:30, 2026-10-18)
    pub due: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Filter by status (all, active, completed)
    #[arg(long)]
    pub status: Option<String>,
    /// Case-insensitive text search
    #[arg(long)]
    pub search: Option<String>,
    /// Filter by due date (all, today, nextday, overdue, nextweek, nextmonth)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: i64,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: i64,
    /// New text
    #[arg(long)]
    pub text: Option<String>,
    /// New due date
    #[arg(long)]
    pub due: Option<String>,
}

// ---------------------------------------------------------------------------
// Subtasks
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct SubCmd {
    #[command(subcommand)]
    pub action: SubAction,
}

#[derive(Subcommand)]
pub enum SubAction {
    /// Append a subtask
    Add(SubAddArgs),
    /// Check off a subtask (or uncheck with --undo)
    Check(SubCheckArgs),
    /// Change a subtask's text
    Edit(SubEditArgs),
    /// Delete a subtask; later ones move up
    Rm(SubIndexArgs),
}

#[derive(Args)]
pub struct SubAddArgs {
    /// Task ID
    pub id: i64,
    /// Subtask text
    pub text: String,
}

#[derive(Args)]
pub struct SubIndexArgs {
    /// Task ID
    pub id: i64,
    /// Subtask number (1-based)
    pub n: usize,
}

#[derive(Args)]
pub struct SubCheckArgs {
    /// Task ID
    pub id: i64,
    /// Subtask number (1-based)
    pub n: usize,
    /// Mark as not done
    #[arg(long)]
    pub undo: bool,
}

#[derive(Args)]
pub struct SubEditArgs {
    /// Task ID
    pub id: i64,
    /// Subtask number (1-based)
    pub n: usize,
    /// New text
    pub text: String,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ThemeArgs {
    /// light or dark (omit to print the current theme)
    pub mode: Option<String>,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
    /// Show entries after this timestamp (RFC 3339)
    #[arg(long)]
    pub since: Option<String>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (default: 30 days ago)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove all entries
    #[arg(long)]
    pub all: bool,
}
