use clap::{Args, Parser, Subcommand};
use taskflow_domain::{DueIn, SortKey, TaskPriority, TaskStatus};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "Filter, sort and move CRM tasks on a status board", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the JSON task file (or set TASKFLOW_FILE)
    #[arg(long, short, global = true, value_name = "FILE", env = "TASKFLOW_FILE")]
    pub file: Option<String>,

    /// Evaluate time windows as of this instant instead of the wall clock
    #[arg(long, global = true, value_name = "RFC3339")]
    pub now: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List matching tasks in sort order
    List(ViewArgs),
    /// Show matching tasks grouped into status columns
    Board(ViewArgs),
    /// Move a task to another status
    Move {
        id: Uuid,
        /// Target status, e.g. "In Progress" or in_progress
        status: TaskStatus,
        /// Keep the local move even if the store rejects it
        #[arg(long)]
        no_rollback: bool,
    },
}

#[derive(Args, Default)]
pub struct ViewArgs {
    /// Case-insensitive match on title, description or account name
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long, value_delimiter = ',')]
    pub status: Vec<TaskStatus>,
    #[arg(long, value_delimiter = ',')]
    pub priority: Vec<TaskPriority>,
    #[arg(long, value_delimiter = ',')]
    pub assignee: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub account: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub category: Vec<String>,
    #[arg(long, value_delimiter = ',')]
    pub tag: Vec<String>,
    /// Earliest due date (RFC 3339 or YYYY-MM-DD), inclusive
    #[arg(long)]
    pub due_from: Option<String>,
    /// Latest due date (RFC 3339 or YYYY-MM-DD), inclusive
    #[arg(long)]
    pub due_to: Option<String>,
    /// Due within a forward window, e.g. 3d, 2w, 1m
    #[arg(long)]
    pub due_in: Option<DueIn>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub min_progress: Option<u8>,
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub max_progress: Option<u8>,
    /// Only overdue tasks
    #[arg(long)]
    pub overdue: bool,
    /// Exclude completed tasks
    #[arg(long)]
    pub hide_completed: bool,
    /// Sort key, e.g. due_date, title, priority
    #[arg(long)]
    pub sort: Option<SortKey>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}
