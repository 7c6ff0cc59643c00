//! Command-line interface for taskdeck
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::error::{Error, Result};
use crate::query::TaskFilter;
use crate::task::Priority;

mod auth;
mod snapshot;
mod stats;
mod task;
mod theme;
mod view;

/// taskdeck - Local Task Dashboard
///
/// A CLI over one shared local store: register and log in users, manage
/// tasks on a kanban board, follow an activity feed, and back the whole
/// store up as JSON.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory holding the store (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKDECK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Filter flags shared by the board and list views
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Search term matched against title and description (case-insensitive)
    #[arg(long)]
    pub search: Option<String>,

    /// Priority filter: Low, Medium, or High
    #[arg(long)]
    pub priority: Option<String>,

    /// Assignee filter (exact username)
    #[arg(long)]
    pub assignee: Option<String>,

    /// Due date filter (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

impl FilterArgs {
    pub fn into_filter(self) -> Result<TaskFilter> {
        Ok(TaskFilter {
            search: self.search,
            priority: self.priority.as_deref().map(Priority::parse).transpose()?,
            assignee: self.assignee,
            due: self.due.as_deref().map(parse_date).transpose()?,
        })
    }
}

/// Parse a `YYYY-MM-DD` calendar date
pub(crate) fn parse_date(value: &str) -> Result<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidArgument(format!("invalid date '{value}' (expected YYYY-MM-DD)")))
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new user
    Register {
        /// Username (unique)
        username: String,

        /// Password for the new account
        #[arg(long)]
        password: String,
    },

    /// Start a session as an existing user
    Login {
        /// Username
        username: String,

        /// Account password
        #[arg(long)]
        password: String,
    },

    /// End the active session
    Logout,

    /// Show the active session user
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Kanban view: tasks grouped into To Do / In Progress / Done
    Board {
        #[command(flatten)]
        filters: FilterArgs,

        /// Re-render on an interval until interrupted or logged out
        #[arg(long)]
        watch: bool,
    },

    /// List view: one flat list of relevant tasks
    List {
        #[command(flatten)]
        filters: FilterArgs,

        /// Re-render on an interval until interrupted or logged out
        #[arg(long)]
        watch: bool,
    },

    /// Show the session user's activity feed, newest first
    Activity,

    /// Show task statistics for the session user's own list
    Stats,

    /// List other registered users (assignee candidates)
    Users,

    /// Export the whole store to a JSON file
    Export {
        /// Output path (defaults to tasks_backup_<date>.json)
        output: Option<PathBuf>,
    },

    /// Import a JSON export, overwriting matching users
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Display theme preference
    #[command(subcommand)]
    Theme(ThemeCommands),
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task
    New {
        /// Task title
        title: String,

        /// Description
        #[arg(long, default_value = "")]
        desc: String,

        /// Priority: Low, Medium, or High (default from config)
        #[arg(long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Assignee username
        #[arg(long)]
        assignee: Option<String>,

        /// Free-form category label
        #[arg(long)]
        category: Option<String>,
    },

    /// Edit a task's fields (unset flags keep current values)
    Edit {
        /// Task id
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(long)]
        desc: Option<String>,

        /// New priority
        #[arg(long)]
        priority: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// New assignee username (empty string clears)
        #[arg(long)]
        assignee: Option<String>,

        /// New category (empty string clears)
        #[arg(long)]
        category: Option<String>,
    },

    /// Delete a task
    Delete {
        /// Task id
        id: String,
    },

    /// Move a task to a kanban column: todo, progress, or done
    Move {
        /// Task id
        id: String,

        /// Target status
        status: String,
    },

    /// Comment on a task
    Comment {
        /// Task id
        id: String,

        /// Comment text
        text: String,
    },

    /// Show one task with its comments
    Show {
        /// Task id
        id: String,
    },
}

/// Theme subcommands
#[derive(Subcommand, Debug)]
pub enum ThemeCommands {
    /// Show the current theme
    Show,

    /// Set the theme: dark or light
    Set {
        /// Theme name
        theme: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let common = CommonOptions {
            data_dir: self.data_dir,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Register { username, password } => auth::run_register(auth::RegisterOptions {
                username,
                password,
                common,
            }),
            Commands::Login { username, password } => auth::run_login(auth::LoginOptions {
                username,
                password,
                common,
            }),
            Commands::Logout => auth::run_logout(common),
            Commands::Whoami => auth::run_whoami(common),
            Commands::Task(cmd) => match cmd {
                TaskCommands::New {
                    title,
                    desc,
                    priority,
                    due,
                    assignee,
                    category,
                } => task::run_new(task::NewOptions {
                    title,
                    desc,
                    priority,
                    due,
                    assignee,
                    category,
                    common,
                }),
                TaskCommands::Edit {
                    id,
                    title,
                    desc,
                    priority,
                    due,
                    assignee,
                    category,
                } => task::run_edit(task::EditOptions {
                    id,
                    title,
                    desc,
                    priority,
                    due,
                    assignee,
                    category,
                    common,
                }),
                TaskCommands::Delete { id } => task::run_delete(id, common),
                TaskCommands::Move { id, status } => task::run_move(id, status, common),
                TaskCommands::Comment { id, text } => task::run_comment(id, text, common),
                TaskCommands::Show { id } => task::run_show(id, common),
            },
            Commands::Board { filters, watch } => view::run_board(view::ViewOptions {
                filters,
                watch,
                common,
            }),
            Commands::List { filters, watch } => view::run_list(view::ViewOptions {
                filters,
                watch,
                common,
            }),
            Commands::Activity => view::run_activity(common),
            Commands::Users => view::run_users(common),
            Commands::Stats => stats::run_stats(common),
            Commands::Export { output } => snapshot::run_export(output, common),
            Commands::Import { file } => snapshot::run_import(file, common),
            Commands::Theme(cmd) => match cmd {
                ThemeCommands::Show => theme::run_show(common),
                ThemeCommands::Set { theme } => theme::run_set(theme, common),
            },
        }
    }
}

/// Flags shared by every command
#[derive(Debug, Clone)]
pub struct CommonOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl CommonOptions {
    pub(crate) fn storage(&self) -> crate::storage::Storage {
        crate::storage::Storage::resolve(self.data_dir.clone())
    }

    pub(crate) fn output(&self) -> crate::output::OutputOptions {
        crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }
}
