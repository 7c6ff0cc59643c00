//! taskdeck view commands: board, list, activity, users.
//!
//! Views are read-only: load the store, query it for the session user,
//! render. With `--watch` the same pipeline re-runs on the configured
//! interval (the dashboard's periodic refresh) until interrupted or the
//! session ends. The refresh does no conflict detection; it is a plain
//! re-read of the store.

use std::time::Duration;

use crate::cli::{CommonOptions, FilterArgs};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::query::{assignees, query, Board};
use crate::storage::Storage;
use crate::task::{Status, Task};

pub struct ViewOptions {
    pub filters: FilterArgs,
    pub watch: bool,
    pub common: CommonOptions,
}

#[derive(serde::Serialize)]
struct BoardReport {
    todo: Vec<Task>,
    progress: Vec<Task>,
    done: Vec<Task>,
}

#[derive(serde::Serialize)]
struct ListReport {
    tasks: Vec<Task>,
}

#[derive(serde::Serialize)]
struct UsersReport {
    users: Vec<String>,
}

fn task_line(task: &Task) -> String {
    let mut line = format!("[{}] {}  {}", task.id, task.title, task.priority);
    if let Some(date) = task.date {
        line.push_str(&format!("  due {date}"));
    }
    if let Some(assignee) = &task.assignee {
        line.push_str(&format!("  @{assignee}"));
    }
    if let Some(category) = &task.category {
        line.push_str(&format!("  #{category}"));
    }
    line
}

fn watch_interval(storage: &Storage) -> Duration {
    Duration::from_secs(storage.load_config().refresh.interval_secs)
}

fn check_watch_flags(options: &ViewOptions) -> Result<()> {
    if options.watch && options.common.json {
        return Err(Error::InvalidArgument(
            "--watch cannot be combined with --json".to_string(),
        ));
    }
    Ok(())
}

pub fn run_board(options: ViewOptions) -> Result<()> {
    check_watch_flags(&options)?;
    let storage = options.common.storage();
    let username = storage.require_session()?;
    let filter = options.filters.clone().into_filter()?;
    let interval = watch_interval(&storage);

    loop {
        let store = storage.load_store()?;
        let board = Board::partition(query(&store, &username, &filter));

        if options.common.json {
            let report = BoardReport {
                todo: board.todo.iter().map(|t| (*t).clone()).collect(),
                progress: board.progress.iter().map(|t| (*t).clone()).collect(),
                done: board.done.iter().map(|t| (*t).clone()).collect(),
            };
            return emit_success(options.common.output(), "board", &report, None);
        }

        if !options.common.quiet {
            println!("{username}'s Task Dashboard");
            println!();
            for status in [Status::Todo, Status::Progress, Status::Done] {
                let column = board.column(status);
                println!("{} ({})", status.label(), column.len());
                for task in column {
                    println!("  {}", task_line(task));
                }
                println!();
            }
        }

        if !options.watch {
            return Ok(());
        }
        std::thread::sleep(interval);
        if storage.read_session().as_deref() != Some(username.as_str()) {
            return Ok(());
        }
    }
}

pub fn run_list(options: ViewOptions) -> Result<()> {
    check_watch_flags(&options)?;
    let storage = options.common.storage();
    let username = storage.require_session()?;
    let filter = options.filters.clone().into_filter()?;
    let interval = watch_interval(&storage);

    loop {
        let store = storage.load_store()?;
        let tasks = query(&store, &username, &filter);

        if options.common.json {
            let report = ListReport {
                tasks: tasks.iter().map(|t| (*t).clone()).collect(),
            };
            return emit_success(options.common.output(), "list", &report, None);
        }

        if !options.common.quiet {
            println!("{} task(s)", tasks.len());
            for task in &tasks {
                println!("  {} [{}]", task_line(task), task.status.label());
            }
        }

        if !options.watch {
            return Ok(());
        }
        std::thread::sleep(interval);
        if storage.read_session().as_deref() != Some(username.as_str()) {
            return Ok(());
        }
    }
}

pub fn run_activity(common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let username = storage.require_session()?;
    let store = storage.load_store()?;

    let feed = store.activity_for(&username).to_vec();

    let mut human = HumanOutput::new(format!("taskdeck activity: {username}"));
    if feed.is_empty() {
        human.push_detail("No activity yet");
    }
    for entry in &feed {
        human.push_detail(format!(
            "{}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.message
        ));
    }

    emit_success(common.output(), "activity", &feed, Some(&human))
}

pub fn run_users(common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let username = storage.require_session()?;
    let store = storage.load_store()?;

    let report = UsersReport {
        users: assignees(&store, &username),
    };

    let mut human = HumanOutput::new(format!("taskdeck users ({})", report.users.len()));
    for user in &report.users {
        human.push_detail(user.clone());
    }

    emit_success(common.output(), "users", &report, Some(&human))
}
