//! taskdeck task commands: new, edit, delete, move, comment, show.
//!
//! Every mutation runs as one atomic load -> mutate -> save unit and is
//! scoped by the relevance rule: a task can only be touched by the user
//! who created it or is assigned to it; anything else reports not-found.

use tracing::info;

use crate::cli::{parse_date, CommonOptions};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::store::Store;
use crate::task::{normalize_optional, Priority, Status, Task};

pub struct NewOptions {
    pub title: String,
    pub desc: String,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub assignee: Option<String>,
    pub category: Option<String>,
    pub common: CommonOptions,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub desc: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub assignee: Option<String>,
    pub category: Option<String>,
    pub common: CommonOptions,
}

#[derive(serde::Serialize)]
struct MoveReport {
    id: String,
    title: String,
    from: Status,
    to: Status,
}

/// Fetch a task the session user is allowed to touch, or report not-found.
fn visible_task(store: &Store, id: &str, username: &str) -> Result<Task> {
    let task = store.find_task(id)?;
    if !task.visible_to(username) {
        return Err(Error::TaskNotFound(id.to_string()));
    }
    Ok(task.clone())
}

fn ensure_known_assignee(store: &Store, assignee: Option<&str>) -> Result<()> {
    if let Some(name) = assignee {
        if !store.contains_user(name) {
            return Err(Error::InvalidArgument(format!("unknown assignee: {name}")));
        }
    }
    Ok(())
}

fn task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("id", task.id.clone());
    human.push_summary("title", task.title.clone());
    human.push_summary("status", task.status.to_string());
    human.push_summary("priority", task.priority.to_string());
    if let Some(date) = task.date {
        human.push_summary("due", date.to_string());
    }
    if let Some(assignee) = &task.assignee {
        human.push_summary("assignee", assignee.clone());
    }
    if let Some(category) = &task.category {
        human.push_summary("category", category.clone());
    }
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let storage = options.common.storage();
    let config = storage.load_config();
    let username = storage.require_session()?;

    let priority = match &options.priority {
        Some(raw) => Priority::parse(raw)?,
        None => Priority::parse(&config.tasks.default_priority)?,
    };
    let due = options.due.as_deref().map(parse_date).transpose()?;
    let assignee = normalize_optional(options.assignee);
    let category = normalize_optional(options.category);

    let task = storage.update_store(|store| {
        ensure_known_assignee(store, assignee.as_deref())?;

        let mut task = Task::new(options.title.clone(), username.clone());
        task.desc = options.desc.clone();
        task.priority = priority;
        task.date = due;
        task.assignee = assignee.clone();
        task.category = category.clone();
        let snapshot = task.clone();

        store.insert_task(task)?;
        store.record_activity(
            &username,
            &format!("{username} created task: \"{}\"", snapshot.title),
            config.activity.limit,
        )?;
        Ok(snapshot)
    })?;
    info!(id = %task.id, "created task");

    let mut human = HumanOutput::new(format!("taskdeck task new: {}", task.title));
    task_summary(&mut human, &task);
    human.push_next_step("taskdeck board");

    emit_success(options.common.output(), "task new", &task, Some(&human))
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let storage = options.common.storage();
    let config = storage.load_config();
    let username = storage.require_session()?;

    let priority = options.priority.as_deref().map(Priority::parse).transpose()?;
    let due = options.due.as_deref().map(parse_date).transpose()?;

    let task = storage.update_store(|store| {
        let mut task = visible_task(store, &options.id, &username)?;

        if let Some(title) = &options.title {
            task.title = title.clone();
        }
        if let Some(desc) = &options.desc {
            task.desc = desc.clone();
        }
        if let Some(priority) = priority {
            task.priority = priority;
        }
        if let Some(due) = due {
            task.date = Some(due);
        }
        if let Some(assignee) = options.assignee.clone() {
            task.assignee = normalize_optional(Some(assignee));
        }
        if let Some(category) = options.category.clone() {
            task.category = normalize_optional(Some(category));
        }
        // The dashboard stamps the editing user as creator; the owning
        // list does not change.
        task.created_by = username.clone();

        ensure_known_assignee(store, task.assignee.as_deref())?;

        let snapshot = task.clone();
        store.upsert_task(task)?;
        store.record_activity(
            &username,
            &format!("{username} updated task: \"{}\"", snapshot.title),
            config.activity.limit,
        )?;
        Ok(snapshot)
    })?;
    info!(id = %task.id, "updated task");

    let mut human = HumanOutput::new(format!("taskdeck task edit: {}", task.title));
    task_summary(&mut human, &task);

    emit_success(options.common.output(), "task edit", &task, Some(&human))
}

pub fn run_delete(id: String, common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let config = storage.load_config();
    let username = storage.require_session()?;

    let task = storage.update_store(|store| {
        visible_task(store, &id, &username)?;
        let task = store.delete_task(&id)?;
        store.record_activity(
            &username,
            &format!("{username} deleted task: \"{}\"", task.title),
            config.activity.limit,
        )?;
        Ok(task)
    })?;
    info!(id = %task.id, "deleted task");

    let mut human = HumanOutput::new(format!("taskdeck task delete: {}", task.title));
    human.push_summary("id", task.id.clone());
    human.push_summary("title", task.title.clone());

    emit_success(common.output(), "task delete", &task, Some(&human))
}

pub fn run_move(id: String, status: String, common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let config = storage.load_config();
    let username = storage.require_session()?;
    let new_status = Status::parse(&status)?;

    let report = storage.update_store(|store| {
        let task = visible_task(store, &id, &username)?;
        let (old_status, new_status) = store.move_task(&id, new_status)?;

        // Only an actual column change is worth a feed entry.
        if old_status != new_status {
            store.record_activity(
                &username,
                &format!(
                    "{username} moved task \"{}\" from {old_status} to {new_status}",
                    task.title
                ),
                config.activity.limit,
            )?;
        }

        Ok(MoveReport {
            id: id.clone(),
            title: task.title,
            from: old_status,
            to: new_status,
        })
    })?;
    info!(id = %report.id, from = %report.from, to = %report.to, "moved task");

    let mut human = HumanOutput::new(format!("taskdeck task move: {}", report.title));
    human.push_summary("id", report.id.clone());
    human.push_summary("from", report.from.to_string());
    human.push_summary("to", report.to.to_string());

    emit_success(common.output(), "task move", &report, Some(&human))
}

pub fn run_comment(id: String, text: String, common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let config = storage.load_config();
    let username = storage.require_session()?;

    let task = storage.update_store(|store| {
        visible_task(store, &id, &username)?;
        store.add_comment(&id, &username, &text)?;
        let task = store.find_task(&id)?.clone();
        store.record_activity(
            &username,
            &format!("{username} commented on task: \"{}\"", task.title),
            config.activity.limit,
        )?;
        Ok(task)
    })?;
    info!(id = %task.id, comments = task.comments.len(), "commented on task");

    let mut human = HumanOutput::new(format!("taskdeck task comment: {}", task.title));
    human.push_summary("id", task.id.clone());
    human.push_summary("comments", task.comments.len().to_string());

    emit_success(common.output(), "task comment", &task, Some(&human))
}

pub fn run_show(id: String, common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let username = storage.require_session()?;
    let store = storage.load_store()?;

    let task = visible_task(&store, &id, &username)?;

    let mut human = HumanOutput::new(format!("taskdeck task: {}", task.title));
    task_summary(&mut human, &task);
    human.push_summary("created by", task.created_by.clone());
    if !task.desc.is_empty() {
        human.push_detail(task.desc.clone());
    }
    for comment in &task.comments {
        human.push_detail(format!(
            "{} ({}): {}",
            comment.author,
            comment.timestamp.format("%Y-%m-%d %H:%M"),
            comment.text
        ));
    }

    emit_success(common.output(), "task show", &task, Some(&human))
}
