//! taskdeck auth commands: register, login, logout, whoami.
//!
//! A session is the persisted username in the data directory; every
//! task-facing command resolves it before touching the store.

use tracing::info;

use crate::cli::CommonOptions;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

pub struct RegisterOptions {
    pub username: String,
    pub password: String,
    pub common: CommonOptions,
}

pub struct LoginOptions {
    pub username: String,
    pub password: String,
    pub common: CommonOptions,
}

#[derive(serde::Serialize)]
struct UserReport {
    username: String,
}

#[derive(serde::Serialize)]
struct SessionReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

pub fn run_register(options: RegisterOptions) -> Result<()> {
    let storage = options.common.storage();

    storage.update_store(|store| store.register(&options.username, &options.password))?;
    info!(user = %options.username, "registered user");

    let report = UserReport {
        username: options.username.clone(),
    };

    let mut human = HumanOutput::new(format!("taskdeck register: {}", options.username));
    human.push_summary("username", options.username.clone());
    human.push_next_step(format!(
        "taskdeck login {} --password <password>",
        options.username
    ));

    emit_success(options.common.output(), "register", &report, Some(&human))
}

pub fn run_login(options: LoginOptions) -> Result<()> {
    let storage = options.common.storage();
    let config = storage.load_config();

    storage.update_store(|store| {
        store.authenticate(&options.username, &options.password)?;
        store.record_activity(
            &options.username,
            &format!("{} logged in", options.username),
            config.activity.limit,
        )
    })?;
    storage.write_session(&options.username)?;
    info!(user = %options.username, "session started");

    let report = UserReport {
        username: options.username.clone(),
    };

    let mut human = HumanOutput::new(format!("taskdeck login: {}", options.username));
    human.push_summary("username", options.username.clone());
    human.push_next_step("taskdeck board");

    emit_success(options.common.output(), "login", &report, Some(&human))
}

pub fn run_logout(common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let config = storage.load_config();
    let username = storage.require_session()?;

    storage.update_store(|store| {
        store.record_activity(
            &username,
            &format!("{username} logged out"),
            config.activity.limit,
        )
    })?;
    storage.clear_session()?;
    info!(user = %username, "session ended");

    let report = UserReport {
        username: username.clone(),
    };

    let mut human = HumanOutput::new(format!("taskdeck logout: {username}"));
    human.push_summary("username", username);

    emit_success(common.output(), "logout", &report, Some(&human))
}

pub fn run_whoami(common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let username = storage.read_session();

    let report = SessionReport {
        username: username.clone(),
    };

    let header = match &username {
        Some(name) => format!("taskdeck session: {name}"),
        None => "taskdeck session: none".to_string(),
    };

    let mut human = HumanOutput::new(header);
    match username {
        Some(name) => human.push_summary("username", name),
        None => {
            human.push_warning("no active session");
            human.push_next_step("taskdeck login <username> --password <password>");
        }
    }

    emit_success(common.output(), "whoami", &report, Some(&human))
}
