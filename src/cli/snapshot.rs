//! taskdeck export/import commands.
//!
//! Export writes the whole store as one JSON document; import merges such
//! a document back in, replacing matching user records wholesale. The
//! import runs inside the locked update, so a rejected document never
//! touches the persisted store.

use std::fs;
use std::path::PathBuf;

use chrono::Local;
use tracing::info;

use crate::cli::CommonOptions;
use crate::error::Result;
use crate::lock;
use crate::output::{emit_success, HumanOutput};
use crate::snapshot::{default_export_filename, export_string, import};

#[derive(serde::Serialize)]
struct ExportReport {
    path: PathBuf,
    users: usize,
}

pub fn run_export(output: Option<PathBuf>, common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    storage.require_session()?;
    let store = storage.load_store()?;

    let path = output
        .unwrap_or_else(|| PathBuf::from(default_export_filename(Local::now().date_naive())));
    let data = export_string(&store)?;
    lock::write_atomic(&path, data.as_bytes())?;

    let report = ExportReport {
        path: path.clone(),
        users: store.usernames().count(),
    };
    info!(path = %path.display(), "exported store");

    let mut human = HumanOutput::new("taskdeck export");
    human.push_summary("path", path.display().to_string());
    human.push_summary("users", report.users.to_string());

    emit_success(common.output(), "export", &report, Some(&human))
}

pub fn run_import(file: PathBuf, common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    storage.require_session()?;

    let data = fs::read_to_string(&file)?;
    let report = storage.update_store(|store| import(store, &data))?;
    info!(
        users = report.users_merged,
        tasks = report.tasks_total,
        "imported snapshot"
    );

    let mut human = HumanOutput::new("taskdeck import");
    human.push_summary("file", file.display().to_string());
    human.push_summary("users merged", report.users_merged.to_string());
    human.push_summary("tasks total", report.tasks_total.to_string());
    human.push_next_step("taskdeck board");

    emit_success(common.output(), "import", &report, Some(&human))
}
