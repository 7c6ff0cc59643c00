//! taskdeck theme commands.
//!
//! The theme is a display preference persisted next to the store; it is
//! external to the core and available with or without a session.

use crate::cli::CommonOptions;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

#[derive(serde::Serialize)]
struct ThemeReport {
    theme: String,
}

pub fn run_show(common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let report = ThemeReport {
        theme: storage.read_theme(),
    };

    let mut human = HumanOutput::new(format!("taskdeck theme: {}", report.theme));
    human.push_summary("theme", report.theme.clone());

    emit_success(common.output(), "theme show", &report, Some(&human))
}

pub fn run_set(theme: String, common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    storage.write_theme(&theme)?;

    let report = ThemeReport { theme };

    let mut human = HumanOutput::new(format!("taskdeck theme set: {}", report.theme));
    human.push_summary("theme", report.theme.clone());

    emit_success(common.output(), "theme set", &report, Some(&human))
}
