//! taskdeck stats command.
//!
//! Counts are computed over the session user's own task list, not the
//! relevance-filtered cross-user set the views show.

use chrono::Local;

use crate::cli::CommonOptions;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::stats::TaskStats;

pub fn run_stats(common: CommonOptions) -> Result<()> {
    let storage = common.storage();
    let username = storage.require_session()?;
    let store = storage.load_store()?;

    let today = Local::now().date_naive();
    let stats = TaskStats::compute(store.tasks_owned_by(&username), today);

    let mut human = HumanOutput::new(format!("taskdeck stats: {username}"));
    human.push_summary("total", stats.total.to_string());
    human.push_summary("completed", stats.completed.to_string());
    human.push_summary("pending", stats.pending.to_string());
    human.push_summary("overdue", stats.overdue.to_string());

    emit_success(common.output(), "stats", &stats, Some(&human))
}
