//! Whole-store snapshot export and import.
//!
//! The export document is exactly the serialized `users` mapping (the same
//! bytes the store persists). Import merges at the user level: an incoming
//! record replaces the live record with the same username wholesale; users
//! absent from the import are untouched. The merge is built and validated on
//! the side and only then swapped in, so a malformed document - bad JSON, a
//! broken record, or a duplicate task id introduced by the merge - leaves the
//! live store byte-identical.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::store::{Store, UsersSnapshot};

/// Serialize the whole store as a pretty-printed JSON document.
pub fn export_string(store: &Store) -> Result<String> {
    Ok(serde_json::to_string_pretty(&store.to_snapshot())?)
}

/// Default export filename: `tasks_backup_<YYYY-MM-DD>.json`.
pub fn default_export_filename(date: NaiveDate) -> String {
    format!("tasks_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Summary of an applied import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub users_merged: usize,
    pub tasks_total: usize,
}

/// Parse `data` and shallow-merge it into `store`. All-or-nothing: on any
/// error the store is left unchanged.
pub fn import(store: &mut Store, data: &str) -> Result<ImportReport> {
    let incoming: UsersSnapshot =
        serde_json::from_str(data).map_err(|err| Error::ParseError(err.to_string()))?;
    let users_merged = incoming.len();

    let mut merged = store.to_snapshot();
    for (username, record) in incoming {
        merged.insert(username, record);
    }

    let next = Store::from_snapshot(merged)?;
    let tasks_total = next.task_count();
    *store = next;

    Ok(ImportReport {
        users_merged,
        tasks_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Task;

    fn seeded_store() -> Store {
        let mut store = Store::default();
        store.register("alice", "pw1").unwrap();
        store.register("bob", "pw2").unwrap();
        store.insert_task(Task::new("Alpha", "alice")).unwrap();
        store.insert_task(Task::new("Beta", "bob")).unwrap();
        store
    }

    #[test]
    fn round_trip_is_identity() {
        let mut store = seeded_store();
        let exported = export_string(&store).unwrap();

        import(&mut store, &exported).unwrap();
        assert_eq!(export_string(&store).unwrap(), exported);
    }

    #[test]
    fn import_overwrites_matching_users_only() {
        let mut store = seeded_store();

        let mut other = Store::default();
        other.register("alice", "newpw").unwrap();
        other.insert_task(Task::new("Replacement", "alice")).unwrap();
        let incoming = export_string(&other).unwrap();

        let report = import(&mut store, &incoming).unwrap();
        assert_eq!(report.users_merged, 1);

        // alice replaced wholesale, bob untouched
        assert!(store.authenticate("alice", "newpw").is_ok());
        let alice_titles: Vec<&str> = store
            .tasks_owned_by("alice")
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(alice_titles, vec!["Replacement"]);
        assert_eq!(store.tasks_owned_by("bob").len(), 1);
    }

    #[test]
    fn malformed_input_leaves_store_unchanged() {
        let mut store = seeded_store();
        let before = export_string(&store).unwrap();

        assert!(matches!(
            import(&mut store, "{not json"),
            Err(Error::ParseError(_))
        ));
        assert_eq!(export_string(&store).unwrap(), before);
    }

    #[test]
    fn merge_introducing_duplicate_id_is_rejected_atomically() {
        let mut store = seeded_store();
        let alpha_id = store.tasks_owned_by("alice")[0].id.clone();
        let before = export_string(&store).unwrap();

        // carol's record carries a task reusing alice's id
        let mut other = Store::default();
        other.register("carol", "pw3").unwrap();
        let mut clash = Task::new("Impostor", "carol");
        clash.id = alpha_id;
        other.insert_task(clash).unwrap();
        let incoming = export_string(&other).unwrap();

        assert!(matches!(
            import(&mut store, &incoming),
            Err(Error::DuplicateTaskId(_))
        ));
        assert_eq!(export_string(&store).unwrap(), before);
    }

    #[test]
    fn export_filename_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        assert_eq!(
            default_export_filename(date),
            "tasks_backup_2026-08-29.json"
        );
    }
}
