use crate::history::model::RequestRecord;
use crate::history::printer::display_path;
use crate::history::store::HistoryStore;
use crate::{ReprobeError, Result};
use inquire::Select;

/// Selection strategy for history records
pub enum SelectionStrategy {
    Interactive,
    Latest,
    ById(u64),
}

/// Select a record from the current snapshot based on the given strategy
pub fn select_record(
    store: &HistoryStore,
    strategy: SelectionStrategy,
) -> Result<Option<RequestRecord>> {
    match strategy {
        SelectionStrategy::Interactive => select_interactive(store),
        SelectionStrategy::Latest => Ok(store.snapshot().into_iter().next()),
        SelectionStrategy::ById(id) => Ok(store.get(id)),
    }
}

/// Interactively select one record using a TUI
fn select_interactive(store: &HistoryStore) -> Result<Option<RequestRecord>> {
    let records = store.snapshot();
    if records.is_empty() {
        return Ok(None);
    }

    #[derive(Clone)]
    struct RecordWrapper {
        index: usize,
        display: String,
    }

    impl std::fmt::Display for RecordWrapper {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.display)
        }
    }

    let options: Vec<RecordWrapper> = records
        .iter()
        .enumerate()
        .map(|(index, r)| RecordWrapper {
            index,
            display: format_record_for_display(r),
        })
        .collect();

    let selected = Select::new("Select a request to replay:", options)
        .with_page_size(15)
        .with_help_message("Enter to select, type to filter")
        .prompt()
        .map_err(|e| ReprobeError::Other(format!("Interaction canceled or failed: {}", e)))?;

    Ok(records.into_iter().nth(selected.index))
}

fn format_record_for_display(r: &RequestRecord) -> String {
    let time = r.timestamp().format("%H:%M:%S");
    let id = r.id();
    let method = &r.method;
    let path = display_path(&r.url);
    format!("#{id} {method} {path} ({time})")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::model::NewRecord;

    #[test]
    fn test_format_display() {
        let store = HistoryStore::new();
        store.insert(NewRecord::new("GET", "https://example.com/a?b=1"));
        let record = store.snapshot().remove(0);
        assert!(format_record_for_display(&record).starts_with("#1 GET /a?b=1 ("));
    }

    #[test]
    fn test_select_latest_and_by_id() {
        let store = HistoryStore::new();
        store.insert(NewRecord::new("GET", "u1"));
        store.insert(NewRecord::new("GET", "u2"));

        let latest = select_record(&store, SelectionStrategy::Latest).unwrap().unwrap();
        assert_eq!(latest.url, "u2");

        let first = select_record(&store, SelectionStrategy::ById(1)).unwrap().unwrap();
        assert_eq!(first.url, "u1");

        assert!(select_record(&store, SelectionStrategy::ById(9)).unwrap().is_none());
    }

    #[test]
    fn test_select_from_empty_store() {
        let store = HistoryStore::new();
        assert!(select_record(&store, SelectionStrategy::Latest).unwrap().is_none());
        assert!(select_record(&store, SelectionStrategy::Interactive).unwrap().is_none());
    }
}
