//! Submission list presentation.
//!
//! `SubmissionView` owns the displayed record sequence. Mutations update the
//! rows first and then persist the whole sequence through the record store, so
//! the display never waits on the remote outcome.

use std::fmt;
use std::sync::Arc;

use crate::models::Record;
use crate::store::{Persistence, RecordStore};
use crate::util::escape_html;
use crate::{Error, Result};

/// Text shown in place of rows when there are no submissions.
pub const PLACEHOLDER_TEXT: &str = "No submissions yet";

/// Position of a displayed row, zero-based from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowRef(usize);

impl RowRef {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Row from a one-based display number.
    #[must_use]
    pub fn from_display(number: usize) -> Option<Self> {
        number.checked_sub(1).map(Self)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// One rendered table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row<'a> {
    Submission(RowRef, &'a Record),
    Placeholder,
}

/// Message for assistive technology describing a change to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement(String);

impl Announcement {
    fn added(record: &Record) -> Self {
        Self(format!(
            "New submission added: {} chose {}",
            record.person_name, record.choice
        ))
    }

    fn deleted(record: &Record) -> Self {
        Self(format!(
            "Submission deleted: {} - {}",
            record.person_name, record.choice
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Outcome of a mutation: what to announce and where the list was saved.
#[derive(Debug)]
pub struct Mutation {
    pub announcement: Announcement,
    pub persistence: Persistence,
}

/// The displayed submission list.
#[derive(Debug)]
pub struct SubmissionView {
    store: Arc<RecordStore>,
    records: Vec<Record>,
}

impl SubmissionView {
    #[must_use]
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self {
            store,
            records: Vec::new(),
        }
    }

    /// Load from the store and display the result.
    pub async fn load(&mut self) -> Result<Persistence> {
        let loaded = self.store.load().await?;
        self.render(loaded.records);
        Ok(loaded.persistence)
    }

    /// Replace every displayed row.
    pub fn render(&mut self, records: Vec<Record>) {
        self.records = records;
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Rows as displayed: the records, or a single placeholder row.
    pub fn rows(&self) -> Vec<Row<'_>> {
        if self.records.is_empty() {
            return vec![Row::Placeholder];
        }
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| Row::Submission(RowRef::new(index), record))
            .collect()
    }

    /// Show `record` at the top and persist the list.
    pub async fn add_record(&mut self, record: Record) -> Result<Mutation> {
        let announcement = Announcement::added(&record);
        self.records.insert(0, record);
        let persistence = self.store.save(&self.records).await?;
        Ok(Mutation {
            announcement,
            persistence,
        })
    }

    /// Remove the record at `row` and persist the list.
    pub async fn remove_record(&mut self, row: RowRef) -> Result<Mutation> {
        if row.index() >= self.records.len() {
            return Err(Error::InvalidInput(format!(
                "Row {} does not exist ({} submissions shown)",
                row.index() + 1,
                self.records.len()
            )));
        }

        let removed = self.records.remove(row.index());
        let announcement = Announcement::deleted(&removed);
        let persistence = self.store.save(&self.records).await?;
        Ok(Mutation {
            announcement,
            persistence,
        })
    }

    /// Table-body markup for the submissions table.
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        for row in self.rows() {
            match row {
                Row::Placeholder => {
                    html.push_str(&format!(
                        "<tr><td colspan=\"4\" class=\"no-submissions\" role=\"cell\">{PLACEHOLDER_TEXT}</td></tr>\n"
                    ));
                }
                Row::Submission(row_ref, record) => {
                    let name = escape_html(&record.person_name);
                    html.push_str("<tr>\n");
                    html.push_str(&format!("  <td>{name}</td>\n"));
                    html.push_str(&format!("  <td>{}</td>\n", escape_html(&record.choice)));
                    html.push_str(&format!(
                        "  <td>{}</td>\n",
                        escape_html(&record.created_at)
                    ));
                    html.push_str(&format!(
                        "  <td><button class=\"delete-button\" data-row=\"{}\" aria-label=\"Delete submission for {name}\">🗑️ Delete</button></td>\n",
                        row_ref.index()
                    ));
                    html.push_str("</tr>\n");
                }
            }
        }
        html
    }

    /// Plain-text rows, numbered from one.
    pub fn render_lines(&self) -> Vec<String> {
        self.rows()
            .into_iter()
            .map(|row| match row {
                Row::Placeholder => PLACEHOLDER_TEXT.to_string(),
                Row::Submission(row_ref, record) => format!(
                    "{:>3}. {} | {} | {}",
                    row_ref.index() + 1,
                    record.person_name,
                    record.choice,
                    record.created_at
                ),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::{StoreConfig, DEFAULT_DOCUMENT_PATH};
    use crate::remote::MemoryContentApi;
    use crate::storage::{FallbackStore, MemoryFallbackStore};

    fn local_view() -> (SubmissionView, MemoryFallbackStore) {
        let fallback = MemoryFallbackStore::new();
        let store = RecordStore::new(StoreConfig::default(), Arc::new(fallback.clone()));
        (SubmissionView::new(Arc::new(store)), fallback)
    }

    fn remote_view() -> (SubmissionView, MemoryContentApi) {
        let api = MemoryContentApi::new();
        let store = RecordStore::with_remote(
            StoreConfig::new("ash/pallet-town", "ghp_secret"),
            Arc::new(api.clone()),
            Arc::new(MemoryFallbackStore::new()),
        );
        (SubmissionView::new(Arc::new(store)), api)
    }

    fn slot(fallback: &MemoryFallbackStore) -> Option<Vec<Record>> {
        fallback
            .read_slot("pokemonSubmissions")
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    #[tokio::test]
    async fn empty_local_store_shows_placeholder_then_first_registration() {
        let (mut view, fallback) = local_view();

        let persistence = view.load().await.unwrap();
        assert!(matches!(persistence, Persistence::LocalOnly));
        assert!(view.records().is_empty());
        assert_eq!(view.rows(), vec![Row::Placeholder]);

        let ash = Record::new("Ash Ketchum", "Pikachu", "3/7/2024, 9:05:01 PM");
        let mutation = view.add_record(ash.clone()).await.unwrap();
        assert!(matches!(mutation.persistence, Persistence::LocalOnly));
        assert_eq!(
            mutation.announcement.as_str(),
            "New submission added: Ash Ketchum chose Pikachu"
        );
        assert_eq!(view.records(), &[ash.clone()]);
        assert_eq!(slot(&fallback), Some(vec![ash]));
    }

    #[tokio::test]
    async fn new_records_are_prepended() {
        let (mut view, _) = local_view();
        let first = Record::new("Ash Ketchum", "Pikachu", "1");
        let second = Record::new("Misty Waterflower", "Starmie", "2");

        view.add_record(first.clone()).await.unwrap();
        view.add_record(second.clone()).await.unwrap();
        assert_eq!(view.records(), &[second, first]);
    }

    #[tokio::test]
    async fn removing_last_record_shows_placeholder_and_saves_empty_list() {
        let (mut view, api) = remote_view();
        view.add_record(Record::new("Ash Ketchum", "Pikachu", "1"))
            .await
            .unwrap();
        let puts_before = api.put_calls();

        let mutation = view.remove_record(RowRef::new(0)).await.unwrap();
        assert!(mutation.persistence.is_remote());
        assert_eq!(
            mutation.announcement.to_string(),
            "Submission deleted: Ash Ketchum - Pikachu"
        );
        assert_eq!(view.rows(), vec![Row::Placeholder]);
        assert_eq!(api.put_calls(), puts_before + 1);
        assert_eq!(
            api.stored_records(DEFAULT_DOCUMENT_PATH).unwrap(),
            Some(vec![])
        );
    }

    #[tokio::test]
    async fn removing_middle_row_keeps_order_and_duplicates() {
        let (mut view, fallback) = local_view();
        let ash = Record::new("Ash Ketchum", "Pikachu", "1");
        let misty = Record::new("Misty Waterflower", "Starmie", "2");
        view.render(vec![ash.clone(), misty, ash.clone()]);

        view.remove_record(RowRef::new(1)).await.unwrap();
        assert_eq!(view.records(), &[ash.clone(), ash.clone()]);
        assert_eq!(slot(&fallback), Some(vec![ash.clone(), ash]));
    }

    #[tokio::test]
    async fn removing_missing_row_is_rejected_without_saving() {
        let (mut view, fallback) = local_view();

        let err = view.remove_record(RowRef::new(0)).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(message) if message.contains("Row 1")));
        assert_eq!(slot(&fallback), None);
    }

    #[tokio::test]
    async fn load_displays_remote_order() {
        let (mut view, api) = remote_view();
        let stored = vec![
            Record::new("Brock Harrison", "Onix", "2"),
            Record::new("Ash Ketchum", "Pikachu", "1"),
        ];
        api.seed(DEFAULT_DOCUMENT_PATH, &stored).unwrap();

        assert!(view.load().await.unwrap().is_remote());
        assert_eq!(view.records(), stored.as_slice());
    }

    #[test]
    fn render_html_escapes_and_labels_rows() {
        let (mut view, _) = local_view();
        view.render(vec![Record::new(
            "<script>Team Rocket</script>",
            "Meowth & Co",
            "1/1/2025, 1:00:00 PM",
        )]);

        let html = view.render_html();
        assert!(html.contains("<td>&lt;script&gt;Team Rocket&lt;/script&gt;</td>"));
        assert!(html.contains("<td>Meowth &amp; Co</td>"));
        assert!(html.contains(
            "aria-label=\"Delete submission for &lt;script&gt;Team Rocket&lt;/script&gt;\""
        ));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn render_html_placeholder_is_a_single_row() {
        let (view, _) = local_view();
        assert_eq!(
            view.render_html(),
            "<tr><td colspan=\"4\" class=\"no-submissions\" role=\"cell\">No submissions yet</td></tr>\n"
        );
    }

    #[test]
    fn render_lines_numbers_from_one() {
        let (mut view, _) = local_view();
        assert_eq!(view.render_lines(), vec![PLACEHOLDER_TEXT.to_string()]);

        view.render(vec![Record::new("Ash Ketchum", "Pikachu", "3/7/2024, 9:05:01 PM")]);
        assert_eq!(
            view.render_lines(),
            vec!["  1. Ash Ketchum | Pikachu | 3/7/2024, 9:05:01 PM".to_string()]
        );
    }

    #[test]
    fn row_ref_from_display_is_one_based() {
        assert_eq!(RowRef::from_display(0), None);
        assert_eq!(RowRef::from_display(3), Some(RowRef::new(2)));
    }
}
