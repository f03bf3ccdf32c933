//! In-memory page store for dry runs and tests.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::{PageStore, StoreError};

/// One accepted write, kept in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRecord {
    pub title: String,
    pub text: String,
    pub summary: String,
}

/// Pages held in a map. Category membership is read from `[[Category]]`
/// links in the page text, template use from `{{Name` occurrences.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pages: BTreeMap<String, String>,
    writes: Vec<WriteRecord>,
    failing: BTreeSet<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, title: &str, text: &str) -> Self {
        self.pages.insert(title.to_string(), text.to_string());
        self
    }

    /// Make every write to `title` fail.
    pub fn failing_on(mut self, title: &str) -> Self {
        self.failing.insert(title.to_string());
        self
    }

    /// Current text of `title`, if present.
    pub fn page(&self, title: &str) -> Option<&str> {
        self.pages.get(title).map(String::as_str)
    }

    /// Every successful write so far.
    pub fn writes(&self) -> &[WriteRecord] {
        &self.writes
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageStore for MemoryStore {
    fn exists(&mut self, title: &str) -> Result<bool, StoreError> {
        Ok(self.pages.contains_key(title))
    }

    fn read(&mut self, title: &str) -> Result<String, StoreError> {
        self.pages
            .get(title)
            .cloned()
            .ok_or_else(|| StoreError::PageNotFound(title.to_string()))
    }

    fn write(&mut self, title: &str, text: &str, summary: &str) -> Result<(), StoreError> {
        if self.failing.contains(title) {
            return Err(StoreError::EditRejected {
                title: title.to_string(),
                result: "Failure".to_string(),
            });
        }
        debug!(title, bytes = text.len(), "memory store write");
        self.pages.insert(title.to_string(), text.to_string());
        self.writes.push(WriteRecord {
            title: title.to_string(),
            text: text.to_string(),
            summary: summary.to_string(),
        });
        Ok(())
    }

    fn pages_in_category(&mut self, category: &str) -> Result<Vec<String>, StoreError> {
        let link = format!("[[{category}]]");
        Ok(self
            .pages
            .iter()
            .filter(|(_, text)| text.contains(&link))
            .map(|(title, _)| title.clone())
            .collect())
    }

    fn pages_using_template(&mut self, name: &str) -> Result<Vec<String>, StoreError> {
        let opening = format!("{{{{{name}");
        Ok(self
            .pages
            .iter()
            .filter(|(_, text)| text.contains(&opening))
            .map(|(title, _)| title.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_page_errors() {
        let mut store = MemoryStore::new();
        assert!(!store.exists("חסר").unwrap());
        assert!(matches!(store.read("חסר"), Err(StoreError::PageNotFound(t)) if t == "חסר"));
    }

    #[test]
    fn write_creates_and_records() {
        let mut store = MemoryStore::new();
        store.write("דף", "תוכן", "סיכום").unwrap();
        assert!(store.exists("דף").unwrap());
        assert_eq!(store.read("דף").unwrap(), "תוכן");
        assert_eq!(store.writes().len(), 1);
        assert_eq!(store.writes()[0].summary, "סיכום");
    }

    #[test]
    fn failing_title_rejects_writes() {
        let mut store = MemoryStore::new().with_page("דף", "ישן").failing_on("דף");
        assert!(store.write("דף", "חדש", "").is_err());
        assert_eq!(store.page("דף"), Some("ישן"));
        assert!(store.writes().is_empty());
    }

    #[test]
    fn category_membership_from_links() {
        let mut store = MemoryStore::new()
            .with_page("א", "{{x}}\n[[קטגוריה:משחקים]]")
            .with_page("ב", "[[קטגוריה:שחקנים]]");
        assert_eq!(store.pages_in_category("קטגוריה:משחקים").unwrap(), vec!["א"]);
    }

    #[test]
    fn template_use_from_text() {
        let mut store = MemoryStore::new()
            .with_page("א", "{{קטלוג משחקים|a=1}}")
            .with_page("ב", "טקסט");
        assert_eq!(store.pages_using_template("קטלוג משחקים").unwrap(), vec!["א"]);
    }

    #[test]
    fn mutable_reference_is_a_store() {
        fn touch(mut store: impl PageStore) {
            store.write("דף", "x", "").unwrap();
        }
        let mut store = MemoryStore::new();
        touch(&mut store);
        assert_eq!(store.page("דף"), Some("x"));
    }
}
