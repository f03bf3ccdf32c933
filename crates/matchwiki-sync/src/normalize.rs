//! Post-save passes over a match page.

use matchwiki_core::events::sort_serialized;
use matchwiki_core::{Document, MATCH_TEMPLATE, TemplateField};
use matchwiki_store::PageStore;
use tracing::debug;

use crate::SyncError;

/// Passes run on a page after it has been saved.
pub trait PageNormalizer {
    /// Lay out the catalogue template one parameter per line.
    fn prettify(&mut self, store: &mut dyn PageStore, title: &str) -> Result<(), SyncError>;

    /// Order the players-events value by minute.
    fn sort_events(&mut self, store: &mut dyn PageStore, title: &str) -> Result<(), SyncError>;
}

/// Does nothing. For offline runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNormalizer;

impl PageNormalizer for NoopNormalizer {
    fn prettify(&mut self, _store: &mut dyn PageStore, _title: &str) -> Result<(), SyncError> {
        Ok(())
    }

    fn sort_events(&mut self, _store: &mut dyn PageStore, _title: &str) -> Result<(), SyncError> {
        Ok(())
    }
}

/// Rewrites the catalogue template in place and saves only when the text
/// actually changed.
#[derive(Debug, Clone)]
pub struct TemplateNormalizer {
    summary: String,
}

impl TemplateNormalizer {
    pub fn new(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
        }
    }

    fn rewrite(
        &self,
        store: &mut dyn PageStore,
        title: &str,
        pass: &str,
        change: impl FnOnce(&Document) -> Option<String>,
    ) -> Result<(), SyncError> {
        let current = store.read(title)?;
        let doc = Document::parse(current.as_str());
        if doc.find_templates(MATCH_TEMPLATE).is_empty() {
            return Err(SyncError::MissingTemplate(title.to_string()));
        }
        match change(&doc) {
            Some(text) if text != current => {
                store.write(title, &text, &self.summary)?;
                debug!(title, pass, "normalized page");
            }
            _ => debug!(title, pass, "already normal"),
        }
        Ok(())
    }
}

impl PageNormalizer for TemplateNormalizer {
    fn prettify(&mut self, store: &mut dyn PageStore, title: &str) -> Result<(), SyncError> {
        self.rewrite(store, title, "prettify", |doc| {
            let template = *doc.find_templates(MATCH_TEMPLATE).first()?;
            Some(doc.relayout(template))
        })
    }

    fn sort_events(&mut self, store: &mut dyn PageStore, title: &str) -> Result<(), SyncError> {
        self.rewrite(store, title, "sort events", |doc| {
            let template = *doc.find_templates(MATCH_TEMPLATE).first()?;
            let key = TemplateField::PlayersEvents.key();
            let events = template.get(key)?;
            let mut edit = template.edit();
            edit.set(key, sort_serialized(events));
            Some(doc.apply(&edit))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matchwiki_store::MemoryStore;

    const TITLE: &str = "משחק: 03-05-2021 מכבי תל אביב נגד הפועל חיפה - ליגת העל";

    #[test]
    fn prettify_puts_each_field_on_its_own_line() {
        let mut store = MemoryStore::new()
            .with_page(TITLE, "{{קטלוג משחקים|עונה=2020/21|מפעל=ליגת העל}}\n[[קטגוריה:משחקים]]");
        TemplateNormalizer::new("סידור")
            .prettify(&mut store, TITLE)
            .unwrap();
        assert_eq!(
            store.page(TITLE).unwrap(),
            "{{קטלוג משחקים\n|עונה=2020/21\n|מפעל=ליגת העל\n}}\n[[קטגוריה:משחקים]]"
        );
        assert_eq!(store.writes()[0].summary, "סידור");
    }

    #[test]
    fn prettify_twice_writes_once() {
        let mut store = MemoryStore::new().with_page(TITLE, "{{קטלוג משחקים|עונה=2020/21}}");
        let mut normalizer = TemplateNormalizer::new("סידור");
        normalizer.prettify(&mut store, TITLE).unwrap();
        normalizer.prettify(&mut store, TITLE).unwrap();
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn sort_events_orders_blob() {
        let mut store = MemoryStore::new().with_page(
            TITLE,
            "{{קטלוג משחקים\n|אירועי שחקנים=א::1::70::גול::::1,ב::2::0::הרכב::::1\n}}",
        );
        TemplateNormalizer::new("מיון")
            .sort_events(&mut store, TITLE)
            .unwrap();
        assert_eq!(
            store.page(TITLE).unwrap(),
            "{{קטלוג משחקים\n|אירועי שחקנים=ב::2::0::הרכב::::1,א::1::70::גול::::1\n}}"
        );
    }

    #[test]
    fn sorted_events_are_left_alone() {
        let mut store = MemoryStore::new()
            .with_page(TITLE, "{{קטלוג משחקים|אירועי שחקנים=ב::2::0::הרכב::::1}}");
        TemplateNormalizer::new("מיון")
            .sort_events(&mut store, TITLE)
            .unwrap();
        assert!(store.writes().is_empty());
    }

    #[test]
    fn page_without_template_is_an_error() {
        let mut store = MemoryStore::new().with_page(TITLE, "טקסט חופשי");
        let result = TemplateNormalizer::new("סידור").prettify(&mut store, TITLE);
        assert!(matches!(result, Err(SyncError::MissingTemplate(_))));
    }
}
