//! Create-or-update of a single match page.

use chrono::Utc;
use matchwiki_core::wikitext::render_template;
use matchwiki_core::{
    Document, MATCH_TEMPLATE, MatchRecord, SyncConfig, TemplateArguments, TemplateField,
    build_arguments, name_for,
};
use matchwiki_store::PageStore;
use tracing::{debug, info};

use crate::SyncError;
use crate::normalize::PageNormalizer;

/// What reconciling one match did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated { changed_fields: Vec<TemplateField> },
    /// The computed text equals the stored one; nothing was written.
    Unchanged,
    /// Saving is off; the page was computed but not written.
    DryRun,
}

/// Brings match pages in line with their records.
pub struct Reconciler<'a, S, N> {
    store: S,
    normalizer: N,
    config: &'a SyncConfig,
}

impl<'a, S: PageStore, N: PageNormalizer> Reconciler<'a, S, N> {
    pub fn new(store: S, normalizer: N, config: &'a SyncConfig) -> Self {
        Self {
            store,
            normalizer,
            config,
        }
    }

    pub fn config(&self) -> &'a SyncConfig {
        self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn normalizer(&self) -> &N {
        &self.normalizer
    }

    /// Create the page for `record` or update the existing one. With saving
    /// on, the normalizers run after the write, or on their own when the page
    /// is already current.
    pub fn reconcile(&mut self, record: &MatchRecord) -> Result<Outcome, SyncError> {
        let title = name_for(record);
        let args = build_arguments(record);

        let (text, outcome) = if self.store.exists(&title)? {
            let current = self.store.read(&title)?;
            match self.update(&title, &current, &args)? {
                Some(update) => update,
                None => {
                    debug!(title = %title, "page already up to date");
                    // A hand-edited page may still need tidying.
                    if self.config.save {
                        self.normalize(&title)?;
                    }
                    return Ok(Outcome::Unchanged);
                }
            }
        } else {
            info!(title = %title, "creating page");
            (create(&args), Outcome::Created)
        };

        if !self.config.save {
            info!(title = %title, "not saving");
            return Ok(Outcome::DryRun);
        }

        self.store.write(&title, &text, &self.config.edit_summary)?;
        self.normalize(&title)?;
        Ok(outcome)
    }

    fn normalize(&mut self, title: &str) -> Result<(), SyncError> {
        self.normalizer.prettify(&mut self.store, title)?;
        self.normalizer.sort_events(&mut self.store, title)
    }

    /// New text for an existing page, or `None` when it would not change.
    fn update(
        &self,
        title: &str,
        current: &str,
        args: &TemplateArguments,
    ) -> Result<Option<(String, Outcome)>, SyncError> {
        let doc = Document::parse(current);
        let template = *doc
            .find_templates(MATCH_TEMPLATE)
            .first()
            .ok_or_else(|| SyncError::MissingTemplate(title.to_string()))?;

        let fields: Vec<TemplateField> = if self.config.events_only {
            vec![TemplateField::PlayersEvents]
        } else {
            TemplateField::ALL.to_vec()
        };

        let mut edit = template.edit();
        let mut changed_fields = Vec::new();
        for field in fields {
            let new = args.get(field);
            let old = template.get(field.key());
            if old.map(str::trim) == Some(new.trim()) {
                continue;
            }
            if self.config.show_diff {
                info!(
                    title,
                    field = field.key(),
                    old = old.unwrap_or_default(),
                    new,
                    "field differs"
                );
            }
            edit.set(field.key(), new);
            changed_fields.push(field);
        }

        let mut text = doc.apply(&edit);
        if self.config.refresh_pages && !self.config.events_only {
            text.push_str(&refresh_marker());
        }
        if text == current {
            return Ok(None);
        }
        info!(title, changed = changed_fields.len(), "updating page");
        Ok(Some((text, Outcome::Updated { changed_fields })))
    }
}

/// Fresh page text: the catalogue template with every field, in order.
fn create(args: &TemplateArguments) -> String {
    let fields: Vec<(&str, &str)> = args.iter().map(|(f, v)| (f.key(), v)).collect();
    render_template(MATCH_TEMPLATE, &fields)
}

/// Trailing comment that makes an otherwise identical save a new revision.
fn refresh_marker() -> String {
    format!("<!--{}-->", Utc::now().timestamp_subsec_nanos() % 10_000)
}
