//! One sequential pass over a collection of matches.

use matchwiki_core::{MATCH_TEMPLATE, MatchRecord, name_for};
use matchwiki_store::PageStore;
use tracing::{error, info, warn};

use crate::SyncError;
use crate::discovery::matches_with_pages;
use crate::normalize::PageNormalizer;
use crate::reconcile::{Outcome, Reconciler};
use crate::source::MatchCollection;

/// A match whose page could not be reconciled.
#[derive(Debug)]
pub struct MatchFailure {
    pub title: String,
    pub error: SyncError,
}

/// Tally of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub dry_run: usize,
    pub failures: Vec<MatchFailure>,
}

impl RunReport {
    pub fn processed(&self) -> usize {
        self.created + self.updated + self.unchanged + self.dry_run + self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated { .. } => self.updated += 1,
            Outcome::Unchanged => self.unchanged += 1,
            Outcome::DryRun => self.dry_run += 1,
        }
    }
}

/// Reconcile every match in `matches`, then, if configured, every page
/// already in the match category.
///
/// A failing match is logged and recorded, and the run moves on. Only an
/// ambiguous existing page aborts.
pub fn run<S: PageStore, N: PageNormalizer>(
    reconciler: &mut Reconciler<'_, S, N>,
    matches: &MatchCollection,
) -> Result<RunReport, SyncError> {
    let config = reconciler.config();
    match reconciler.store_mut().pages_using_template(MATCH_TEMPLATE) {
        Ok(pages) => info!(template = MATCH_TEMPLATE, pages = pages.len(), "pages using template"),
        Err(e) => warn!(template = MATCH_TEMPLATE, error = %e, "could not list pages using template"),
    }
    info!(
        save = config.save,
        show_diff = config.show_diff,
        events_only = config.events_only,
        refresh_pages = config.refresh_pages,
        "starting run"
    );

    let mut report = RunReport::default();
    reconcile_all(reconciler, matches, &mut report);

    if config.check_existing_pages {
        let existing = matches_with_pages(reconciler.store_mut(), matches)?;
        info!(count = existing.len(), "reconciling existing pages");
        reconcile_all(reconciler, &existing, &mut report);
    }

    info!(
        created = report.created,
        updated = report.updated,
        unchanged = report.unchanged,
        dry_run = report.dry_run,
        failed = report.failures.len(),
        "run finished"
    );
    Ok(report)
}

fn reconcile_all<S: PageStore, N: PageNormalizer>(
    reconciler: &mut Reconciler<'_, S, N>,
    matches: &MatchCollection,
    report: &mut RunReport,
) {
    for record in matches {
        reconcile_one(reconciler, record, report);
    }
}

fn reconcile_one<S: PageStore, N: PageNormalizer>(
    reconciler: &mut Reconciler<'_, S, N>,
    record: &MatchRecord,
    report: &mut RunReport,
) {
    match reconciler.reconcile(record) {
        Ok(outcome) => report.record(&outcome),
        Err(e) => {
            let title = name_for(record);
            error!(title = %title, error = %e, "failed to reconcile match");
            report.failures.push(MatchFailure { title, error: e });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::NoopNormalizer;
    use crate::testutil::match_on;
    use matchwiki_core::SyncConfig;
    use matchwiki_store::MemoryStore;

    const HAIFA: &str = "משחק: 03-05-2021 מכבי תל אביב נגד הפועל חיפה - ליגת העל";
    const SAKHNIN: &str = "משחק: 09-05-2021 מכבי תל אביב נגד בני סכנין - ליגת העל";
    const BEER_SHEVA: &str = "משחק: 15-05-2021 מכבי תל אביב נגד הפועל באר שבע - ליגת העל";

    fn matches() -> MatchCollection {
        MatchCollection::new(vec![
            match_on(2021, 5, 3, 20, "הפועל חיפה"),
            match_on(2021, 5, 9, 19, "בני סכנין"),
            match_on(2021, 5, 15, 21, "הפועל באר שבע"),
        ])
    }

    #[test]
    fn failure_does_not_stop_the_run() {
        let config = SyncConfig::default();
        let mut store = MemoryStore::new().failing_on(SAKHNIN);
        let mut reconciler = Reconciler::new(&mut store, NoopNormalizer, &config);

        let report = run(&mut reconciler, &matches()).unwrap();
        assert_eq!(report.created, 2);
        assert_eq!(report.processed(), 3);
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].title, SAKHNIN);
        assert!(matches!(report.failures[0].error, SyncError::Store(_)));

        assert!(store.page(HAIFA).is_some());
        assert!(store.page(SAKHNIN).is_none());
        assert!(store.page(BEER_SHEVA).is_some());
    }

    #[test]
    fn second_run_only_touches_changed_pages() {
        let config = SyncConfig::default();
        let mut store = MemoryStore::new();
        let mut reconciler = Reconciler::new(&mut store, NoopNormalizer, &config);
        run(&mut reconciler, &matches()).unwrap();

        let report = run(&mut reconciler, &matches()).unwrap();
        assert_eq!(report.unchanged, 3);
        assert!(report.is_success());
        assert_eq!(store.writes().len(), 3);
    }

    #[test]
    fn dry_run_counts_without_writing() {
        let config = SyncConfig::default().dry_run();
        let mut store = MemoryStore::new();
        let mut reconciler = Reconciler::new(&mut store, NoopNormalizer, &config);

        let report = run(&mut reconciler, &matches()).unwrap();
        assert_eq!(report.dry_run, 3);
        assert!(store.is_empty());
    }

    #[test]
    fn existing_pages_pass_revisits_category_pages() {
        let mut config = SyncConfig::default();
        config.check_existing_pages = true;
        let page = "{{קטלוג משחקים|אירועי שחקנים=ישן}}\n[[קטגוריה:משחקים]]";
        let mut store = MemoryStore::new().with_page(HAIFA, page);
        let mut reconciler = Reconciler::new(&mut store, NoopNormalizer, &config);

        let selected = MatchCollection::new(vec![match_on(2021, 5, 9, 19, "בני סכנין")]);
        let all: MatchCollection = matches();
        let report = run(&mut reconciler, &selected).unwrap();
        assert_eq!(report.created, 1);
        assert_eq!(report.processed(), 1);

        let report = run(&mut reconciler, &all).unwrap();
        // First pass: Haifa updated, Sakhnin unchanged, Beer Sheva created.
        // Second pass: only the Haifa page is categorized and it is now current.
        assert_eq!(report.updated, 1);
        assert_eq!(report.created, 1);
        assert_eq!(report.unchanged, 2);
        assert!(store.page(HAIFA).unwrap().contains("|אירועי שחקנים=}}"));
    }

    #[test]
    fn ambiguous_existing_page_aborts() {
        let mut config = SyncConfig::default();
        config.check_existing_pages = true;
        let mut store =
            MemoryStore::new().with_page(HAIFA, "{{קטלוג משחקים}}\n[[קטגוריה:משחקים]]");
        let mut reconciler = Reconciler::new(&mut store, NoopNormalizer, &config);

        let doubled = MatchCollection::new(vec![
            match_on(2021, 5, 3, 13, "הפועל חיפה"),
            match_on(2021, 5, 3, 20, "הפועל חיפה"),
        ]);
        let result = run(&mut reconciler, &doubled);
        assert!(matches!(result, Err(SyncError::AmbiguousDate { count: 2, .. })));
    }
}
