//! Map pages already published on the wiki back to their source matches.

use std::sync::LazyLock;

use chrono::NaiveDate;
use matchwiki_core::MATCH_CATEGORY;
use matchwiki_store::PageStore;
use regex::Regex;
use tracing::{info, warn};

use crate::SyncError;
use crate::source::{MatchCollection, SOURCE_DATE_FORMAT, parse_source_date};

static TITLE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]{2}-[0-9]{2}-[0-9]{4}").expect("valid title date pattern"));

/// The match day encoded in a page title (`dd-mm-yyyy`), if it is a real date.
pub fn title_date(title: &str) -> Option<NaiveDate> {
    let token = TITLE_DATE.find(title)?.as_str();
    parse_source_date(&token.replace('-', "."))
}

/// The match behind every page in the match category.
///
/// Pages whose title carries no usable date, and dates with no match in
/// `matches`, are skipped with a warning. Two matches on one page date make
/// the page ambiguous and abort the scan.
pub fn matches_with_pages<S: PageStore + ?Sized>(
    store: &mut S,
    matches: &MatchCollection,
) -> Result<MatchCollection, SyncError> {
    let titles = store.pages_in_category(MATCH_CATEGORY)?;
    info!(count = titles.len(), category = MATCH_CATEGORY, "scanning existing pages");

    let mut found = Vec::new();
    for title in titles {
        let Some(day) = title_date(&title) else {
            warn!(title = %title, "no date in page title, skipping");
            continue;
        };
        let on_day = matches.played_before(day).played_after(day);
        match on_day.len() {
            0 => warn!(title = %title, %day, "no source match for page, skipping"),
            1 => found.extend(on_day),
            count => {
                return Err(SyncError::AmbiguousDate {
                    date: day.format(SOURCE_DATE_FORMAT).to_string(),
                    count,
                });
            }
        }
    }
    Ok(MatchCollection::new(found))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::match_on;
    use matchwiki_store::MemoryStore;

    const CATEGORY_LINK: &str = "[[קטגוריה:משחקים]]";

    fn store_with(titles: &[&str]) -> MemoryStore {
        titles.iter().fold(MemoryStore::new(), |store, title| {
            store.with_page(title, CATEGORY_LINK)
        })
    }

    #[test]
    fn date_token_is_read_from_title() {
        assert_eq!(
            title_date("משחק: 03-05-2021 מכבי תל אביב נגד הפועל חיפה - ליגת העל"),
            NaiveDate::from_ymd_opt(2021, 5, 3)
        );
        assert_eq!(title_date("משחק: מכבי תל אביב נגד הפועל חיפה"), None);
        assert_eq!(title_date("משחק: 31-02-2021 א נגד ב - ליגה"), None);
    }

    #[test]
    fn pages_map_to_their_matches() {
        let matches = MatchCollection::new(vec![
            match_on(2021, 5, 3, 20, "הפועל חיפה"),
            match_on(2021, 5, 9, 19, "בני סכנין"),
            match_on(2021, 5, 15, 21, "הפועל באר שבע"),
        ]);
        let mut store = store_with(&[
            "משחק: 03-05-2021 מכבי תל אביב נגד הפועל חיפה - ליגת העל",
            "משחק: 15-05-2021 מכבי תל אביב נגד הפועל באר שבע - ליגת העל",
        ]);

        let found = matches_with_pages(&mut store, &matches).unwrap();
        let opponents: Vec<_> = found.iter().map(|m| m.away_team.name.as_str()).collect();
        assert_eq!(opponents, vec!["הפועל חיפה", "הפועל באר שבע"]);
    }

    #[test]
    fn undated_and_unmatched_pages_are_skipped() {
        let matches = MatchCollection::new(vec![match_on(2021, 5, 3, 20, "הפועל חיפה")]);
        let mut store = store_with(&["משחק ללא תאריך", "משחק: 01-01-1999 א נגד ב - גביע"]);

        assert!(matches_with_pages(&mut store, &matches).unwrap().is_empty());
    }

    #[test]
    fn two_matches_on_one_day_abort() {
        let matches = MatchCollection::new(vec![
            match_on(2021, 5, 3, 13, "הפועל חיפה"),
            match_on(2021, 5, 3, 20, "מכבי חיפה"),
        ]);
        let mut store = store_with(&["משחק: 03-05-2021 מכבי תל אביב נגד הפועל חיפה - ליגת העל"]);

        match matches_with_pages(&mut store, &matches) {
            Err(SyncError::AmbiguousDate { date, count }) => {
                assert_eq!(date, "03.05.2021");
                assert_eq!(count, 2);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
