//! Page titles for match pages.
//!
//! A title is `משחק: dd-mm-yyyy <home> נגד <away> - <competition>`. Only the
//! date, both team names and the competition take part, so two matches that
//! share all four map to the same page.

use crate::model::MatchRecord;

/// Leading token of every match page title.
pub const PAGE_PREFIX: &str = "משחק";
/// Connector between the home and away team names.
pub const VERSUS: &str = "נגד";
/// Date format used in titles and in the date template field.
pub const TITLE_DATE_FORMAT: &str = "%d-%m-%Y";

/// Canonical wiki page title for `record`.
pub fn name_for(record: &MatchRecord) -> String {
    format!(
        "{PAGE_PREFIX}: {date} {home} {VERSUS} {away} - {competition}",
        date = record.date.format(TITLE_DATE_FORMAT),
        home = record.home_team.name,
        away = record.away_team.name,
        competition = record.competition,
    )
}
