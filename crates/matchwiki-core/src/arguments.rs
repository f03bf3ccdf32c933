//! Match record → catalogue template arguments.

use std::collections::BTreeMap;

use chrono::Timelike;

use crate::events::events_for;
use crate::model::MatchRecord;
use crate::naming::TITLE_DATE_FORMAT;

/// Name of the template every match page carries.
pub const MATCH_TEMPLATE: &str = "קטלוג משחקים";

const HOME: &str = "בית";
const AWAY: &str = "חוץ";

/// The fixed vocabulary of catalogue template fields, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TemplateField {
    Date,
    Hour,
    Season,
    Competition,
    Round,
    OpponentName,
    HomeOrAway,
    Stadium,
    ClubScore,
    OpponentScore,
    ClubCoach,
    OpponentCoach,
    Referee,
    Crowd,
    Broadcaster,
    Costume,
    PlayersEvents,
}

impl TemplateField {
    pub const ALL: [TemplateField; 17] = [
        Self::Date,
        Self::Hour,
        Self::Season,
        Self::Competition,
        Self::Round,
        Self::OpponentName,
        Self::HomeOrAway,
        Self::Stadium,
        Self::ClubScore,
        Self::OpponentScore,
        Self::ClubCoach,
        Self::OpponentCoach,
        Self::Referee,
        Self::Crowd,
        Self::Broadcaster,
        Self::Costume,
        Self::PlayersEvents,
    ];

    /// Parameter name inside the wiki template.
    pub fn key(self) -> &'static str {
        match self {
            Self::Date => "תאריך המשחק",
            Self::Hour => "שעת המשחק",
            Self::Season => "עונה",
            Self::Competition => "מפעל",
            Self::Round => "שלב במפעל",
            Self::OpponentName => "שם יריבה",
            Self::HomeOrAway => "בית חוץ",
            Self::Stadium => "אצטדיון",
            Self::ClubScore => "תוצאת משחק מכבי",
            Self::OpponentScore => "תוצאת משחק יריבה",
            Self::ClubCoach => "מאמן מכבי",
            Self::OpponentCoach => "מאמן יריבה",
            Self::Referee => "שופט ראשי",
            Self::Crowd => "כמות קהל",
            Self::Broadcaster => "גוף שידור",
            Self::Costume => "מדים",
            Self::PlayersEvents => "אירועי שחקנים",
        }
    }
}

/// Values for every [`TemplateField`]. Always complete: a field with no data
/// holds an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateArguments {
    values: BTreeMap<TemplateField, String>,
}

impl TemplateArguments {
    pub fn get(&self, field: TemplateField) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    /// `(field, value)` pairs in page order.
    pub fn iter(&self) -> impl Iterator<Item = (TemplateField, &str)> {
        self.values.iter().map(|(f, v)| (*f, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Absent data is written as an empty field.
fn or_empty(value: Option<&str>) -> String {
    value.map(str::to_owned).unwrap_or_default()
}

fn value_for(field: TemplateField, record: &MatchRecord) -> String {
    let club = record.club_team();
    let opponent = record.opponent_team();

    match field {
        TemplateField::Date => record.date.format(TITLE_DATE_FORMAT).to_string(),
        // Hour 0 means the kick-off time is unknown.
        TemplateField::Hour => match record.date.hour() {
            0 => String::new(),
            hour => hour.to_string(),
        },
        TemplateField::Season => record.season.clone(),
        TemplateField::Competition => record.competition.clone(),
        TemplateField::Round => or_empty(record.round.as_deref()),
        TemplateField::OpponentName => opponent.name.clone(),
        TemplateField::HomeOrAway => {
            let side = if record.club_is_home { HOME } else { AWAY };
            side.to_owned()
        }
        TemplateField::Stadium => record.stadium.clone(),
        TemplateField::ClubScore => club.score.to_string(),
        TemplateField::OpponentScore => opponent.score.to_string(),
        TemplateField::ClubCoach => or_empty(club.coach.as_deref()),
        TemplateField::OpponentCoach => or_empty(opponent.coach.as_deref()),
        TemplateField::Referee => or_empty(record.referee.as_deref()),
        TemplateField::Crowd => or_empty(record.crowd.as_deref()),
        // Filled in by hand on the wiki.
        TemplateField::Broadcaster | TemplateField::Costume => String::new(),
        TemplateField::PlayersEvents => events_for(record),
    }
}

/// Build the full catalogue argument set for `record`.
///
/// Values are trimmed, as the wiki trims named template parameters.
pub fn build_arguments(record: &MatchRecord) -> TemplateArguments {
    let values = TemplateField::ALL
        .iter()
        .map(|&field| (field, value_for(field, record).trim().to_string()))
        .collect();
    TemplateArguments { values }
}
