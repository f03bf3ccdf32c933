//! Match records as delivered by the statistics source.
//!
//! The source marks missing data with placeholder strings. Those are turned
//! into `None` while deserializing, so nothing past this module ever compares
//! against a placeholder.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder the source uses for an unknown coach.
pub const MISSING_COACH: &str = "Cant found coach";
/// Placeholder the source uses for an unknown referee.
pub const MISSING_REFEREE: &str = "Cant found referee";
/// Placeholder the source uses for an unknown attendance.
pub const MISSING_CROWD: &str = "Cant found crowd";
/// Placeholder the source uses for an unknown round.
pub const MISSING_ROUND: &str = "No round found";

/// Drop `value` if it is the source's placeholder for "not found".
pub fn absent_if(value: Option<String>, placeholder: &str) -> Option<String> {
    value.filter(|v| v != placeholder)
}

fn without_placeholder<'de, D>(deserializer: D, placeholder: &str) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(absent_if(Option::<String>::deserialize(deserializer)?, placeholder))
}

fn coach<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    without_placeholder(deserializer, MISSING_COACH)
}

fn referee<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    without_placeholder(deserializer, MISSING_REFEREE)
}

fn crowd<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    without_placeholder(deserializer, MISSING_CROWD)
}

fn round<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    without_placeholder(deserializer, MISSING_ROUND)
}

/// What happened to a player during a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    LineUp,
    Benched,
    SubstitutionIn,
    SubstitutionOut,
    Goal,
    Assist,
    YellowCard,
    RedCard,
    Captain,
    PenaltyMissed,
    PenaltySaved,
    #[serde(other)]
    Unknown,
}

impl EventKind {
    /// Label written into the players-events template field.
    pub fn label(self) -> &'static str {
        match self {
            Self::LineUp => "הרכב",
            Self::Benched => "ספסל",
            Self::SubstitutionIn => "נכנס",
            Self::SubstitutionOut => "יצא",
            Self::Goal => "גול",
            Self::Assist => "בישול",
            Self::YellowCard => "צהוב",
            Self::RedCard => "אדום",
            Self::Captain => "קפטן",
            Self::PenaltyMissed => "החמצת פנדל",
            Self::PenaltySaved => "עצירת פנדל",
            Self::Unknown => "לא ידוע",
        }
    }
}

/// How a goal was scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalType {
    Header,
    Penalty,
    FreeKick,
    OwnGoal,
    Foot,
    #[serde(other)]
    Unknown,
}

impl GoalType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Header => "ראש",
            Self::Penalty => "פנדל",
            Self::FreeKick => "בעיטה חופשית",
            Self::OwnGoal => "שער עצמי",
            Self::Foot => "רגל",
            Self::Unknown => "לא ידוע",
        }
    }
}

/// A single recorded event for one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEventRecord {
    pub kind: EventKind,
    /// Minutes from kick-off.
    pub minute: u32,
    #[serde(default)]
    pub goal_type: Option<GoalType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub number: u32,
    #[serde(default)]
    pub events: Vec<PlayerEventRecord>,
}

impl PlayerRecord {
    pub fn has_event(&self, kind: EventKind) -> bool {
        self.events.iter().any(|e| e.kind == kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
    pub score: u32,
    #[serde(default, deserialize_with = "coach")]
    pub coach: Option<String>,
    #[serde(default)]
    pub players: Vec<PlayerRecord>,
}

/// One played match, as exported by the statistics source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Kick-off. An hour of 0 means the time is unknown.
    pub date: NaiveDateTime,
    pub season: String,
    pub competition: String,
    #[serde(default, alias = "fixture", deserialize_with = "round")]
    pub round: Option<String>,
    /// Whether the tracked club played at home.
    pub club_is_home: bool,
    pub stadium: String,
    pub home_team: TeamRecord,
    pub away_team: TeamRecord,
    #[serde(default, deserialize_with = "referee")]
    pub referee: Option<String>,
    #[serde(default, deserialize_with = "crowd")]
    pub crowd: Option<String>,
}

impl MatchRecord {
    /// Calendar day the match was played on.
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    pub fn club_team(&self) -> &TeamRecord {
        if self.club_is_home {
            &self.home_team
        } else {
            &self.away_team
        }
    }

    pub fn opponent_team(&self) -> &TeamRecord {
        if self.club_is_home {
            &self.away_team
        } else {
            &self.home_team
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATCH_JSON: &str = r#"{
        "date": "2021-05-03T20:30:00",
        "season": "2020/21",
        "competition": "ליגת העל",
        "fixture": "No round found",
        "club_is_home": false,
        "stadium": "סמי עופר",
        "home_team": {
            "name": "הפועל חיפה",
            "score": 1,
            "coach": "Cant found coach",
            "players": []
        },
        "away_team": {
            "name": "מכבי תל אביב",
            "score": 2,
            "coach": "פטריק ון ליוון",
            "players": [
                {"name": "ערן זהבי", "number": 7, "events": [
                    {"kind": "line_up", "minute": 0},
                    {"kind": "goal", "minute": 12, "goal_type": "penalty"}
                ]}
            ]
        },
        "referee": "Cant found referee",
        "crowd": "Cant found crowd"
    }"#;

    #[test]
    fn placeholders_deserialize_as_absent() {
        let record: MatchRecord = serde_json::from_str(MATCH_JSON).unwrap();
        assert_eq!(record.round, None);
        assert_eq!(record.referee, None);
        assert_eq!(record.crowd, None);
        assert_eq!(record.home_team.coach, None);
        assert_eq!(record.away_team.coach.as_deref(), Some("פטריק ון ליוון"));
    }

    #[test]
    fn missing_optional_fields_default_to_absent() {
        let json = r#"{
            "date": "2021-05-03T00:00:00",
            "season": "2020/21",
            "competition": "גביע המדינה",
            "club_is_home": true,
            "stadium": "בלומפילד",
            "home_team": {"name": "מכבי תל אביב", "score": 0},
            "away_team": {"name": "בני סכנין", "score": 0}
        }"#;
        let record: MatchRecord = serde_json::from_str(json).unwrap();
        assert!(record.round.is_none());
        assert!(record.home_team.players.is_empty());
        assert!(record.crowd.is_none());
    }

    #[test]
    fn club_and_opponent_follow_home_flag() {
        let record: MatchRecord = serde_json::from_str(MATCH_JSON).unwrap();
        assert_eq!(record.club_team().name, "מכבי תל אביב");
        assert_eq!(record.opponent_team().name, "הפועל חיפה");
    }

    #[test]
    fn unknown_event_kinds_are_tolerated() {
        let event: PlayerEventRecord =
            serde_json::from_str(r#"{"kind": "var_review", "minute": 80}"#).unwrap();
        assert_eq!(event.kind, EventKind::Unknown);
        assert!(event.goal_type.is_none());
    }

    #[test]
    fn real_values_pass_placeholder_filter() {
        assert_eq!(
            absent_if(Some("12000".into()), MISSING_CROWD).as_deref(),
            Some("12000")
        );
        assert_eq!(absent_if(Some(MISSING_CROWD.into()), MISSING_CROWD), None);
        assert_eq!(absent_if(None, MISSING_CROWD), None);
    }
}
