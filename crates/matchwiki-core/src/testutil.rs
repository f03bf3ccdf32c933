//! Shared fixtures for unit tests.

use chrono::NaiveDate;

use crate::model::{EventKind, GoalType, MatchRecord, PlayerEventRecord, PlayerRecord, TeamRecord};

pub(crate) fn team(name: &str, score: u32) -> TeamRecord {
    TeamRecord {
        name: name.into(),
        score,
        coach: None,
        players: Vec::new(),
    }
}

pub(crate) fn event(kind: EventKind, minute: u32) -> PlayerEventRecord {
    PlayerEventRecord {
        kind,
        minute,
        goal_type: None,
    }
}

pub(crate) fn goal(minute: u32, goal_type: GoalType) -> PlayerEventRecord {
    PlayerEventRecord {
        kind: EventKind::Goal,
        minute,
        goal_type: Some(goal_type),
    }
}

pub(crate) fn player(name: &str, number: u32, events: Vec<PlayerEventRecord>) -> PlayerRecord {
    PlayerRecord {
        name: name.into(),
        number,
        events,
    }
}

/// Maccabi Tel Aviv at home to Hapoel Haifa, 3 May 2021, no players.
pub(crate) fn sample_match() -> MatchRecord {
    MatchRecord {
        date: NaiveDate::from_ymd_opt(2021, 5, 3)
            .unwrap()
            .and_hms_opt(20, 30, 0)
            .unwrap(),
        season: "2020/21".into(),
        competition: "ליגת העל".into(),
        round: Some("מחזור 30".into()),
        club_is_home: true,
        stadium: "בלומפילד".into(),
        home_team: team("מכבי תל אביב", 2),
        away_team: team("הפועל חיפה", 1),
        referee: Some("אורל גרינפלד".into()),
        crowd: Some("5000".into()),
    }
}
