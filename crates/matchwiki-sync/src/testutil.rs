//! Shared fixtures for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use matchwiki_core::{EventKind, MatchRecord, PlayerEventRecord, PlayerRecord, TeamRecord};

pub(crate) fn team(name: &str, score: u32, players: Vec<PlayerRecord>) -> TeamRecord {
    TeamRecord {
        name: name.into(),
        score,
        coach: None,
        players,
    }
}

pub(crate) fn player(name: &str, number: u32, events: &[(EventKind, u32)]) -> PlayerRecord {
    PlayerRecord {
        name: name.into(),
        number,
        events: events
            .iter()
            .map(|&(kind, minute)| PlayerEventRecord {
                kind,
                minute,
                goal_type: None,
            })
            .collect(),
    }
}

/// Maccabi Tel Aviv at home to `opponent` in the league. Hour 0 leaves the
/// kick-off time unknown.
pub(crate) fn match_on(y: i32, m: u32, d: u32, hour: u32, opponent: &str) -> MatchRecord {
    MatchRecord {
        date: NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap(),
        season: "2020/21".into(),
        competition: "ליגת העל".into(),
        round: Some("מחזור 30".into()),
        club_is_home: true,
        stadium: "בלומפילד".into(),
        home_team: team("מכבי תל אביב", 2, Vec::new()),
        away_team: team(opponent, 1, Vec::new()),
        referee: None,
        crowd: None,
    }
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` under a plain-text subscriber and return what it logged.
pub(crate) fn captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .with_writer(move || writer.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}
