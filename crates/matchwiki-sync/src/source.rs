//! Match sources and the collection they hand back.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use matchwiki_core::MatchRecord;
use tracing::info;

use crate::SyncError;

/// Date format the source uses for `played_before` / `played_after` bounds.
pub const SOURCE_DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse a `dd.mm.yyyy` date as used by the source.
pub fn parse_source_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), SOURCE_DATE_FORMAT).ok()
}

/// Anything that can produce match records.
pub trait MatchSource {
    /// Every match, in source order.
    fn fetch_all(&mut self) -> Result<MatchCollection, SyncError>;

    /// The most recently played match.
    fn fetch_latest(&mut self) -> Result<MatchRecord, SyncError> {
        self.fetch_all()?
            .latest()
            .cloned()
            .ok_or(SyncError::EmptySource)
    }
}

/// Ordered matches with date-window filters. Filters keep source order and
/// can be chained: `played_before(d).played_after(d)` selects day `d`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchCollection {
    matches: Vec<MatchRecord>,
}

impl MatchCollection {
    pub fn new(matches: Vec<MatchRecord>) -> Self {
        Self { matches }
    }

    /// Matches played on or before `day`.
    pub fn played_before(&self, day: NaiveDate) -> Self {
        self.filtered(|m| m.day() <= day)
    }

    /// Matches played on or after `day`.
    pub fn played_after(&self, day: NaiveDate) -> Self {
        self.filtered(|m| m.day() >= day)
    }

    /// The last match in source order. The source lists matches oldest first.
    pub fn latest(&self) -> Option<&MatchRecord> {
        self.matches.last()
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MatchRecord> {
        self.matches.iter()
    }

    fn filtered(&self, keep: impl Fn(&MatchRecord) -> bool) -> Self {
        Self {
            matches: self.matches.iter().filter(|m| keep(m)).cloned().collect(),
        }
    }
}

impl From<Vec<MatchRecord>> for MatchCollection {
    fn from(matches: Vec<MatchRecord>) -> Self {
        Self::new(matches)
    }
}

impl FromIterator<MatchRecord> for MatchCollection {
    fn from_iter<I: IntoIterator<Item = MatchRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for MatchCollection {
    type Item = MatchRecord;
    type IntoIter = std::vec::IntoIter<MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.into_iter()
    }
}

impl<'a> IntoIterator for &'a MatchCollection {
    type Item = &'a MatchRecord;
    type IntoIter = std::slice::Iter<'a, MatchRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.matches.iter()
    }
}

/// A JSON array of match records on disk.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl MatchSource for JsonFileSource {
    fn fetch_all(&mut self) -> Result<MatchCollection, SyncError> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SyncError::Io {
            path: self.path.clone(),
            source,
        })?;
        let matches: Vec<MatchRecord> = serde_json::from_str(&raw)?;
        info!(path = %self.path.display(), count = matches.len(), "loaded matches");
        Ok(MatchCollection::new(matches))
    }
}
