use std::path::PathBuf;

use matchwiki_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("page store error: {0}")]
    Store(#[from] StoreError),

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("match source returned no matches")]
    EmptySource,

    #[error("page {0} has no match catalogue template")]
    MissingTemplate(String),

    /// Two source matches share a date that identifies a published page.
    #[error("found more than one match for {date} ({count} matches)")]
    AmbiguousDate { date: String, count: usize },
}
