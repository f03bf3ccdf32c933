//! Match source that downloads a JSON export over HTTP.

use matchwiki_core::MatchRecord;
use tracing::info;

use crate::SyncError;
use crate::source::{MatchCollection, MatchSource};

/// Pulls the match export published by the statistics service.
pub struct HttpJsonSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpJsonSource {
    /// `url` points at the JSON array of match records. A trailing slash is
    /// dropped.
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            url: url.trim_end_matches('/').to_string(),
        }
    }
}

impl MatchSource for HttpJsonSource {
    fn fetch_all(&mut self) -> Result<MatchCollection, SyncError> {
        info!(url = %self.url, "pulling matches");
        let resp = self.client.get(&self.url).send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(SyncError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let matches: Vec<MatchRecord> = resp.json()?;
        info!(count = matches.len(), "pulled matches");
        Ok(MatchCollection::new(matches))
    }
}
