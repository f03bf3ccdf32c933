//! MediaWiki Action API client.
//!
//! Logs in with a bot password, reads page text through `prop=revisions`,
//! lists category members and template transclusions, and saves with
//! `action=edit`. Requests are blocking and spaced by a fixed delay.

use std::env;
use std::thread::sleep;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{PageStore, StoreError};

const DEFAULT_USER_AGENT: &str = concat!("matchwiki/", env!("CARGO_PKG_VERSION"));
const LIST_LIMIT: &str = "500";

#[derive(Debug, Clone)]
pub struct MediaWikiConfig {
    /// Full `api.php` URL.
    pub api_url: String,
    pub user_agent: String,
    pub timeout_ms: u64,
    /// Minimum gap between two requests.
    pub rate_limit_ms: u64,
}

impl MediaWikiConfig {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 30_000,
            rate_limit_ms: 300,
        }
    }

    /// Override timing and user agent from `MATCHWIKI_*` variables.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(ua) = env::var("MATCHWIKI_USER_AGENT") {
            self.user_agent = ua;
        }
        if let Some(ms) = env::var("MATCHWIKI_TIMEOUT_MS").ok().and_then(|v| v.parse().ok()) {
            self.timeout_ms = ms;
        }
        if let Some(ms) = env::var("MATCHWIKI_RATE_LIMIT_MS").ok().and_then(|v| v.parse().ok()) {
            self.rate_limit_ms = ms;
        }
        self
    }
}

// ── API payloads (formatversion=2) ──

#[derive(Deserialize)]
struct TokensResponse {
    query: TokensQuery,
}

#[derive(Deserialize)]
struct TokensQuery {
    tokens: Tokens,
}

#[derive(Deserialize)]
struct Tokens {
    logintoken: Option<String>,
    csrftoken: Option<String>,
}

#[derive(Deserialize)]
struct LoginResponse {
    login: LoginResult,
}

#[derive(Deserialize)]
struct LoginResult {
    result: String,
    reason: Option<String>,
}

#[derive(Deserialize)]
struct EditResponse {
    edit: EditResult,
}

#[derive(Deserialize)]
struct EditResult {
    result: String,
}

#[derive(Deserialize)]
struct PagesResponse {
    query: PagesQuery,
}

#[derive(Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<RemotePage>,
}

#[derive(Deserialize)]
struct RemotePage {
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    revisions: Vec<Revision>,
}

#[derive(Deserialize)]
struct Revision {
    slots: Slots,
}

#[derive(Deserialize)]
struct Slots {
    main: MainSlot,
}

#[derive(Deserialize)]
struct MainSlot {
    #[serde(default)]
    content: String,
}

#[derive(Deserialize)]
struct ListedPage {
    title: String,
}

/// Page store backed by a live wiki.
pub struct MediaWikiStore {
    client: Client,
    config: MediaWikiConfig,
    csrf_token: Option<String>,
    last_request_at: Option<Instant>,
}

impl MediaWikiStore {
    pub fn new(config: MediaWikiConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            config,
            csrf_token: None,
            last_request_at: None,
        })
    }

    /// Log in with a bot password (`User@BotName`).
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), StoreError> {
        let tokens: TokensResponse = serde_json::from_value(self.get(&[
            ("action", "query"),
            ("meta", "tokens"),
            ("type", "login"),
        ])?)?;
        let login_token = tokens
            .query
            .tokens
            .logintoken
            .ok_or_else(|| StoreError::Login("no login token issued".into()))?;

        let response: LoginResponse = serde_json::from_value(self.post(&[
            ("action", "login"),
            ("lgname", username),
            ("lgpassword", password),
            ("lgtoken", login_token.as_str()),
        ])?)?;
        if response.login.result != "Success" {
            return Err(StoreError::Login(
                response.login.reason.unwrap_or(response.login.result),
            ));
        }
        info!(user = username, api = %self.config.api_url, "logged in");
        Ok(())
    }

    fn csrf_token(&mut self) -> Result<String, StoreError> {
        if let Some(token) = &self.csrf_token {
            return Ok(token.clone());
        }
        let tokens: TokensResponse =
            serde_json::from_value(self.get(&[("action", "query"), ("meta", "tokens")])?)?;
        let token = tokens
            .query
            .tokens
            .csrftoken
            .ok_or_else(|| StoreError::Other("no csrf token issued".into()))?;
        self.csrf_token = Some(token.clone());
        Ok(token)
    }

    fn wait_for_slot(&mut self) {
        if let Some(last) = self.last_request_at {
            let required = Duration::from_millis(self.config.rate_limit_ms);
            let elapsed = last.elapsed();
            if elapsed < required {
                sleep(required - elapsed);
            }
        }
        self.last_request_at = Some(Instant::now());
    }

    fn get(&mut self, params: &[(&str, &str)]) -> Result<Value, StoreError> {
        self.wait_for_slot();
        let resp = self
            .client
            .get(&self.config.api_url)
            .query(&[("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()?;
        Self::decode(resp)
    }

    fn post(&mut self, params: &[(&str, &str)]) -> Result<Value, StoreError> {
        self.wait_for_slot();
        let mut form: Vec<(&str, &str)> = vec![("format", "json"), ("formatversion", "2")];
        form.extend_from_slice(params);
        let resp = self.client.post(&self.config.api_url).form(&form).send()?;
        Self::decode(resp)
    }

    fn decode(resp: reqwest::blocking::Response) -> Result<Value, StoreError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(StoreError::Server {
                status: status.as_u16(),
                body,
            });
        }
        let payload: Value = resp.json()?;
        api_error(&payload).map_or(Ok(payload), Err)
    }

    /// Follow `continue` tokens of a `list=` query until exhausted.
    fn list_all(
        &mut self,
        list: &str,
        params: &[(&str, &str)],
        continue_key: &str,
    ) -> Result<Vec<String>, StoreError> {
        let mut titles = Vec::new();
        let mut next: Option<String> = None;
        loop {
            let mut query: Vec<(&str, &str)> = vec![("action", "query"), ("list", list)];
            query.extend_from_slice(params);
            if let Some(token) = &next {
                query.push((continue_key, token.as_str()));
            }
            let payload = self.get(&query)?;
            let rows: Vec<ListedPage> = serde_json::from_value(
                payload["query"][list].clone(),
            )?;
            titles.extend(rows.into_iter().map(|r| r.title));

            next = payload["continue"][continue_key].as_str().map(str::to_string);
            if next.is_none() {
                break;
            }
        }
        debug!(list, count = titles.len(), "listed pages");
        Ok(titles)
    }

    fn fetch(&mut self, title: &str) -> Result<Option<String>, StoreError> {
        let payload = self.get(&[
            ("action", "query"),
            ("titles", title),
            ("prop", "revisions"),
            ("rvprop", "content"),
            ("rvslots", "main"),
        ])?;
        Ok(page_content(serde_json::from_value(payload)?))
    }
}

/// The API's `error` object, if the payload carries one.
fn api_error(payload: &Value) -> Option<StoreError> {
    let error = payload.get("error")?;
    let field = |name: &str| {
        error
            .get(name)
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string()
    };
    Some(StoreError::Api {
        code: field("code"),
        info: field("info"),
    })
}

fn page_content(response: PagesResponse) -> Option<String> {
    let page = response.query.pages.into_iter().next()?;
    if page.missing {
        return None;
    }
    page.revisions.into_iter().next().map(|r| r.slots.main.content)
}

impl PageStore for MediaWikiStore {
    fn exists(&mut self, title: &str) -> Result<bool, StoreError> {
        Ok(self.fetch(title)?.is_some())
    }

    fn read(&mut self, title: &str) -> Result<String, StoreError> {
        self.fetch(title)?
            .ok_or_else(|| StoreError::PageNotFound(title.to_string()))
    }

    fn write(&mut self, title: &str, text: &str, summary: &str) -> Result<(), StoreError> {
        let token = self.csrf_token()?;
        let payload = self.post(&[
            ("action", "edit"),
            ("title", title),
            ("text", text),
            ("summary", summary),
            ("bot", "1"),
            ("token", token.as_str()),
        ])?;
        let response: EditResponse = serde_json::from_value(payload)?;
        if response.edit.result != "Success" {
            return Err(StoreError::EditRejected {
                title: title.to_string(),
                result: response.edit.result,
            });
        }
        info!(title, "saved page");
        Ok(())
    }

    fn pages_in_category(&mut self, category: &str) -> Result<Vec<String>, StoreError> {
        self.list_all(
            "categorymembers",
            &[("cmtitle", category), ("cmlimit", LIST_LIMIT)],
            "cmcontinue",
        )
    }

    fn pages_using_template(&mut self, name: &str) -> Result<Vec<String>, StoreError> {
        let title = format!("Template:{name}");
        self.list_all(
            "embeddedin",
            &[("eititle", title.as_str()), ("eilimit", LIST_LIMIT)],
            "eicontinue",
        )
    }
}
