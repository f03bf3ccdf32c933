use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("page not found: {0}")]
    PageNotFound(String),

    #[error("login failed: {0}")]
    Login(String),

    #[error("API error [{code}]: {info}")]
    Api { code: String, info: String },

    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("edit of {title} rejected: {result}")]
    EditRejected { title: String, result: String },

    #[cfg(feature = "mediawiki")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[cfg(feature = "mediawiki")]
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}
