//! Sync layer: match sources, page reconciliation, existing-page discovery
//! and the batch run that ties them together.

mod error;
pub use error::SyncError;

pub mod batch;
pub mod discovery;
pub mod normalize;
pub mod reconcile;
pub mod source;

#[cfg(feature = "http")]
pub mod http;

#[cfg(test)]
mod testutil;

pub use batch::{MatchFailure, RunReport, run};
pub use discovery::{matches_with_pages, title_date};
#[cfg(feature = "http")]
pub use http::HttpJsonSource;
pub use normalize::{NoopNormalizer, PageNormalizer, TemplateNormalizer};
pub use reconcile::{Outcome, Reconciler};
pub use source::{JsonFileSource, MatchCollection, MatchSource, parse_source_date};
