pub mod arguments;
pub mod config;
pub mod events;
pub mod model;
pub mod naming;
pub mod wikitext;

#[cfg(test)]
mod testutil;

pub use arguments::{MATCH_TEMPLATE, TemplateArguments, TemplateField, build_arguments};
pub use config::{MATCH_CATEGORY, SyncConfig};
pub use events::{PlayerEventEntry, events_for};
pub use model::{EventKind, GoalType, MatchRecord, PlayerEventRecord, PlayerRecord, TeamRecord};
pub use naming::name_for;
pub use wikitext::{Document, TemplateEdit, TemplateView};
