//! Run configuration shared by the reconciler and the batch runner.

/// Edit summary used when none is configured.
pub const DEFAULT_EDIT_SUMMARY: &str = "MaccabiBot - Uploading Games";

/// Category holding every published match page.
pub const MATCH_CATEGORY: &str = "קטגוריה:משחקים";

/// Flags for one run. Built once at startup and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Force a new revision of existing pages even when no field changed.
    pub refresh_pages: bool,
    /// On existing pages, rewrite only the players-events field.
    pub events_only: bool,
    /// Write pages at all. When off, everything is computed and logged only.
    pub save: bool,
    /// Log each field that differs from the stored page.
    pub show_diff: bool,
    /// After the new matches, also reconcile every page already in
    /// [`MATCH_CATEGORY`].
    pub check_existing_pages: bool,
    pub edit_summary: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            refresh_pages: false,
            events_only: true,
            save: true,
            show_diff: true,
            check_existing_pages: false,
            edit_summary: DEFAULT_EDIT_SUMMARY.to_string(),
        }
    }
}

impl SyncConfig {
    /// Same flags with writes turned off.
    pub fn dry_run(mut self) -> Self {
        self.save = false;
        self
    }

    /// Same flags reconciling every field instead of only the events.
    pub fn full_diff(mut self) -> Self {
        self.events_only = false;
        self
    }
}
