mod report;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use matchwiki_core::SyncConfig;
use matchwiki_core::config::DEFAULT_EDIT_SUMMARY;
use matchwiki_store::{MediaWikiConfig, MediaWikiStore};
use matchwiki_sync::{
    HttpJsonSource, JsonFileSource, MatchCollection, MatchSource, Reconciler, TemplateNormalizer,
    parse_source_date,
};
use tracing::{Level, info};

#[derive(Debug, Parser)]
#[command(
    name = "matchwiki",
    version,
    about = "Upload match statistics to the wiki as catalogue pages"
)]
struct Cli {
    /// JSON match export: a file path or an http(s) URL
    #[arg(long, env = "MATCHWIKI_SOURCE", value_name = "PATH|URL")]
    source: String,

    /// Full `api.php` URL of the wiki
    #[arg(long, env = "MATCHWIKI_API_URL")]
    api_url: String,

    /// Bot-password user (`User@BotName`)
    #[arg(long, env = "MATCHWIKI_USERNAME")]
    username: Option<String>,

    #[arg(long, env = "MATCHWIKI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Only the most recently played match
    #[arg(long, conflicts_with_all = ["after", "before"])]
    latest: bool,

    /// Only matches played on or after this day (dd.mm.yyyy)
    #[arg(long, value_parser = source_date)]
    after: Option<NaiveDate>,

    /// Only matches played on or before this day (dd.mm.yyyy)
    #[arg(long, value_parser = source_date)]
    before: Option<NaiveDate>,

    /// Reconcile every template field instead of only the player events
    #[arg(long)]
    full_diff: bool,

    /// Compute and log everything but write nothing
    #[arg(long)]
    dry_run: bool,

    /// Do not log field differences
    #[arg(long)]
    no_diff: bool,

    /// Force a new revision of existing pages (with --full-diff)
    #[arg(long)]
    refresh_pages: bool,

    /// Also reconcile every page already in the match category
    #[arg(long)]
    check_existing: bool,

    /// Edit summary for every save
    #[arg(long, default_value = DEFAULT_EDIT_SUMMARY)]
    summary: String,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            refresh_pages: self.refresh_pages,
            events_only: !self.full_diff,
            save: !self.dry_run,
            show_diff: !self.no_diff,
            check_existing_pages: self.check_existing,
            edit_summary: self.summary.clone(),
        }
    }

    fn match_source(&self) -> Box<dyn MatchSource> {
        if self.source.starts_with("http://") || self.source.starts_with("https://") {
            Box::new(HttpJsonSource::new(self.source.clone()))
        } else {
            Box::new(JsonFileSource::new(&self.source))
        }
    }

    fn selected_matches(&self) -> Result<MatchCollection> {
        let mut source = self.match_source();
        if self.latest {
            let latest = source
                .fetch_latest()
                .with_context(|| format!("reading latest match from {}", self.source))?;
            return Ok(MatchCollection::new(vec![latest]));
        }

        let mut matches = source
            .fetch_all()
            .with_context(|| format!("reading matches from {}", self.source))?;
        if let Some(day) = self.after {
            matches = matches.played_after(day);
        }
        if let Some(day) = self.before {
            matches = matches.played_before(day);
        }
        Ok(matches)
    }
}

fn source_date(s: &str) -> Result<NaiveDate, String> {
    parse_source_date(s).ok_or_else(|| format!("expected dd.mm.yyyy, got {s:?}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt().with_max_level(level).init();
    info!("matchwiki v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.sync_config();
    let matches = cli.selected_matches()?;
    info!(count = matches.len(), "matches selected");

    let mut store = MediaWikiStore::new(MediaWikiConfig::new(&cli.api_url).with_env_overrides())
        .context("building wiki client")?;
    match (&cli.username, &cli.password) {
        (Some(user), Some(password)) => store
            .login(user, password)
            .with_context(|| format!("logging in to {} as {user}", cli.api_url))?,
        _ if config.save => bail!("saving needs --username and --password (or --dry-run)"),
        _ => info!("no credentials, reading anonymously"),
    }

    let normalizer = TemplateNormalizer::new(config.edit_summary.clone());
    let mut reconciler = Reconciler::new(store, normalizer, &config);
    let report = matchwiki_sync::run(&mut reconciler, &matches).context("sync run aborted")?;

    print!("{}", report::render(&report));
    if !report.is_success() {
        bail!("{} of {} matches failed", report.failures.len(), report.processed());
    }
    Ok(())
}
