//! Command handlers for `search`, `history` and `login`.
//!
//! Each builds the HTTP providers and local stores from [`AppConfig`], runs
//! one journey through the search pipeline and prints the headless view.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use welp_core::AppConfig;
use welp_directory::{DirectoryClient, RetryPolicy};
use welp_geocode::GeocodeClient;
use welp_search::{
    sign_in_or_register, FixedLocator, HistoryStore, Identity, JsonlHistoryStore, LocalAccounts,
    LocationResolver, MemorySurface, RecentSearches, SearchOrchestrator, SearchSession, ViewEvent,
};

use crate::display;

type Orchestrator =
    SearchOrchestrator<FixedLocator, GeocodeClient, DirectoryClient, JsonlHistoryStore>;

pub(crate) struct SearchArgs<'a> {
    pub budget: &'a str,
    pub city: &'a str,
    pub zip: &'a str,
    pub email: Option<&'a str>,
    pub password: Option<&'a str>,
    pub select: Option<usize>,
}

fn history_dir(config: &AppConfig) -> PathBuf {
    config.data_dir.join("history")
}

fn accounts_path(config: &AppConfig) -> PathBuf {
    config.data_dir.join("accounts.json")
}

fn build_orchestrator(config: &AppConfig) -> anyhow::Result<Orchestrator> {
    let directory = DirectoryClient::with_base_url(
        &config.directory_api_key,
        config.request_timeout_secs,
        &config.directory_base_url,
    )
    .context("failed to build directory client")?
    .with_retry(RetryPolicy::from_config(config));

    let geocoder = GeocodeClient::with_base_url(
        &config.geocode_api_key,
        config.request_timeout_secs,
        &config.geocode_base_url,
    )
    .context("failed to build geocoding client")?;

    let resolver = LocationResolver::new(FixedLocator::new(config.device_position), geocoder)
        .with_timeouts(
            Duration::from_millis(config.geolocation_timeout_ms),
            Duration::from_millis(config.geocode_timeout_ms),
        );

    Ok(
        SearchOrchestrator::new(resolver, directory, JsonlHistoryStore::new(history_dir(config)))
            .with_min_budget(config.min_budget),
    )
}

async fn sign_in(config: &AppConfig, email: &str, password: &str) -> anyhow::Result<Identity> {
    let path = accounts_path(config);
    let accounts = LocalAccounts::open(&path)
        .await
        .with_context(|| format!("failed to open account store {}", path.display()))?;
    Ok(sign_in_or_register(&accounts, email, password).await?)
}

/// Converts a 1-based position from the command line to an index.
fn position_to_index(position: usize, what: &str) -> anyhow::Result<usize> {
    position
        .checked_sub(1)
        .with_context(|| format!("{what} numbers start at 1"))
}

/// Runs one submitted search and prints the results.
///
/// # Errors
///
/// Returns an error if the inputs are invalid, sign-in fails, or no listing
/// could be fetched for the city.
pub(crate) async fn run_search(config: &AppConfig, args: &SearchArgs<'_>) -> anyhow::Result<()> {
    let orchestrator = build_orchestrator(config)?;
    let mut session = SearchSession::new(MemorySurface::default());

    match (args.email, args.password) {
        (Some(email), Some(password)) => session.sign_in(sign_in(config, email, password).await?),
        (None, None) => {}
        _ => anyhow::bail!("--email and --password must be given together"),
    }

    let outcome = orchestrator
        .submit(&mut session, args.budget, args.city, args.zip)
        .await?;
    tracing::debug!(
        generation = outcome.generation,
        source = outcome.resolution.source(),
        history_written = outcome.history_written,
        "search rendered"
    );

    if let Some(position) = args.select {
        let index = position_to_index(position, "result")?;
        session.interact(ViewEvent::RowClick(index))?;
    }

    print!("{}", display::render_results(session.results(), session.view()));
    Ok(())
}

/// Prints the signed-in user's recent searches, replaying one if asked.
///
/// # Errors
///
/// Returns an error if sign-in fails, the history cannot be read, or the
/// replayed search fails.
pub(crate) async fn run_history(
    config: &AppConfig,
    email: &str,
    password: &str,
    replay: Option<usize>,
) -> anyhow::Result<()> {
    let identity = sign_in(config, email, password).await?;
    let orchestrator = build_orchestrator(config)?;

    let mut subscription = orchestrator
        .history()
        .subscribe(&identity.uid)
        .await
        .context("failed to read search history")?;
    let mut recent = RecentSearches::new();
    recent.drain(&mut subscription);

    let Some(position) = replay else {
        print!("{}", display::render_recent(&recent));
        return Ok(());
    };

    let index = position_to_index(position, "search")?;
    let entry = recent
        .get(index)
        .cloned()
        .with_context(|| format!("no recent search #{position} ({} saved)", recent.len()))?;

    let mut session = SearchSession::new(MemorySurface::default());
    session.sign_in(identity);
    orchestrator.replay(&mut session, &entry).await?;

    println!("Replaying: {}", entry.label());
    print!("{}", display::render_results(session.results(), session.view()));
    Ok(())
}

/// Signs in (registering if needed) and reports how many searches are saved.
///
/// # Errors
///
/// Returns an error if the credentials are invalid or the password is wrong.
pub(crate) async fn run_login(config: &AppConfig, email: &str, password: &str) -> anyhow::Result<()> {
    let identity = sign_in(config, email, password).await?;
    let history = JsonlHistoryStore::new(history_dir(config));
    let mut subscription = history
        .subscribe(&identity.uid)
        .await
        .context("failed to read search history")?;
    let mut recent = RecentSearches::new();
    recent.drain(&mut subscription);

    println!(
        "Signed in as {} ({} recent searches)",
        identity.email,
        recent.len()
    );
    Ok(())
}
