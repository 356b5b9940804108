//! One harvest run: fetch, normalize, reconcile, enrich, export.

use std::path::PathBuf;

use anyhow::Context;

use crate::batch::{run_batch, BatchOptions, BillStatus};
use crate::cli::Args;
use crate::config::Config;
use crate::congress::{
    build_http_client, BillCatalog, BulkDirCatalog, GovTrackClient, ProPublicaClient, SourceKind,
};
use crate::export::{table_prefix, write_tables};
use crate::identity::{
    enrich_followers, reconcile, EveryPoliticianRoster, FollowerLookup, RosterSource,
    TwitterFollowerLookup,
};

/// Collaborators for a run. Roster and follower lookups are optional.
pub struct Sources<'a> {
    pub catalog: &'a dyn BillCatalog,
    pub roster: Option<&'a dyn RosterSource>,
    pub followers: Option<&'a dyn FollowerLookup>,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub identifiers: usize,
    pub parsed: usize,
    pub failed: usize,
    pub legislators: usize,
    pub files: Vec<PathBuf>,
}

/// Build HTTP clients from config and run.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or the output
/// files cannot be written.
pub async fn run(args: &Args, config: &Config) -> anyhow::Result<RunSummary> {
    let http = build_http_client(config.http.timeout(), &config.http.user_agent)
        .context("failed to build HTTP client")?;

    let catalog: Box<dyn BillCatalog> = match (&args.data_dir, args.source) {
        (Some(dir), _) => {
            tracing::info!(dir = %dir.display(), "reading bills from local bulk mirror");
            Box::new(BulkDirCatalog::new(dir))
        }
        (None, SourceKind::GovTrack) => Box::new(GovTrackClient::with_client(
            http.clone(),
            &config.sources.govtrack.base_url,
        )),
        (None, SourceKind::ProPublica) => Box::new(ProPublicaClient::with_client(
            http.clone(),
            &config.sources.propublica.base_url,
            &config.sources.propublica.api_key,
        )),
    };

    let roster = (config.roster.enabled && !args.no_roster).then(|| {
        EveryPoliticianRoster::with_client(
            http.clone(),
            &config.roster.base_url,
            &config.roster.country,
            &config.roster.chamber,
        )
    });

    // Handles come from the roster, so no roster means nothing to look up
    let followers = (config.followers.enabled && roster.is_some()).then(|| {
        TwitterFollowerLookup::with_client(
            http.clone(),
            &config.followers.base_url,
            &config.followers.bearer_token,
        )
    });

    let sources = Sources {
        catalog: catalog.as_ref(),
        roster: roster.as_ref().map(|r| r as &dyn RosterSource),
        followers: followers.as_ref().map(|f| f as &dyn FollowerLookup),
    };

    run_with(args, config, &sources).await
}

/// Run against explicit collaborators.
///
/// Per-bill failures and roster or follower failures never abort the run.
///
/// # Errors
/// Returns an error only if the output files cannot be written.
pub async fn run_with(
    args: &Args,
    config: &Config,
    sources: &Sources<'_>,
) -> anyhow::Result<RunSummary> {
    let numbers = args.bill_numbers();
    let options = BatchOptions {
        bill_type: args.bill_type,
        congress: args.session,
        progress_every: usize::try_from(config.logging.progress_every).unwrap_or(1),
    };

    let output = run_batch(sources.catalog, &numbers, &options).await;

    let roster = match sources.roster {
        Some(source) => match source.fetch_roster(args.session).await {
            Ok(entries) => {
                tracing::info!(entries = entries.len(), "loaded legislator roster");
                entries
            }
            Err(e) => {
                tracing::warn!(error = %e, "roster unavailable, legislators left unmatched");
                Vec::new()
            }
        },
        None => {
            tracing::info!("roster join disabled");
            Vec::new()
        }
    };

    let mut legislators = reconcile(&output.sponsorships, &roster, &config.identity.overrides);

    if let Some(lookup) = sources.followers {
        enrich_followers(&mut legislators, lookup).await;
    }

    let dir = args.output_dir.as_ref().unwrap_or(&config.output.dir);
    let prefix = table_prefix(args.bill_type, args.session);
    let files = write_tables(dir, &prefix, &output, &legislators)
        .with_context(|| format!("failed to write tables to {}", dir.display()))?;

    let parsed = output.count(BillStatus::Parsed);
    Ok(RunSummary {
        identifiers: numbers.len(),
        parsed,
        failed: numbers.len() - parsed,
        legislators: legislators.len(),
        files,
    })
}
