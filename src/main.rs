use anyhow::{Context, Result};
use hltv_sync::args::{self, Mode};
use hltv_sync::controller::hltv::fetch_top_ranking;
use hltv_sync::controller::migrate::migrate_stats_keys;
use hltv_sync::logging::init_logging;
use hltv_sync::model::StatsKeyScheme;
use hltv_sync::{FsStorage, HttpHltvClient, LoopOutcome, Reconciler, Snapshot};
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let args = args::args_checks()?;

    let storage = FsStorage::new(args.data_dir.clone());
    let client = HttpHltvClient::new(&args.base_url, args.timeout)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            ctrl_c.cancel();
        }
    });

    info!(
        mode = ?args.mode,
        data_dir = %args.data_dir.display(),
        top_n = args.sync.top_n,
        "starting"
    );

    match args.mode {
        Mode::Reconcile => {
            let reconciler = Reconciler::new(&client, &storage, args.sync);
            let outcome = reconciler
                .run(&cancel)
                .await
                .context("processing team stats")?;
            match outcome {
                LoopOutcome::Complete { cycles } => info!(cycles, "all team stats are valid"),
                LoopOutcome::Cancelled { cycles } => info!(cycles, "stopped before completion"),
                LoopOutcome::Exhausted { cycles } => {
                    anyhow::bail!("team stats still incomplete after {cycles} cycles")
                }
            }
        }
        Mode::Snapshot => {
            let snapshot = Snapshot::new(&client, &storage, args.sync);
            let summary = snapshot.run().await.context("fetching all teams")?;
            info!(
                fetched_at = %summary.fetched_at.to_rfc3339(),
                teams = summary.teams,
                team_fallbacks = summary.team_fallbacks,
                stats_fallbacks = summary.stats.fallbacks,
                "snapshot written"
            );
        }
        Mode::Migrate => {
            let to = args.sync.key_scheme;
            let from = match to {
                StatsKeyScheme::Name => StatsKeyScheme::Id,
                StatsKeyScheme::Id => StatsKeyScheme::Name,
            };
            let ranking = fetch_top_ranking(&client, args.sync.top_n)
                .await
                .context("fetching ranking for migration")?;
            let summary =
                migrate_stats_keys(&storage, &args.sync.stats_dir, &ranking, from, to).await?;
            info!(
                moved = summary.moved,
                missing = summary.missing,
                conflicts = summary.conflicts,
                "migration finished"
            );
        }
    }

    Ok(())
}
