//! Incomplete-data reconciliation.
//!
//! Each cycle fetches the ranking, checks which stats files are already
//! valid, re-fetches only the rest, and writes exactly one file per retried
//! team (real stats or a fallback record). Cycles repeat after a fixed delay
//! until a check finds nothing left to fetch, the cycle limit is hit, or the
//! run is cancelled.

use crate::config::SyncConfig;
use crate::controller::hltv::{HltvApiClient, fetch_top_ranking};
use crate::error::CoreError;
use crate::model::{
    FallbackRecord, INCOMPLETE_STATS_MESSAGE, RankingEntry, TeamRef, backfill_name,
    is_stats_valid,
};
use crate::storage::Storage;
use futures::{StreamExt, stream};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
pub struct Partition {
    pub valid: Vec<RankingEntry>,
    pub incomplete: Vec<RankingEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeamFetchOutcome {
    Saved,
    Fallback { message: String },
    WriteFailed { message: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleOutcome {
    pub ranked: usize,
    pub valid: usize,
    pub incomplete: usize,
    pub saved: usize,
    pub fallbacks: usize,
    pub write_failures: usize,
}

impl CycleOutcome {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.incomplete == 0
    }

    fn record(&mut self, outcome: &TeamFetchOutcome) {
        match outcome {
            TeamFetchOutcome::Saved => self.saved += 1,
            TeamFetchOutcome::Fallback { .. } => self.fallbacks += 1,
            TeamFetchOutcome::WriteFailed { .. } => self.write_failures += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopOutcome {
    /// A validity check found every team complete.
    Complete { cycles: u32 },
    Cancelled { cycles: u32 },
    /// The configured cycle limit ran out with teams still incomplete.
    Exhausted { cycles: u32 },
}

pub struct Reconciler<'a> {
    api: &'a dyn HltvApiClient,
    storage: &'a dyn Storage,
    config: SyncConfig,
}

impl<'a> Reconciler<'a> {
    #[must_use]
    pub fn new(api: &'a dyn HltvApiClient, storage: &'a dyn Storage, config: SyncConfig) -> Self {
        Self {
            api,
            storage,
            config,
        }
    }

    #[must_use]
    pub fn stats_key(&self, team: &TeamRef) -> String {
        self.config.key_scheme.key(&self.config.stats_dir, team)
    }

    /// Runs cycles until every team is valid, the cycle limit is reached, or
    /// `cancel` fires. Cancellation is observed before a cycle starts and
    /// during the wait; an in-flight cycle always finishes its writes.
    ///
    /// # Errors
    ///
    /// Will return `Err` if fetching the ranking or preparing the stats directory fails
    pub async fn run(&self, cancel: &CancellationToken) -> Result<LoopOutcome, CoreError> {
        let mut cycles = 0_u32;
        loop {
            if cancel.is_cancelled() {
                info!(cycles, "reconcile cancelled");
                return Ok(LoopOutcome::Cancelled { cycles });
            }

            let outcome = match self.run_cycle().await {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(error = %err, "error processing team stats");
                    return Err(err);
                }
            };
            cycles += 1;

            if outcome.is_complete() {
                return Ok(LoopOutcome::Complete { cycles });
            }
            if self.config.max_cycles.is_some_and(|max| cycles >= max) {
                warn!(
                    cycles,
                    incomplete = outcome.incomplete,
                    "cycle limit reached with incomplete teams"
                );
                return Ok(LoopOutcome::Exhausted { cycles });
            }

            info!(
                delay_secs = self.config.delay.as_secs_f64(),
                "waiting before re-checking incomplete teams"
            );
            tokio::select! {
                () = cancel.cancelled() => {
                    info!(cycles, "reconcile cancelled during wait");
                    return Ok(LoopOutcome::Cancelled { cycles });
                }
                () = tokio::time::sleep(self.config.delay) => {}
            }
        }
    }

    /// One fetch-check-retry-write pass.
    ///
    /// # Errors
    ///
    /// Will return `Err` if fetching the ranking or preparing the stats directory fails
    pub async fn run_cycle(&self) -> Result<CycleOutcome, CoreError> {
        let ranking = fetch_top_ranking(self.api, self.config.top_n).await?;
        info!(teams = ranking.len(), "processing top teams");

        self.storage.ensure_dir(&self.config.stats_dir).await?;

        let partition = self.check_validity(&ranking).await;
        let mut outcome = CycleOutcome {
            ranked: ranking.len(),
            valid: partition.valid.len(),
            incomplete: partition.incomplete.len(),
            ..CycleOutcome::default()
        };

        if partition.incomplete.is_empty() {
            info!("all team stats are valid");
            return Ok(outcome);
        }

        info!(
            incomplete = partition.incomplete.len(),
            "found teams with incomplete stats, fetching"
        );

        let results: Vec<TeamFetchOutcome> = stream::iter(
            partition
                .incomplete
                .iter()
                .map(|entry| self.fetch_stats_for_team(entry)),
        )
        .buffer_unordered(self.config.fanout.max(1))
        .collect()
        .await;

        for result in &results {
            outcome.record(result);
        }

        info!(
            saved = outcome.saved,
            fallbacks = outcome.fallbacks,
            write_failures = outcome.write_failures,
            "cycle finished"
        );
        Ok(outcome)
    }

    /// Splits the ranking by whether each team already has a valid stats file.
    /// Unreadable or unparseable files count as incomplete.
    pub async fn check_validity(&self, ranking: &[RankingEntry]) -> Partition {
        let mut partition = Partition::default();
        for entry in ranking {
            let key = self.stats_key(&entry.team);
            if self.has_valid_file(&key).await {
                partition.valid.push(entry.clone());
            } else {
                partition.incomplete.push(entry.clone());
            }
        }
        partition
    }

    async fn has_valid_file(&self, key: &str) -> bool {
        match self.storage.exists(key).await {
            Ok(true) => {}
            Ok(false) => return false,
            Err(err) => {
                debug!(key, error = %err, "stats file not checkable");
                return false;
            }
        }
        match self.storage.read_json(key).await {
            Ok(existing) => is_stats_valid(&existing),
            Err(err) => {
                debug!(key, error = %err, "stats file unreadable, treating as incomplete");
                false
            }
        }
    }

    /// Fetches one team's stats and writes either the stats or a fallback record.
    /// A fallback's message is the error's `Display`, so it starts with the kind
    /// (`network error: ...`).
    pub async fn fetch_stats_for_team(&self, entry: &RankingEntry) -> TeamFetchOutcome {
        let team = &entry.team;
        let payload = match self.api.get_team_stats(team.id).await {
            Ok(mut stats) if is_stats_valid(&stats) => {
                backfill_name(&mut stats, &team.name);
                Ok(stats)
            }
            Ok(_) => Err(INCOMPLETE_STATS_MESSAGE.to_string()),
            Err(err) => Err(err.to_string()),
        };
        write_stats(self.storage, &self.stats_key(team), team, payload).await
    }
}

/// Persists fetched stats, or a fallback record carrying `Err`'s message.
pub(crate) async fn write_stats(
    storage: &dyn Storage,
    key: &str,
    team: &TeamRef,
    payload: Result<Value, String>,
) -> TeamFetchOutcome {
    let (value, outcome) = match payload {
        Ok(stats) => (stats, TeamFetchOutcome::Saved),
        Err(message) => {
            warn!(
                team = %team.name,
                id = team.id,
                error = %message,
                "error fetching stats for team"
            );
            let fallback = FallbackRecord::new(team, message.clone());
            (fallback.to_value(), TeamFetchOutcome::Fallback { message })
        }
    };

    match storage.write_json(key, &value).await {
        Ok(()) => {
            if outcome == TeamFetchOutcome::Saved {
                info!(team = %team.name, path = key, "stats saved");
            }
            outcome
        }
        Err(err) => {
            error!(team = %team.name, path = key, error = %err, "failed to write stats file");
            TeamFetchOutcome::WriteFailed {
                message: err.to_string(),
            }
        }
    }
}
