//! One-shot pass that writes the ranking, team details, and stats for every
//! ranked team without consulting what is already on disk.

use crate::config::SyncConfig;
use crate::controller::hltv::{HltvApiClient, fetch_top_ranking};
use crate::controller::reconcile::{TeamFetchOutcome, write_stats};
use crate::error::CoreError;
use crate::model::{RankingEntry, TeamFallback, backfill_name, strip_news};
use crate::storage::Storage;
use chrono::{DateTime, Utc};
use futures::{StreamExt, stream};
use serde_json::Value;
use tracing::{info, warn};

/// Per-team stats file results for one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsWrites {
    pub saved: usize,
    pub fallbacks: usize,
    pub write_failures: usize,
}

impl StatsWrites {
    fn record(&mut self, outcome: &TeamFetchOutcome) {
        match outcome {
            TeamFetchOutcome::Saved => self.saved += 1,
            TeamFetchOutcome::Fallback { .. } => self.fallbacks += 1,
            TeamFetchOutcome::WriteFailed { .. } => self.write_failures += 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotSummary {
    pub fetched_at: DateTime<Utc>,
    pub teams: usize,
    pub team_fallbacks: usize,
    pub stats: StatsWrites,
}

pub struct Snapshot<'a> {
    api: &'a dyn HltvApiClient,
    storage: &'a dyn Storage,
    config: SyncConfig,
}

impl<'a> Snapshot<'a> {
    #[must_use]
    pub fn new(api: &'a dyn HltvApiClient, storage: &'a dyn Storage, config: SyncConfig) -> Self {
        Self {
            api,
            storage,
            config,
        }
    }

    /// # Errors
    ///
    /// Will return `Err` if the ranking fetch fails or the ranking or teams file cannot be written
    pub async fn run(&self) -> Result<SnapshotSummary, CoreError> {
        let fetched_at = Utc::now();
        let ranking = fetch_top_ranking(self.api, self.config.top_n).await?;

        self.storage
            .write_json(&self.config.ranking_file, &serde_json::to_value(&ranking)?)
            .await?;
        info!(path = %self.config.ranking_file, teams = ranking.len(), "ranking data saved");

        let details: Vec<(Value, bool)> = stream::iter(
            ranking.iter().map(|entry| self.fetch_team_detail(entry)),
        )
        .buffered(self.config.fanout.max(1))
        .collect()
        .await;
        let team_fallbacks = details.iter().filter(|(_, failed)| *failed).count();
        let teams: Vec<Value> = details.into_iter().map(|(detail, _)| detail).collect();

        self.storage
            .write_json(&self.config.teams_file, &Value::Array(teams))
            .await?;
        info!(path = %self.config.teams_file, team_fallbacks, "teams data saved");

        self.storage.ensure_dir(&self.config.stats_dir).await?;

        let results: Vec<TeamFetchOutcome> = stream::iter(
            ranking.iter().map(|entry| self.fetch_stats_for_team(entry)),
        )
        .buffer_unordered(self.config.fanout.max(1))
        .collect()
        .await;

        let mut stats = StatsWrites::default();
        for result in &results {
            stats.record(result);
        }

        info!(
            saved = stats.saved,
            fallbacks = stats.fallbacks,
            write_failures = stats.write_failures,
            "snapshot finished"
        );

        Ok(SnapshotSummary {
            fetched_at,
            teams: ranking.len(),
            team_fallbacks,
            stats,
        })
    }

    /// Returns the detail record (news stripped) or a fallback, and whether it fell back.
    async fn fetch_team_detail(&self, entry: &RankingEntry) -> (Value, bool) {
        match self.api.get_team(entry.team.id).await {
            Ok(mut detail) => {
                strip_news(&mut detail);
                (detail, false)
            }
            Err(err) => {
                warn!(id = entry.team.id, error = %err, "error fetching team");
                (TeamFallback::new(&entry.team).to_value(), true)
            }
        }
    }

    async fn fetch_stats_for_team(&self, entry: &RankingEntry) -> TeamFetchOutcome {
        let team = &entry.team;
        let key = self.config.key_scheme.key(&self.config.stats_dir, team);
        let payload = self
            .api
            .get_team_stats(team.id)
            .await
            .map(|mut stats| {
                backfill_name(&mut stats, &team.name);
                stats
            })
            .map_err(|err| err.to_string());
        write_stats(self.storage, &key, team, payload).await
    }
}
