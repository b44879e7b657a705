//! Moves stats files between the id-keyed and name-keyed layouts.
//!
//! Only teams in the supplied ranking are considered, since the ranking is
//! what maps an id to a name. An existing file at the target key is never
//! overwritten; the source file is left in place for that team instead.

use crate::error::CoreError;
use crate::model::{RankingEntry, StatsKeyScheme};
use crate::storage::Storage;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    pub moved: usize,
    pub missing: usize,
    pub conflicts: usize,
}

/// # Errors
///
/// Will return `Err` if the storage cannot be queried or a rename fails
pub async fn migrate_stats_keys(
    storage: &dyn Storage,
    stats_dir: &str,
    ranking: &[RankingEntry],
    from: StatsKeyScheme,
    to: StatsKeyScheme,
) -> Result<MigrationSummary, CoreError> {
    let mut summary = MigrationSummary::default();
    if from == to {
        return Ok(summary);
    }

    for entry in ranking {
        let source = from.key(stats_dir, &entry.team);
        let target = to.key(stats_dir, &entry.team);

        if !storage.exists(&source).await? {
            summary.missing += 1;
            continue;
        }
        if storage.exists(&target).await? {
            warn!(%source, %target, "target already exists, leaving source in place");
            summary.conflicts += 1;
            continue;
        }

        storage.rename(&source, &target).await?;
        info!(%source, %target, "stats file moved");
        summary.moved += 1;
    }

    Ok(summary)
}
