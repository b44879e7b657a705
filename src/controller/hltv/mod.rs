pub mod client;
pub mod parse;

use crate::error::CoreError;
use crate::model::{RankingEntry, take_top};
use async_trait::async_trait;
use serde_json::Value;

pub use client::HttpHltvClient;

/// The three upstream sources the sync passes depend on.
#[async_trait]
pub trait HltvApiClient: Send + Sync {
    /// World ranking, best team first.
    async fn get_team_ranking(&self) -> Result<Vec<RankingEntry>, CoreError>;

    /// Team profile; shape is owned by the source and persisted as-is.
    async fn get_team(&self, id: i64) -> Result<Value, CoreError>;

    /// Team statistics, expected to carry at least `name` and `matches`.
    async fn get_team_stats(&self, id: i64) -> Result<Value, CoreError>;
}

/// # Errors
///
/// Will return `Err` if the ranking source fails
pub async fn fetch_top_ranking(
    api: &dyn HltvApiClient,
    top_n: usize,
) -> Result<Vec<RankingEntry>, CoreError> {
    let ranking = api.get_team_ranking().await?;
    Ok(take_top(ranking, top_n))
}
