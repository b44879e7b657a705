use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: i64,
    pub name: String,
}

/// One row of the world ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub team: TeamRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change: Option<i32>,
}

impl RankingEntry {
    #[must_use]
    pub fn new(rank: u32, id: i64, name: impl Into<String>) -> Self {
        Self {
            rank,
            team: TeamRef {
                id,
                name: name.into(),
            },
            points: None,
            change: None,
        }
    }
}

/// Keeps the first `top_n` rows in the order the source returned them.
#[must_use]
pub fn take_top(mut ranking: Vec<RankingEntry>, top_n: usize) -> Vec<RankingEntry> {
    ranking.truncate(top_n);
    ranking
}
