use crate::model::ranking::TeamRef;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsLink {
    pub name: String,
    pub link: String,
}

/// Team profile as scraped from the team page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDetail {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub country: Option<String>,
    pub rank: Option<u32>,
    pub players: Vec<PlayerRef>,
    pub news: Vec<NewsLink>,
}

/// Entry written into `teams.json` when a team's detail page could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFallback {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
    pub error: bool,
}

impl TeamFallback {
    #[must_use]
    pub fn new(team: &TeamRef) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
            logo: None,
            error: true,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "name": self.name,
            "logo": self.logo,
            "error": self.error,
        })
    }
}

/// Drops the `news` list from a team detail record, if it has one.
pub fn strip_news(detail: &mut Value) {
    if let Some(record) = detail.as_object_mut() {
        record.remove("news");
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsOverview {
    pub maps_played: Option<u32>,
    pub wins: Option<u32>,
    pub draws: Option<u32>,
    pub losses: Option<u32>,
    pub total_kills: Option<u32>,
    pub total_deaths: Option<u32>,
    pub rounds_played: Option<u32>,
    pub kd_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub date: String,
    pub event: String,
    pub opponent: String,
    pub map: String,
    pub result: String,
    pub outcome: String,
}

/// Team statistics as scraped from the stats pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub id: i64,
    pub name: String,
    pub overview: StatsOverview,
    pub matches: Vec<MatchResult>,
}
