use crate::controller::hltv::HltvApiClient;
use crate::controller::hltv::parse::{parse_ranking, parse_team, parse_team_stats};
use crate::error::CoreError;
use crate::model::RankingEntry;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

// HLTV serves a challenge page to clients without a browser user agent.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub struct HttpHltvClient {
    client: Client,
    base_url: String,
}

impl HttpHltvClient {
    /// # Errors
    ///
    /// Will return `Err` if the http client cannot be built
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, CoreError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get_html(&self, path: &str) -> Result<String, CoreError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fetching page");

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CoreError::NotFound(url));
        }
        if !status.is_success() {
            return Err(CoreError::Network(format!("{url} returned {status}")));
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl HltvApiClient for HttpHltvClient {
    async fn get_team_ranking(&self) -> Result<Vec<RankingEntry>, CoreError> {
        let html = self.get_html("/ranking/teams").await?;
        parse_ranking(&html)
    }

    async fn get_team(&self, id: i64) -> Result<Value, CoreError> {
        let html = self.get_html(&format!("/team/{id}/-")).await?;
        let detail = parse_team(id, &html)?;
        Ok(serde_json::to_value(detail)?)
    }

    async fn get_team_stats(&self, id: i64) -> Result<Value, CoreError> {
        let overview = self.get_html(&format!("/stats/teams/{id}/-")).await?;
        let matches = self
            .get_html(&format!("/stats/teams/matches/{id}/-"))
            .await?;
        let stats = parse_team_stats(id, &overview, &matches)?;
        Ok(serde_json::to_value(stats)?)
    }
}
