use crate::model::StatsKeyScheme;
use std::time::Duration;

pub const HLTV_BASE_URL: &str = "https://www.hltv.org";
pub const DEFAULT_DATA_DIR: &str = "public/data";
pub const RANKING_FILE: &str = "teamRanking.json";
pub const TEAMS_FILE: &str = "teams.json";
pub const STATS_DIR: &str = "teamStats";
pub const DEFAULT_TOP_N: usize = 100;
pub const DEFAULT_DELAY: Duration = Duration::from_millis(180_000);
pub const DEFAULT_FANOUT: usize = 8;
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Knobs shared by the reconcile loop, the snapshot pass, and key migration.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub top_n: usize,
    pub delay: Duration,
    pub fanout: usize,
    pub ranking_file: String,
    pub teams_file: String,
    pub stats_dir: String,
    pub key_scheme: StatsKeyScheme,
    /// `None` keeps retrying until every team is valid or the run is cancelled.
    pub max_cycles: Option<u32>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            delay: DEFAULT_DELAY,
            fanout: DEFAULT_FANOUT,
            ranking_file: RANKING_FILE.to_string(),
            teams_file: TEAMS_FILE.to_string(),
            stats_dir: STATS_DIR.to_string(),
            key_scheme: StatsKeyScheme::default(),
            max_cycles: None,
        }
    }
}
