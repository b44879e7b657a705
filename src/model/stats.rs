use crate::model::ranking::TeamRef;
use crate::model::utils::normalize_team_name;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INCOMPLETE_STATS_MESSAGE: &str =
    "Incomplete stats: empty team name or empty matches array";

/// How a team's stats file is named inside the stats directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StatsKeyScheme {
    /// `<normalized-name>.json`
    #[default]
    Name,
    /// `<id>.json`
    Id,
}

impl StatsKeyScheme {
    #[must_use]
    pub fn file_name(self, team: &TeamRef) -> String {
        match self {
            Self::Name => format!("{}.json", normalize_team_name(&team.name)),
            Self::Id => format!("{}.json", team.id),
        }
    }

    #[must_use]
    pub fn key(self, stats_dir: &str, team: &TeamRef) -> String {
        format!("{}/{}", stats_dir.trim_end_matches('/'), self.file_name(team))
    }
}

/// Written instead of a stats record when a fetch fails or returns unusable data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackRecord {
    pub error: bool,
    pub message: String,
    pub id: i64,
    pub name: String,
}

impl FallbackRecord {
    #[must_use]
    pub fn new(team: &TeamRef, message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            id: team.id,
            name: team.name.clone(),
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "error": self.error,
            "message": self.message,
            "id": self.id,
            "name": self.name,
        })
    }
}

/// A stats record is usable when it carries no `error` flag, a non-blank
/// `name`, and at least one entry in `matches`.
#[must_use]
pub fn is_stats_valid(stats: &Value) -> bool {
    let Some(record) = stats.as_object() else {
        return false;
    };

    if record.get("error").is_some_and(is_truthy) {
        return false;
    }

    let has_name = record
        .get("name")
        .and_then(Value::as_str)
        .is_some_and(|name| !name.trim().is_empty());
    let has_matches = record
        .get("matches")
        .and_then(Value::as_array)
        .is_some_and(|matches| !matches.is_empty());

    has_name && has_matches
}

/// Fills in `name` from the ranking when the source left it out or blank.
pub fn backfill_name(stats: &mut Value, team_name: &str) {
    let Some(record) = stats.as_object_mut() else {
        return;
    };
    let missing = record
        .get("name")
        .and_then(Value::as_str)
        .is_none_or(|name| name.trim().is_empty());
    if missing {
        record.insert("name".to_string(), Value::String(team_name.to_string()));
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
