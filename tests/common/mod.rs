#![allow(dead_code)]

use async_trait::async_trait;
use hltv_sync::config::SyncConfig;
use hltv_sync::error::CoreError;
use hltv_sync::model::RankingEntry;
use hltv_sync::storage::{FsStorage, Storage, StorageError};
use hltv_sync::HltvApiClient;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};
use std::time::Duration;
use tempfile::TempDir;

static INIT: Once = Once::new();

/// Only installs a subscriber when `RUST_LOG` is set, so test output stays quiet.
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

pub fn ranking_of(count: u32) -> Vec<RankingEntry> {
    (1..=count)
        .map(|rank| RankingEntry::new(rank, i64::from(rank), format!("Team {rank}")))
        .collect()
}

pub fn valid_stats(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "overview": { "mapsPlayed": 10 },
        "matches": [
            { "date": "01/02/24", "event": "Major", "opponent": "Other", "map": "Mirage", "result": "13 - 7", "outcome": "W" }
        ]
    })
}

/// Short delay so looping tests finish quickly.
pub fn test_config() -> SyncConfig {
    SyncConfig {
        delay: Duration::from_millis(10),
        ..SyncConfig::default()
    }
}

pub fn temp_storage() -> (TempDir, FsStorage) {
    let dir = TempDir::new().expect("create temp dir");
    let storage = FsStorage::new(dir.path());
    (dir, storage)
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| entries.filter_map(Result::ok).count())
        .unwrap_or(0)
}

pub fn read_json_file(path: &Path) -> Value {
    let contents = std::fs::read_to_string(path).expect("read json file");
    serde_json::from_str(&contents).expect("parse json file")
}

/// In-memory stand-in for HLTV. Stats for a team come from its queue of
/// scripted responses; once the queue is empty a valid record is returned.
pub struct MockHltv {
    ranking: Mutex<Result<Vec<RankingEntry>, String>>,
    names: HashMap<i64, String>,
    stats: Mutex<HashMap<i64, VecDeque<Result<Value, CoreError>>>>,
    teams: Mutex<HashMap<i64, Result<Value, String>>>,
    latency: Duration,
    stats_calls: Mutex<Vec<i64>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockHltv {
    pub fn new(ranking: Vec<RankingEntry>) -> Self {
        let names = ranking
            .iter()
            .map(|entry| (entry.team.id, entry.team.name.clone()))
            .collect();
        Self {
            ranking: Mutex::new(Ok(ranking)),
            names,
            stats: Mutex::new(HashMap::new()),
            teams: Mutex::new(HashMap::new()),
            latency: Duration::ZERO,
            stats_calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn failing_ranking(message: &str) -> Self {
        let mock = Self::new(Vec::new());
        *mock.ranking.lock().unwrap() = Err(message.to_string());
        mock
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn queue_stats(&self, id: i64, response: Result<Value, String>) {
        self.queue_stats_result(id, response.map_err(CoreError::Other));
    }

    pub fn queue_stats_result(&self, id: i64, response: Result<Value, CoreError>) {
        self.stats
            .lock()
            .unwrap()
            .entry(id)
            .or_default()
            .push_back(response);
    }

    pub fn set_team(&self, id: i64, response: Result<Value, String>) {
        self.teams.lock().unwrap().insert(id, response);
    }

    pub fn stats_calls(&self) -> Vec<i64> {
        self.stats_calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HltvApiClient for MockHltv {
    async fn get_team_ranking(&self) -> Result<Vec<RankingEntry>, CoreError> {
        self.ranking
            .lock()
            .unwrap()
            .clone()
            .map_err(CoreError::Network)
    }

    async fn get_team(&self, id: i64) -> Result<Value, CoreError> {
        let scripted = self.teams.lock().unwrap().get(&id).cloned();
        match scripted {
            Some(response) => response.map_err(CoreError::Other),
            None => Ok(json!({
                "id": id,
                "name": self.names.get(&id).cloned().unwrap_or_default(),
                "logo": format!("https://img.example/{id}.png"),
                "news": [{ "name": "headline", "link": "/news/1" }]
            })),
        }
    }

    async fn get_team_stats(&self, id: i64) -> Result<Value, CoreError> {
        self.stats_calls.lock().unwrap().push(id);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let scripted = self
            .stats
            .lock()
            .unwrap()
            .get_mut(&id)
            .and_then(VecDeque::pop_front);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match scripted {
            Some(response) => response,
            None => Ok(valid_stats(
                id,
                self.names.get(&id).map_or("", String::as_str),
            )),
        }
    }
}

/// Filesystem storage that counts writes.
pub struct CountingStorage {
    pub inner: FsStorage,
    writes: AtomicUsize,
}

impl CountingStorage {
    pub fn new(inner: FsStorage) -> Self {
        Self {
            inner,
            writes: AtomicUsize::new(0),
        }
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for CountingStorage {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.inner.exists(key).await
    }

    async fn read_json(&self, key: &str) -> Result<Value, StorageError> {
        self.inner.read_json(key).await
    }

    async fn write_json(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write_json(key, value).await
    }

    async fn ensure_dir(&self, dir: &str) -> Result<(), StorageError> {
        self.inner.ensure_dir(dir).await
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), StorageError> {
        self.inner.rename(from, to).await
    }
}

/// Filesystem storage that fails `write_json` or `exists` for chosen keys.
pub struct FaultyStorage {
    pub inner: FsStorage,
    failing_writes: Mutex<HashSet<String>>,
    failing_exists: Mutex<HashSet<String>>,
}

impl FaultyStorage {
    pub fn new(inner: FsStorage) -> Self {
        Self {
            inner,
            failing_writes: Mutex::new(HashSet::new()),
            failing_exists: Mutex::new(HashSet::new()),
        }
    }

    pub fn fail_writes_to(&self, key: &str) {
        self.failing_writes.lock().unwrap().insert(key.to_string());
    }

    pub fn allow_writes_to(&self, key: &str) {
        self.failing_writes.lock().unwrap().remove(key);
    }

    pub fn fail_exists_for(&self, key: &str) {
        self.failing_exists.lock().unwrap().insert(key.to_string());
    }
}

#[async_trait]
impl Storage for FaultyStorage {
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        if self.failing_exists.lock().unwrap().contains(key) {
            return Err(StorageError::new(format!("stat {key}: permission denied")));
        }
        self.inner.exists(key).await
    }

    async fn read_json(&self, key: &str) -> Result<Value, StorageError> {
        self.inner.read_json(key).await
    }

    async fn write_json(&self, key: &str, value: &Value) -> Result<(), StorageError> {
        if self.failing_writes.lock().unwrap().contains(key) {
            return Err(StorageError::new(format!("write {key}: disk full")));
        }
        self.inner.write_json(key, value).await
    }

    async fn ensure_dir(&self, dir: &str) -> Result<(), StorageError> {
        self.inner.ensure_dir(dir).await
    }

    async fn rename(&self, from: &str, to: &str) -> Result<(), StorageError> {
        self.inner.rename(from, to).await
    }
}
