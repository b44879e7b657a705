pub mod args;
pub mod config;
pub mod controller;
pub mod error;
pub mod logging;
pub mod model;
pub mod storage;

pub use controller::hltv::{HltvApiClient, HttpHltvClient};
pub use controller::reconcile::{LoopOutcome, Reconciler};
pub use controller::snapshot::Snapshot;
pub use error::CoreError;
pub use storage::{FsStorage, Storage};
