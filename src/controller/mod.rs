pub mod hltv;
pub mod migrate;
pub mod reconcile;
pub mod snapshot;
