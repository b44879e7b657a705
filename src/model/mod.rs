pub mod ranking;
pub mod stats;
pub mod team;
pub mod utils;

pub use ranking::*;
pub use stats::*;
pub use team::*;
pub use utils::*;
