mod approval;
mod ballot;
pub mod builder;
mod config;
mod election;
mod logs;
pub mod manual;
pub mod permutation;
mod star;
mod summary;
mod tiebreak;

pub use crate::ballot::{classify, BallotStatus, InvalidReason};
pub use crate::config::*;
pub use crate::election::{approval, plurality, run_election, star};
pub use crate::logs::TabulationLog;
