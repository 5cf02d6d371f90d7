pub(crate) mod lag_checker;

pub use lag_checker::{LagChecker, RunSummary};
