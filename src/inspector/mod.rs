pub(crate) mod primary_inspector;
pub(crate) mod standby_walker;

pub use primary_inspector::PrimaryInspector;
pub use standby_walker::{StandbyWalker, WalkSummary};
