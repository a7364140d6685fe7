pub mod diff;
pub mod gate;
pub mod history;
pub mod state;
pub mod syncer;

pub use diff::{items_difference, list_diff, ListDiff};
pub use gate::{decide, ActionKind, Decision};
pub use history::{plan_history, HistoryPlan};
pub use state::UserState;
pub use syncer::Syncer;

#[cfg(test)]
pub(crate) mod test_support;
