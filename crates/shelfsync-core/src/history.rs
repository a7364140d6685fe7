use anyhow::{Context, Result};
use shelfsync_clients::TrackerClient;
use shelfsync_models::TrackerItem;

use crate::diff::ListDiff;

/// History batches derived from a ratings diff.
#[derive(Debug, Default)]
pub struct HistoryPlan {
    pub add: Vec<TrackerItem>,
    pub remove: Vec<TrackerItem>,
}

/// Derive implicit watch history from the ratings diff.
///
/// The catalog has no native history concept, so a submitted rating is taken
/// to mean the item was watched. A rating appearing on the catalog side adds a
/// history entry unless the tracker already has one for that item; a rating
/// disappearing removes history only where entries actually exist. One history
/// lookup is issued per changed item, sequentially; the first identity or
/// lookup failure aborts the whole plan.
pub fn plan_history(tracker: &dyn TrackerClient, ratings_diff: &ListDiff) -> Result<HistoryPlan> {
    let mut plan = HistoryPlan::default();
    for item in &ratings_diff.add {
        let item_id = resolve_item_id(item)?;
        let entries = tracker.history(item.media_type, item_id).with_context(|| {
            format!(
                "failure fetching tracker history for {} {item_id}",
                item.media_type
            )
        })?;
        if entries.is_empty() {
            plan.add.push(item.clone());
        }
    }
    for item in &ratings_diff.remove {
        let item_id = resolve_item_id(item)?;
        let entries = tracker.history(item.media_type, item_id).with_context(|| {
            format!(
                "failure fetching tracker history for {} {item_id}",
                item.media_type
            )
        })?;
        if !entries.is_empty() {
            plan.remove.push(item.clone());
        }
    }
    Ok(plan)
}

/// A tracker item with no catalog id cannot participate in diffs or history
/// lookups; dropping it silently would break the sync's completeness
/// guarantee, so resolution failure is an error.
pub(crate) fn resolve_item_id(item: &TrackerItem) -> Result<&str> {
    item.item_id().ok_or_else(|| {
        anyhow::anyhow!("failure resolving catalog identity for {} item", item.media_type)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{history_entry, tracker_item, MockTracker};

    #[test]
    fn test_new_rating_without_history_is_planned_once() {
        let tracker = MockTracker::default();
        let diff = ListDiff {
            add: vec![tracker_item("tt1")],
            remove: vec![],
        };
        let plan = plan_history(&tracker, &diff).unwrap();
        assert_eq!(plan.add.len(), 1);
        assert_eq!(plan.add[0].item_id(), Some("tt1"));
        assert!(plan.remove.is_empty());
    }

    #[test]
    fn test_already_watched_item_excluded_from_additions() {
        let mut tracker = MockTracker::default();
        tracker
            .history_entries
            .insert("tt1".to_string(), vec![history_entry(1)]);
        let diff = ListDiff {
            add: vec![tracker_item("tt1")],
            remove: vec![],
        };
        let plan = plan_history(&tracker, &diff).unwrap();
        assert!(plan.add.is_empty());
    }

    #[test]
    fn test_removal_requires_existing_entries() {
        let mut tracker = MockTracker::default();
        tracker
            .history_entries
            .insert("tt1".to_string(), vec![history_entry(1)]);
        let diff = ListDiff {
            add: vec![],
            remove: vec![tracker_item("tt1"), tracker_item("tt2")],
        };
        let plan = plan_history(&tracker, &diff).unwrap();
        assert_eq!(plan.remove.len(), 1);
        assert_eq!(plan.remove[0].item_id(), Some("tt1"));
    }

    #[test]
    fn test_unresolvable_identity_aborts_plan() {
        let tracker = MockTracker::default();
        let mut nameless = tracker_item("tt1");
        nameless.ids.catalog = None;
        let diff = ListDiff {
            add: vec![nameless, tracker_item("tt2")],
            remove: vec![],
        };
        assert!(plan_history(&tracker, &diff).is_err());
        // Fail-fast: the second item is never looked up.
        assert!(tracker.calls.borrow().history_lookups.is_empty());
    }
}
