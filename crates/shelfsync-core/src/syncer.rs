use anyhow::{Context, Result};
use shelfsync_clients::{CatalogClient, ClientError, ListFetch, TrackerClient};
use shelfsync_config::SyncOptions;
use shelfsync_models::{infer_list_slug, IdMeta, TrackerItem};
use tracing::info;

use crate::diff::{items_difference, list_diff};
use crate::gate::{decide, ActionKind, Decision};
use crate::history;
use crate::state::UserState;

/// Runs one reconciliation pass: hydrate both services into a `UserState`,
/// then correct the tracker domain by domain. Stages run strictly in order
/// and the first stage failure aborts the run.
pub struct Syncer {
    catalog: Box<dyn CatalogClient>,
    tracker: Box<dyn TrackerClient>,
    user: UserState,
    conf: SyncOptions,
    /// No catalog credentials: ratings and history cannot be read at all, and
    /// the tracker's watchlist/ratings reads are skipped alongside them.
    /// Ordinary lists still sync via read-only export.
    authless: bool,
}

impl Syncer {
    pub fn new(
        catalog: Box<dyn CatalogClient>,
        tracker: Box<dyn TrackerClient>,
        conf: SyncOptions,
        list_ids: &[String],
        authless: bool,
    ) -> Self {
        let user = UserState::for_run(&conf, list_ids);
        Self {
            catalog,
            tracker,
            user,
            conf,
            authless,
        }
    }

    pub fn sync(&mut self) -> Result<()> {
        info!(mode = %self.conf.mode, "sync started");
        self.hydrate().context("failure hydrating user state")?;
        self.sync_lists().context("failure syncing lists")?;
        self.sync_ratings().context("failure syncing ratings")?;
        self.sync_history().context("failure syncing history")?;
        info!("sync completed");
        Ok(())
    }

    /// Read both services exactly once. Catalog exports are triggered first so
    /// the fetched data is freshly regenerated.
    fn hydrate(&mut self) -> Result<()> {
        info!("hydration started");
        let list_ids: Vec<String> = self.user.catalog_lists.keys().cloned().collect();
        if self.conf.ratings && !self.authless {
            self.catalog
                .ratings_export()
                .context("failure exporting catalog ratings")?;
        }
        if self.conf.lists {
            self.catalog
                .lists_export(&list_ids)
                .context("failure exporting catalog lists")?;
        }
        if self.conf.watchlist && !self.authless {
            self.catalog
                .watchlist_export()
                .context("failure exporting catalog watchlist")?;
        }
        if self.conf.lists {
            let catalog_lists = self
                .catalog
                .lists(&list_ids)
                .context("failure fetching catalog lists")?;
            let mut metas = Vec::with_capacity(catalog_lists.len());
            for list in catalog_lists {
                metas.push(IdMeta::for_list(list.list_id.clone(), list.name.clone()));
                self.user.catalog_lists.insert(list.list_id.clone(), list);
            }
            let fetches = self
                .tracker
                .lists(&metas)
                .context("failure hydrating tracker lists")?;
            for fetch in fetches {
                match fetch {
                    ListFetch::Found(list) => {
                        self.user.tracker_lists.insert(list.list_id.clone(), list);
                    }
                    ListFetch::NotFound { slug } => {
                        let name = IdMeta::name_for_slug(&metas, &slug)
                            .unwrap_or_default()
                            .to_string();
                        match decide(self.conf.mode, ActionKind::CreateList) {
                            Decision::LogOnly => {
                                info!(
                                    slug = %slug,
                                    name = %name,
                                    "sync mode {} would have created tracker list {slug} to backfill catalog list {name}",
                                    self.conf.mode
                                );
                            }
                            Decision::Execute => {
                                self.tracker.create_list(&slug, &name).with_context(|| {
                                    format!("failure creating tracker list {slug}")
                                })?;
                                // The new list is present with zero items for
                                // the upcoming diff; it is not re-fetched.
                            }
                        }
                    }
                }
            }
        }
        if self.authless {
            info!("hydration completed without catalog credentials");
            return Ok(());
        }
        if self.conf.watchlist {
            let catalog_watchlist = self
                .catalog
                .watchlist()
                .context("failure fetching catalog watchlist")?;
            let watchlist_id = catalog_watchlist.list_id.clone();
            self.user
                .catalog_lists
                .insert(watchlist_id.clone(), catalog_watchlist);
            let tracker_watchlist = self
                .tracker
                .watchlist()
                .context("failure fetching tracker watchlist")?;
            self.user
                .tracker_lists
                .insert(watchlist_id, tracker_watchlist);
        }
        if self.conf.ratings {
            for item in self
                .tracker
                .ratings()
                .context("failure fetching tracker ratings")?
            {
                let item_id = history::resolve_item_id(&item)
                    .context("failure hydrating tracker ratings")?
                    .to_string();
                self.user.tracker_ratings.insert(item_id, item);
            }
            for item in self
                .catalog
                .ratings()
                .context("failure fetching catalog ratings")?
            {
                self.user.catalog_ratings.insert(item.id.clone(), item);
            }
        }
        info!("hydration completed");
        Ok(())
    }

    fn sync_lists(&self) -> Result<()> {
        if !self.conf.watchlist {
            info!("skipping watchlist sync");
        }
        if !self.conf.lists {
            info!("skipping lists sync");
        }
        if !self.conf.watchlist && !self.conf.lists {
            return Ok(());
        }
        info!("list sync started");
        let mut list_ids: Vec<&String> = self.user.catalog_lists.keys().collect();
        list_ids.sort();
        for list_id in list_ids {
            let catalog_list = &self.user.catalog_lists[list_id];
            let diff = list_diff(catalog_list, self.user.tracker_lists.get(list_id));
            if catalog_list.is_watchlist {
                self.apply(ActionKind::Add, "watchlist", &diff.add, |t| {
                    t.watchlist_items_add(&diff.add)
                })?;
                self.apply(ActionKind::Remove, "watchlist", &diff.remove, |t| {
                    t.watchlist_items_remove(&diff.remove)
                })?;
                continue;
            }
            let slug = infer_list_slug(&catalog_list.name);
            self.apply(ActionKind::Add, &slug, &diff.add, |t| {
                t.list_items_add(&slug, &diff.add)
            })?;
            self.apply(ActionKind::Remove, &slug, &diff.remove, |t| {
                t.list_items_remove(&slug, &diff.remove)
            })?;
        }
        info!("list sync completed");
        Ok(())
    }

    fn sync_ratings(&self) -> Result<()> {
        if self.authless {
            info!("skipping ratings sync since no catalog credentials were provided");
            return Ok(());
        }
        if !self.conf.ratings {
            info!("skipping ratings sync");
            return Ok(());
        }
        info!("ratings sync started");
        let diff = items_difference(&self.user.catalog_ratings, &self.user.tracker_ratings);
        self.apply(ActionKind::Add, "ratings", &diff.add, |t| {
            t.ratings_add(&diff.add)
        })?;
        self.apply(ActionKind::Remove, "ratings", &diff.remove, |t| {
            t.ratings_remove(&diff.remove)
        })?;
        info!("ratings sync completed");
        Ok(())
    }

    fn sync_history(&self) -> Result<()> {
        if self.authless {
            info!("skipping history sync since no catalog credentials were provided");
            return Ok(());
        }
        if !self.conf.history {
            info!("skipping history sync");
            return Ok(());
        }
        info!("history sync started");
        let diff = items_difference(&self.user.catalog_ratings, &self.user.tracker_ratings);
        let plan = history::plan_history(self.tracker.as_ref(), &diff)?;
        self.apply(ActionKind::Add, "history", &plan.add, |t| {
            t.history_add(&plan.add)
        })?;
        self.apply(ActionKind::Remove, "history", &plan.remove, |t| {
            t.history_remove(&plan.remove)
        })?;
        info!("history sync completed");
        Ok(())
    }

    /// The mode gate, applied at the point of action. Empty batches are a
    /// no-op; suppressed batches are reported with their count and payload.
    fn apply<F>(
        &self,
        action: ActionKind,
        target: &str,
        items: &[TrackerItem],
        op: F,
    ) -> Result<()>
    where
        F: FnOnce(&dyn TrackerClient) -> Result<(), ClientError>,
    {
        if items.is_empty() {
            return Ok(());
        }
        match decide(self.conf.mode, action) {
            Decision::LogOnly => {
                info!(
                    domain = %target,
                    count = items.len(),
                    payload = ?items,
                    "sync mode {} would have {} {} tracker item(s)",
                    self.conf.mode,
                    action.past(),
                    items.len()
                );
                Ok(())
            }
            Decision::Execute => {
                op(self.tracker.as_ref()).with_context(|| {
                    format!("failure {} items on tracker {target}", action.gerund())
                })?;
                Ok(())
            }
        }
    }
}
