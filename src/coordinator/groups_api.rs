// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Group CRUD operations.
//!
//! Every operation follows the same shape: validate against the current
//! value, apply the pure transformation, write through to the fast tier,
//! then hand the entity to the scheduler. Rejected operations never touch
//! storage; accepted ones are visible to readers the moment the call
//! returns.

use std::sync::atomic::Ordering;

use tracing::info;

use super::WatchStore;
use crate::entity::{epoch_ms, SyncedEntity};
use crate::error::StoreError;
use crate::group::{Group, GroupsState};
use crate::ticker;

impl WatchStore {
    /// Create a group and return its id.
    #[tracing::instrument(skip(self))]
    pub async fn create_group(&self, name: &str) -> Result<String, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let mut groups = self.groups.lock().await;
        let id = self.next_group_id(groups.value());
        let mut next = groups.value().clone();
        next.add_group(Group::new(id.clone(), name));
        self.commit_groups(&mut groups, next).await;
        info!(id = %id, "group created");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    pub async fn rename_group(&self, id: &str, name: &str) -> Result<(), StoreError> {
        let mut groups = self.groups.lock().await;
        let mut next = groups.value().clone();
        next.rename_group(id, name)?;
        self.commit_groups(&mut groups, next).await;
        Ok(())
    }

    /// Delete a group. Rejected when it would remove the last remaining
    /// group; deleting the current group moves the selection.
    #[tracing::instrument(skip(self))]
    pub async fn delete_group(&self, id: &str) -> Result<(), StoreError> {
        let mut groups = self.groups.lock().await;
        let mut next = groups.value().clone();
        next.remove_group(id)?;
        self.commit_groups(&mut groups, next).await;
        info!(id = %id, "group deleted");
        Ok(())
    }

    /// Reorder groups; `ids` must be a permutation of the existing ids.
    #[tracing::instrument(skip(self, ids))]
    pub async fn reorder_groups(&self, ids: &[String]) -> Result<(), StoreError> {
        let mut groups = self.groups.lock().await;
        let mut next = groups.value().clone();
        next.reorder_groups(ids)?;
        self.commit_groups(&mut groups, next).await;
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn set_current_group(&self, id: &str) -> Result<(), StoreError> {
        let mut groups = self.groups.lock().await;
        let mut next = groups.value().clone();
        next.set_current(id)?;
        self.commit_groups(&mut groups, next).await;
        Ok(())
    }

    /// Add a ticker to the current group. Returns `false` when the
    /// (normalized) code was already present — no duplicate, no write.
    #[tracing::instrument(skip(self))]
    pub async fn add_ticker(&self, code: &str) -> Result<bool, StoreError> {
        let code = ticker::normalize(code);
        if !ticker::is_valid(&code) {
            return Err(StoreError::InvalidTicker(code));
        }
        let mut groups = self.groups.lock().await;
        let current = groups.value().current_group_id.clone();
        let mut next = groups.value().clone();
        if !next.add_stock(&current, &code)? {
            return Ok(false);
        }
        self.commit_groups(&mut groups, next).await;
        Ok(true)
    }

    /// Remove a ticker from the current group. Returns `false` when it was
    /// not present.
    #[tracing::instrument(skip(self))]
    pub async fn remove_ticker(&self, code: &str) -> Result<bool, StoreError> {
        let code = ticker::normalize(code);
        let mut groups = self.groups.lock().await;
        let current = groups.value().current_group_id.clone();
        let mut next = groups.value().clone();
        if !next.remove_stock(&current, &code)? {
            return Ok(false);
        }
        self.commit_groups(&mut groups, next).await;
        Ok(true)
    }

    /// Reorder a group's tickers; `codes` must be a permutation of its
    /// current contents.
    #[tracing::instrument(skip(self, codes))]
    pub async fn reorder_tickers(&self, group_id: &str, codes: &[String]) -> Result<(), StoreError> {
        let codes: Vec<String> = codes.iter().map(|c| ticker::normalize(c)).collect();
        let mut groups = self.groups.lock().await;
        let mut next = groups.value().clone();
        next.reorder_stocks(group_id, &codes)?;
        self.commit_groups(&mut groups, next).await;
        Ok(())
    }

    /// Move a ticker between groups: removed from `from` where present,
    /// appended to `to` exactly once.
    #[tracing::instrument(skip(self))]
    pub async fn move_ticker(&self, code: &str, from: &str, to: &str) -> Result<(), StoreError> {
        let code = ticker::normalize(code);
        let mut groups = self.groups.lock().await;
        let mut next = groups.value().clone();
        next.move_stock(&code, from, to)?;
        self.commit_groups(&mut groups, next).await;
        Ok(())
    }

    /// Persist an accepted transformation and hand the entity to the
    /// scheduler. Skips entirely when the transformation was a no-op, to
    /// keep write traffic down.
    pub(super) async fn commit_groups(
        &self,
        groups: &mut SyncedEntity<GroupsState>,
        next: GroupsState,
    ) {
        if groups.value() == &next {
            return;
        }
        groups.replace(&self.local, next).await;
        self.scheduler()
            .request_sync(groups, &self.slow, &self.local)
            .await;
    }

    /// Timestamp-derived id, disambiguated by a per-process counter when
    /// two creations land in the same millisecond.
    fn next_group_id(&self, state: &GroupsState) -> String {
        let base = format!("group_{}", epoch_ms());
        if !state.contains_group(&base) {
            return base;
        }
        loop {
            let suffix = self.id_seq.fetch_add(1, Ordering::Relaxed);
            let candidate = format!("{base}_{suffix}");
            if !state.contains_group(&candidate) {
                return candidate;
            }
        }
    }
}
