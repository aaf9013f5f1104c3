//! Watchlist group domain model.
//!
//! [`GroupsState`] is the payload of the groups entity: the ordered group
//! list plus the current-group selection, persisted as one blob so that
//! switching groups is atomic with editing them. All operations here are
//! pure value transformations; persistence and throttling live in
//! [`crate::entity`] and [`crate::coordinator`].

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// Reserved id of the group present on first run.
pub const DEFAULT_GROUP_ID: &str = "default";

/// A named, ordered collection of ticker codes.
///
/// Stock order is user order: it drives display order and is never sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stocks: Vec<String>,
}

impl Group {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stocks: Vec::new(),
        }
    }
}

/// The groups entity payload: ordered groups plus the current selection.
///
/// Invariants (enforced by the fallible operations, repaired by
/// [`repair`](Self::repair) after decoding foreign data):
/// - at least one group exists at all times
/// - `current_group_id` names an existing group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupsState {
    pub groups: Vec<Group>,
    pub current_group_id: String,
}

impl Default for GroupsState {
    fn default() -> Self {
        Self::with_default_group("Watchlist")
    }
}

impl GroupsState {
    /// A state holding only the reserved default group.
    #[must_use]
    pub fn with_default_group(name: &str) -> Self {
        Self {
            groups: vec![Group::new(DEFAULT_GROUP_ID, name)],
            current_group_id: DEFAULT_GROUP_ID.to_string(),
        }
    }

    #[must_use]
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    #[must_use]
    pub fn contains_group(&self, id: &str) -> bool {
        self.group(id).is_some()
    }

    /// The currently selected group, falling back to the first group when
    /// the selection is stale (possible only before [`repair`](Self::repair)).
    #[must_use]
    pub fn current(&self) -> Option<&Group> {
        self.group(&self.current_group_id)
            .or_else(|| self.groups.first())
    }

    /// Restore the invariants after decoding data this process did not write.
    ///
    /// Returns `true` if anything had to change.
    pub fn repair(&mut self, default_name: &str) -> bool {
        let mut changed = false;
        if self.groups.is_empty() {
            self.groups.push(Group::new(DEFAULT_GROUP_ID, default_name));
            changed = true;
        }
        if !self.contains_group(&self.current_group_id) {
            self.current_group_id = self.groups[0].id.clone();
            changed = true;
        }
        changed
    }

    pub fn add_group(&mut self, group: Group) {
        self.groups.push(group);
    }

    pub fn rename_group(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::EmptyName);
        }
        let group = self
            .group_mut(id)
            .ok_or_else(|| StoreError::GroupNotFound(id.to_string()))?;
        group.name = name.to_string();
        Ok(())
    }

    /// Remove a group. The last remaining group is never deletable; deleting
    /// the current group moves the selection to the first remaining one.
    pub fn remove_group(&mut self, id: &str) -> Result<Group, StoreError> {
        if self.groups.len() <= 1 {
            return Err(StoreError::LastGroup);
        }
        let index = self
            .groups
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| StoreError::GroupNotFound(id.to_string()))?;
        let removed = self.groups.remove(index);
        if self.current_group_id == id {
            self.current_group_id = self.groups[0].id.clone();
        }
        Ok(removed)
    }

    /// Reorder groups to the given id sequence, which must be a permutation
    /// of the existing ids.
    pub fn reorder_groups(&mut self, ids: &[String]) -> Result<(), StoreError> {
        if ids.len() != self.groups.len() {
            return Err(StoreError::BadReorder);
        }
        let mut remaining = self.groups.clone();
        let mut reordered = Vec::with_capacity(ids.len());
        for id in ids {
            let index = remaining
                .iter()
                .position(|g| &g.id == id)
                .ok_or(StoreError::BadReorder)?;
            reordered.push(remaining.remove(index));
        }
        self.groups = reordered;
        Ok(())
    }

    pub fn set_current(&mut self, id: &str) -> Result<(), StoreError> {
        if !self.contains_group(id) {
            return Err(StoreError::GroupNotFound(id.to_string()));
        }
        self.current_group_id = id.to_string();
        Ok(())
    }

    /// Add a code to the front of a group's list (newest first).
    ///
    /// Returns `false` if the code was already present — no duplicate entry,
    /// no mutation.
    pub fn add_stock(&mut self, group_id: &str, code: &str) -> Result<bool, StoreError> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| StoreError::GroupNotFound(group_id.to_string()))?;
        if group.stocks.iter().any(|c| c == code) {
            return Ok(false);
        }
        group.stocks.insert(0, code.to_string());
        Ok(true)
    }

    /// Returns `false` if the code was not present.
    pub fn remove_stock(&mut self, group_id: &str, code: &str) -> Result<bool, StoreError> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| StoreError::GroupNotFound(group_id.to_string()))?;
        let before = group.stocks.len();
        group.stocks.retain(|c| c != code);
        Ok(group.stocks.len() != before)
    }

    /// Reorder a group's codes; the sequence must be a permutation of the
    /// existing codes.
    pub fn reorder_stocks(&mut self, group_id: &str, codes: &[String]) -> Result<(), StoreError> {
        let group = self
            .group_mut(group_id)
            .ok_or_else(|| StoreError::GroupNotFound(group_id.to_string()))?;
        if codes.len() != group.stocks.len() {
            return Err(StoreError::BadReorder);
        }
        let mut remaining = group.stocks.clone();
        for code in codes {
            let index = remaining
                .iter()
                .position(|c| c == code)
                .ok_or(StoreError::BadReorder)?;
            remaining.remove(index);
        }
        group.stocks = codes.to_vec();
        Ok(())
    }

    /// Move a code between groups: removed from `from` if present there,
    /// appended to `to` if not already there. Calling twice leaves the
    /// target with exactly one copy.
    pub fn move_stock(&mut self, code: &str, from: &str, to: &str) -> Result<(), StoreError> {
        if !self.contains_group(from) {
            return Err(StoreError::GroupNotFound(from.to_string()));
        }
        if !self.contains_group(to) {
            return Err(StoreError::GroupNotFound(to.to_string()));
        }
        self.remove_stock(from, code)?;
        if let Some(target) = self.group_mut(to) {
            if !target.stocks.iter().any(|c| c == code) {
                target.stocks.push(code.to_string());
            }
        }
        Ok(())
    }
}
