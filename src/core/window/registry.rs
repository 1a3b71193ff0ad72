//! Owning window table.

use std::collections::HashMap;

use crate::core::backend::ViewId;
use crate::core::window::WindowRecord;

/// Maps view identifiers to window records and maintains the popup
/// back-reference sets.
#[derive(Debug, Default)]
pub struct WindowRegistry {
    windows: HashMap<ViewId, WindowRecord>,
}

impl WindowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn contains(&self, view_id: ViewId) -> bool {
        self.windows.contains_key(&view_id)
    }

    pub fn get(&self, view_id: ViewId) -> Option<&WindowRecord> {
        self.windows.get(&view_id)
    }

    pub fn get_mut(&mut self, view_id: ViewId) -> Option<&mut WindowRecord> {
        self.windows.get_mut(&view_id)
    }

    pub fn ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.windows.keys().copied()
    }

    /// Register a new window.
    pub fn insert(&mut self, record: WindowRecord) {
        tracing::debug!(
            "Registered window {} ({:?})",
            record.view_id,
            record.archetype
        );
        self.windows.insert(record.view_id, record);
    }

    /// Remove a window, detaching it from its parent's popup set.
    /// The removed record does not own that relationship.
    pub fn remove(&mut self, view_id: ViewId) -> Option<WindowRecord> {
        let record = self.windows.remove(&view_id)?;
        if let Some(parent_id) = record.parent {
            if let Some(parent) = self.windows.get_mut(&parent_id) {
                parent.child_popups.remove(&view_id);
            }
        }
        tracing::debug!("Removed window {}", view_id);
        Some(record)
    }

    /// Drop every record whose native handle is gone, so closed windows
    /// never accumulate and identifiers stay promptly recyclable.
    /// Idempotent.
    pub fn purge_closed(&mut self) {
        let closed: Vec<ViewId> = self
            .windows
            .values()
            .filter(|record| !record.is_live())
            .map(|record| record.view_id)
            .collect();
        if closed.is_empty() {
            return;
        }
        tracing::debug!("Purging {} closed window(s)", closed.len());
        for view_id in closed {
            self.remove(view_id);
        }
    }

    /// Record a popup under its parent. `false` when the parent is gone.
    pub fn attach_popup(&mut self, parent_id: ViewId, popup_id: ViewId) -> bool {
        match self.windows.get_mut(&parent_id) {
            Some(parent) => {
                parent.child_popups.insert(popup_id);
                true
            }
            None => false,
        }
    }

    /// Popups currently anchored to a window.
    pub fn popups_of(&self, view_id: ViewId) -> Vec<ViewId> {
        self.windows
            .get(&view_id)
            .map(|record| record.child_popups.iter().copied().collect())
            .unwrap_or_default()
    }

    /// The window whose closure tears the application down, if any.
    pub fn quit_on_close_owner(&self) -> Option<ViewId> {
        self.windows
            .values()
            .find(|record| record.quit_on_close)
            .map(|record| record.view_id)
    }
}
