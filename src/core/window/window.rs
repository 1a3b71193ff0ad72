use std::collections::HashSet;

use crate::core::backend::{NativeHandle, ViewId};

/// Role of a window, controlling its stacking and input behavior.
///
/// Channel encoding is the declaration-order integer. Only `Regular` and
/// `Popup` are reachable through the public operations today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Regular,
    FloatingRegular,
    Dialog,
    Satellite,
    Popup,
    Tip,
}

impl Archetype {
    pub const fn as_raw(self) -> i32 {
        self as i32
    }
}

/// Bookkeeping for one live window.
///
/// The native handle is owned exclusively by the record and cleared on
/// destroy; a record with no handle is garbage and gets purged. Popup
/// relations are id-based back-references, never owning.
#[derive(Debug, Clone)]
pub struct WindowRecord {
    pub view_id: ViewId,
    pub title: String,
    pub archetype: Archetype,
    pub native_handle: Option<NativeHandle>,
    /// Set iff this is a popup whose parent was alive at creation.
    pub parent: Option<ViewId>,
    /// Popups currently anchored to this window.
    pub child_popups: HashSet<ViewId>,
    /// True for exactly one record: the window whose closure tears the
    /// whole application down.
    pub quit_on_close: bool,
}

impl WindowRecord {
    pub fn new(
        view_id: ViewId,
        title: impl Into<String>,
        archetype: Archetype,
        handle: NativeHandle,
    ) -> Self {
        Self {
            view_id,
            title: title.into(),
            archetype,
            native_handle: Some(handle),
            parent: None,
            child_popups: HashSet::new(),
            quit_on_close: false,
        }
    }

    /// A window is live while it still owns its native handle.
    pub fn is_live(&self) -> bool {
        self.native_handle.is_some()
    }
}
