//! Window lifecycle coordinator.
//!
//! `WindowManager` owns the registry and drives every create/destroy
//! path. The registry sits behind one mutex; the lock is never held
//! across a `SurfaceBackend` call, because native destruction re-enters
//! the coordinator through close callbacks. Destroy is made idempotent
//! by taking the record's native handle before anything else, so the
//! re-entrant call finds nothing left to do and each window produces
//! exactly one destroyed notification.

use std::sync::{Arc, Mutex};

use crate::core::backend::{NativeHandle, SurfaceBackend, SurfaceSpec, ViewId};
use crate::core::channel::{MessageSink, WindowChannel};
use crate::core::errors::{Result, WindowError};
use crate::core::geometry::{Point, Size};
use crate::core::positioner::{resolve_placement, Positioner};
use crate::core::window::{Archetype, WindowRecord, WindowRegistry};

struct ManagerInner {
    backend: Option<Arc<dyn SurfaceBackend>>,
    registry: WindowRegistry,
}

/// Coordinates window creation, destruction and popup relations.
pub struct WindowManager {
    inner: Mutex<ManagerInner>,
    channel: WindowChannel,
}

impl WindowManager {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self {
            inner: Mutex::new(ManagerInner {
                backend: None,
                registry: WindowRegistry::new(),
            }),
            channel: WindowChannel::new(sink),
        }
    }

    /// Attach the rendering engine's surface collaborator. Creation
    /// requests fail until this has been called.
    pub fn bind_engine(&self, backend: Arc<dyn SurfaceBackend>) {
        let mut inner = self.inner.lock().unwrap();
        inner.backend = Some(backend);
        tracing::info!("Rendering engine bound");
    }

    fn backend(&self) -> Result<Arc<dyn SurfaceBackend>> {
        let inner = self.inner.lock().unwrap();
        inner.backend.clone().ok_or(WindowError::EngineNotBound)
    }

    /// Create a top-level window at the given logical origin.
    ///
    /// The first window registered becomes the quit-on-close owner.
    pub fn create_regular_window(
        &self,
        title: impl Into<String>,
        origin: Point,
        size: Size,
    ) -> Result<ViewId> {
        let title = title.into();
        let backend = self.backend()?;
        {
            let mut inner = self.inner.lock().unwrap();
            inner.registry.purge_closed();
        }

        let created = backend
            .create_surface(SurfaceSpec {
                title: title.clone(),
                origin,
                size,
                archetype: Archetype::Regular,
                parent: None,
            })
            .ok_or(WindowError::SurfaceCreationFailed)?;

        {
            let mut inner = self.inner.lock().unwrap();
            let mut record =
                WindowRecord::new(created.view_id, title, Archetype::Regular, created.handle);
            record.quit_on_close = inner.registry.is_empty();
            inner.registry.insert(record);
        }

        tracing::info!("Created regular window {}", created.view_id);
        self.channel
            .send_window_created(created.view_id, None, Archetype::Regular);
        self.emit_resized(created.view_id);
        Ok(created.view_id)
    }

    /// Create a popup placed by the positioner relative to its parent.
    ///
    /// A popup can never be the first window. A parent that has already
    /// gone away is tolerated: the popup is placed against the monitor
    /// under the anchor rectangle and carries no parent relation.
    pub fn create_popup_window(
        &self,
        title: impl Into<String>,
        positioner: &Positioner,
        size: Size,
        parent: Option<ViewId>,
    ) -> Result<ViewId> {
        let title = title.into();
        let backend = self.backend()?;

        let parent_handle = {
            let mut inner = self.inner.lock().unwrap();
            inner.registry.purge_closed();
            if inner.registry.is_empty() {
                return Err(WindowError::CannotBeFirstWindow);
            }
            parent
                .and_then(|id| inner.registry.get(id))
                .and_then(|record| record.native_handle)
        };

        let (parent_frame, monitor_frame, scale) = match parent_handle {
            Some(handle) => (
                backend.surface_frame(handle).unwrap_or_default(),
                backend.monitor_frame(handle),
                backend.scale_factor(handle),
            ),
            None => {
                let probe = Point::new(positioner.anchor_rect.x, positioner.anchor_rect.y);
                (
                    Default::default(),
                    backend.monitor_frame_at(probe),
                    backend.scale_factor_at(probe),
                )
            }
        };

        let (origin, size) = resolve_placement(positioner, size, parent_frame, monitor_frame, scale);

        let created = backend
            .create_surface(SurfaceSpec {
                title: title.clone(),
                origin,
                size,
                archetype: Archetype::Popup,
                parent: parent_handle,
            })
            .ok_or(WindowError::SurfaceCreationFailed)?;

        let recorded_parent = {
            let mut inner = self.inner.lock().unwrap();
            let mut record =
                WindowRecord::new(created.view_id, title, Archetype::Popup, created.handle);
            // Only record the relation when the parent is still around.
            let recorded_parent = parent.filter(|id| inner.registry.contains(*id));
            record.parent = recorded_parent;
            inner.registry.insert(record);
            if let Some(parent_id) = recorded_parent {
                inner.registry.attach_popup(parent_id, created.view_id);
            }
            recorded_parent
        };

        tracing::info!(
            "Created popup {} at ({}, {}), parent {:?}",
            created.view_id,
            origin.x,
            origin.y,
            recorded_parent
        );
        self.channel
            .send_window_created(created.view_id, recorded_parent, Archetype::Popup);
        self.emit_resized(created.view_id);
        Ok(created.view_id)
    }

    /// Destroy a window, its child popups, and, for the quit-on-close
    /// owner, every other window as well.
    ///
    /// Returns `false` when the window is unknown or already on its way
    /// out. `destroy_native_surface` is `false` when the native surface
    /// is already gone and only the bookkeeping remains.
    pub fn destroy_window(&self, view_id: ViewId, destroy_native_surface: bool) -> bool {
        let (handle, popups, cascade) = {
            let mut inner = self.inner.lock().unwrap();
            let Some(record) = inner.registry.get_mut(view_id) else {
                return false;
            };
            let Some(handle) = record.native_handle.take() else {
                return false;
            };
            let quit = record.quit_on_close;
            let popups: Vec<ViewId> = record.child_popups.iter().copied().collect();
            let cascade: Vec<ViewId> = if quit {
                tracing::info!("Quit-on-close window {} closing, tearing down", view_id);
                inner.registry.ids().filter(|id| *id != view_id).collect()
            } else {
                Vec::new()
            };
            (handle, popups, cascade)
        };

        // Child popups first, then the application-wide cascade. Both
        // are best effort; a window destroyed twice over no-ops.
        for popup in popups {
            self.destroy_window(popup, true);
        }
        for victim in cascade {
            self.destroy_window(victim, true);
        }

        if destroy_native_surface {
            if let Ok(backend) = self.backend() {
                if !backend.destroy_surface(handle) {
                    tracing::warn!("Native surface for window {} was already gone", view_id);
                }
            }
        }

        {
            let mut inner = self.inner.lock().unwrap();
            inner.registry.remove(view_id);
            inner.registry.purge_closed();
        }

        tracing::info!("Destroyed window {}", view_id);
        self.channel.send_window_destroyed(view_id);
        true
    }

    /// Close every popup anchored to a window.
    pub fn close_child_popups(&self, view_id: ViewId) {
        let popups: Vec<ViewId> = {
            let mut inner = self.inner.lock().unwrap();
            match inner.registry.get_mut(view_id) {
                Some(record) => std::mem::take(&mut record.child_popups).into_iter().collect(),
                None => return,
            }
        };
        for popup in popups {
            self.destroy_window(popup, true);
        }
    }

    /// A window gained focus. A popup keeps its ancestors' popups open
    /// and closes only its own children; any other window dismisses all
    /// open popups.
    pub fn handle_window_activated(&self, view_id: ViewId) {
        let targets: Vec<ViewId> = {
            let inner = self.inner.lock().unwrap();
            match inner.registry.get(view_id) {
                Some(record) if record.archetype == Archetype::Popup => vec![view_id],
                Some(_) => inner.registry.ids().collect(),
                None => return,
            }
        };
        for target in targets {
            self.close_child_popups(target);
        }
    }

    /// The application lost focus while this window held it; the
    /// window's popups are dismissed. Each window receives its own
    /// deactivation notice from the native layer.
    pub fn handle_app_deactivated(&self, view_id: ViewId) {
        self.close_child_popups(view_id);
    }

    /// The native layer reports a surface destroyed out from under us.
    /// Idempotent; safe to call from re-entrant close callbacks.
    pub fn handle_surface_destroyed(&self, view_id: ViewId) {
        self.destroy_window(view_id, false);
    }

    /// Logical origin that centers a window of `size` within the
    /// quit-on-close owner. Falls back to the monitor origin when there
    /// is no owner yet.
    pub fn centered_origin(&self, size: Size) -> Point {
        let Some((backend, handle)) = self.owner_handle() else {
            return Point::new(0, 0);
        };
        let Some(frame) = backend.surface_frame(handle) else {
            return Point::new(0, 0);
        };
        let scale = backend.scale_factor(handle);

        let center_x = frame.x as f64 + frame.width as f64 / 2.0;
        let center_y = frame.y as f64 + frame.height as f64 / 2.0;
        let origin_x = center_x - (size.width as f64 * scale) / 2.0;
        let origin_y = center_y - (size.height as f64 * scale) / 2.0;
        Point::new((origin_x / scale) as i32, (origin_y / scale) as i32)
    }

    fn owner_handle(&self) -> Option<(Arc<dyn SurfaceBackend>, NativeHandle)> {
        let inner = self.inner.lock().unwrap();
        let backend = inner.backend.clone()?;
        let owner = inner.registry.quit_on_close_owner()?;
        let handle = inner.registry.get(owner)?.native_handle?;
        Some((backend, handle))
    }

    /// Report a window's current logical client size. Per-edge division
    /// mirrors how the native layer rounds, so the result matches what
    /// the engine will observe.
    pub fn emit_resized(&self, view_id: ViewId) {
        let handle = {
            let inner = self.inner.lock().unwrap();
            inner
                .registry
                .get(view_id)
                .and_then(|record| record.native_handle)
        };
        let Some(handle) = handle else { return };
        let Ok(backend) = self.backend() else { return };
        let Some(frame) = backend.surface_frame(handle) else {
            return;
        };
        let scale = backend.scale_factor(handle);

        let width = (frame.right() as f64 / scale) as i32 - (frame.x as f64 / scale) as i32;
        let height = (frame.bottom() as f64 / scale) as i32 - (frame.y as f64 / scale) as i32;
        self.channel.send_window_resized(view_id, width, height);
    }

    pub fn contains_window(&self, view_id: ViewId) -> bool {
        self.inner.lock().unwrap().registry.contains(view_id)
    }

    pub fn window_count(&self) -> usize {
        self.inner.lock().unwrap().registry.len()
    }

    pub fn quit_on_close_owner(&self) -> Option<ViewId> {
        self.inner.lock().unwrap().registry.quit_on_close_owner()
    }

    pub fn window_parent(&self, view_id: ViewId) -> Option<ViewId> {
        self.inner
            .lock()
            .unwrap()
            .registry
            .get(view_id)
            .and_then(|record| record.parent)
    }

    pub fn child_popups(&self, view_id: ViewId) -> Vec<ViewId> {
        self.inner.lock().unwrap().registry.popups_of(view_id)
    }
}
