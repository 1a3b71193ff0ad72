//! Platform adapters.
//!
//! A real embedding implements `SurfaceBackend` over the native
//! windowing system and `MessageSink` over the engine's message
//! transport. This module ships the headless versions used by the demo
//! binary and the test suite: surfaces are plain rectangles on one
//! virtual monitor, and messages accumulate in memory.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::core::backend::{CreatedSurface, NativeHandle, SurfaceBackend, SurfaceSpec, ViewId};
use crate::core::channel::MessageSink;
use crate::core::geometry::{Point, Rect};
use crate::core::manager::WindowManager;

/// A platform embedding of the window coordinator.
pub trait Platform {
    fn initialize(&mut self) -> anyhow::Result<()>;
    fn run(&mut self) -> anyhow::Result<()>;
}

#[derive(Debug, Default)]
struct BackendState {
    next_view_id: ViewId,
    next_handle: u64,
    /// Device-space frames of live surfaces, keyed by raw handle.
    surfaces: HashMap<u64, Rect>,
    create_calls: usize,
    fail_next_create: bool,
}

/// In-memory surface backend with a single virtual monitor.
pub struct HeadlessBackend {
    monitor: Rect,
    scale: f64,
    state: Mutex<BackendState>,
}

impl HeadlessBackend {
    pub fn new(monitor: Rect, scale: f64) -> Self {
        Self {
            monitor,
            scale,
            state: Mutex::new(BackendState {
                next_view_id: 1,
                next_handle: 1,
                ..Default::default()
            }),
        }
    }

    /// Number of `create_surface` calls so far, failed ones included.
    pub fn create_calls(&self) -> usize {
        self.state.lock().unwrap().create_calls
    }

    /// Make the next creation attempt fail.
    pub fn fail_next_create(&self) {
        self.state.lock().unwrap().fail_next_create = true;
    }

    pub fn live_surfaces(&self) -> usize {
        self.state.lock().unwrap().surfaces.len()
    }
}

impl SurfaceBackend for HeadlessBackend {
    fn create_surface(&self, spec: SurfaceSpec) -> Option<CreatedSurface> {
        let mut state = self.state.lock().unwrap();
        state.create_calls += 1;
        if state.fail_next_create {
            state.fail_next_create = false;
            tracing::warn!("Surface creation failed (injected)");
            return None;
        }

        let view_id = state.next_view_id;
        state.next_view_id += 1;
        let handle = NativeHandle::new(state.next_handle);
        state.next_handle += 1;

        let frame = Rect::new(
            (spec.origin.x as f64 * self.scale) as i32,
            (spec.origin.y as f64 * self.scale) as i32,
            (spec.size.width as f64 * self.scale) as i32,
            (spec.size.height as f64 * self.scale) as i32,
        );
        state.surfaces.insert(handle.raw(), frame);
        tracing::debug!(
            "Headless surface {} for view {} ({:?}): {:?}",
            handle.raw(),
            view_id,
            spec.archetype,
            frame
        );
        Some(CreatedSurface { view_id, handle })
    }

    fn destroy_surface(&self, handle: NativeHandle) -> bool {
        self.state
            .lock()
            .unwrap()
            .surfaces
            .remove(&handle.raw())
            .is_some()
    }

    fn surface_frame(&self, handle: NativeHandle) -> Option<Rect> {
        self.state
            .lock()
            .unwrap()
            .surfaces
            .get(&handle.raw())
            .copied()
    }

    fn monitor_frame(&self, _handle: NativeHandle) -> Rect {
        self.monitor
    }

    fn monitor_frame_at(&self, _point: Point) -> Rect {
        self.monitor
    }

    fn scale_factor(&self, _handle: NativeHandle) -> f64 {
        self.scale
    }

    fn scale_factor_at(&self, _point: Point) -> f64 {
        self.scale
    }
}

/// Records outbound notifications for inspection.
#[derive(Default)]
pub struct CollectingSink {
    messages: Mutex<Vec<(String, Value)>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything received so far, in send order.
    pub fn take_messages(&self) -> Vec<(String, Value)> {
        std::mem::take(&mut *self.messages.lock().unwrap())
    }

    pub fn count_of(&self, method: &str) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .count()
    }
}

impl MessageSink for CollectingSink {
    fn send(&self, method: &str, payload: Value) {
        tracing::trace!("Notification {}: {}", method, payload);
        self.messages
            .lock()
            .unwrap()
            .push((method.to_string(), payload));
    }
}

/// Wires the coordinator to the headless backend and sink.
pub struct HeadlessPlatform {
    pub manager: Arc<WindowManager>,
    pub backend: Arc<HeadlessBackend>,
    pub sink: Arc<CollectingSink>,
}

impl HeadlessPlatform {
    pub fn new(monitor: Rect, scale: f64) -> Self {
        let sink = Arc::new(CollectingSink::new());
        let backend = Arc::new(HeadlessBackend::new(monitor, scale));
        let manager = Arc::new(WindowManager::new(sink.clone()));
        Self {
            manager,
            backend,
            sink,
        }
    }
}

impl Platform for HeadlessPlatform {
    fn initialize(&mut self) -> anyhow::Result<()> {
        self.manager.bind_engine(self.backend.clone());
        Ok(())
    }

    fn run(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Size;
    use crate::core::window::Archetype;

    #[test]
    fn test_headless_backend_frames_are_device_space() {
        let backend = HeadlessBackend::new(Rect::new(0, 0, 1920, 1080), 2.0);
        let created = backend
            .create_surface(SurfaceSpec {
                title: "w".into(),
                origin: Point::new(10, 20),
                size: Size::new(100, 50),
                archetype: Archetype::Regular,
                parent: None,
            })
            .unwrap();

        assert_eq!(
            backend.surface_frame(created.handle),
            Some(Rect::new(20, 40, 200, 100))
        );
        assert!(backend.destroy_surface(created.handle));
        assert!(!backend.destroy_surface(created.handle));
        assert_eq!(backend.surface_frame(created.handle), None);
    }

    #[test]
    fn test_injected_creation_failure_is_one_shot() {
        let backend = HeadlessBackend::new(Rect::new(0, 0, 1920, 1080), 1.0);
        backend.fail_next_create();
        let spec = SurfaceSpec {
            title: "w".into(),
            origin: Point::new(0, 0),
            size: Size::new(10, 10),
            archetype: Archetype::Regular,
            parent: None,
        };
        assert!(backend.create_surface(spec.clone()).is_none());
        assert!(backend.create_surface(spec).is_some());
        assert_eq!(backend.create_calls(), 2);
    }
}
