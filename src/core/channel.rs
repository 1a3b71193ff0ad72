//! Window method channel.
//!
//! The UI layer talks to the coordinator over a logical method channel;
//! the wire encoding and transport live outside this crate. Inbound
//! calls arrive as `MethodCall` values and are validated here before any
//! state is touched. Outbound lifecycle notifications go through a
//! `MessageSink` the embedder provides.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::core::backend::ViewId;
use crate::core::errors::WindowError;
use crate::core::geometry::{Offset, Rect, Size};
use crate::core::manager::WindowManager;
use crate::core::positioner::{Anchor, ConstraintAdjustment, Gravity, Positioner};
use crate::core::window::Archetype;

/// Error code for malformed or mis-typed arguments.
pub const INVALID_VALUE: &str = "INVALID_VALUE";
/// Error code for failures at the native layer.
pub const UNAVAILABLE: &str = "UNAVAILABLE";

/// An inbound request from the UI layer.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Value,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, args: Value) -> Self {
        Self {
            method: method.into(),
            args,
        }
    }
}

/// Outcome of an inbound request.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodResult {
    Success(Value),
    Error {
        code: &'static str,
        message: String,
    },
    NotImplemented,
}

impl MethodResult {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Error {
            code: INVALID_VALUE,
            message: message.into(),
        }
    }

    fn unavailable(message: impl Into<String>) -> Self {
        Self::Error {
            code: UNAVAILABLE,
            message: message.into(),
        }
    }
}

/// Receives outbound notifications. Implemented by the embedder's
/// transport; the payloads here are logical values only.
pub trait MessageSink: Send + Sync {
    fn send(&self, method: &str, payload: Value);
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct WindowCreatedPayload {
    view_id: ViewId,
    /// `-1` when the window has no parent.
    parent_view_id: ViewId,
    archetype: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct WindowDestroyedPayload {
    view_id: ViewId,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct WindowResizedPayload {
    view_id: ViewId,
    width: i32,
    height: i32,
}

/// Translates lifecycle events into sink messages.
pub struct WindowChannel {
    sink: Arc<dyn MessageSink>,
}

impl WindowChannel {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self { sink }
    }

    fn send(&self, method: &str, payload: impl Serialize) {
        match serde_json::to_value(payload) {
            Ok(value) => self.sink.send(method, value),
            Err(err) => tracing::error!("Failed to encode {} payload: {}", method, err),
        }
    }

    pub(crate) fn send_window_created(
        &self,
        view_id: ViewId,
        parent: Option<ViewId>,
        archetype: Archetype,
    ) {
        self.send(
            "onWindowCreated",
            WindowCreatedPayload {
                view_id,
                parent_view_id: parent.unwrap_or(-1),
                archetype: archetype.as_raw(),
            },
        );
    }

    pub(crate) fn send_window_destroyed(&self, view_id: ViewId) {
        self.send("onWindowDestroyed", WindowDestroyedPayload { view_id });
    }

    pub(crate) fn send_window_resized(&self, view_id: ViewId, width: i32, height: i32) {
        self.send(
            "onWindowResized",
            WindowResizedPayload {
                view_id,
                width,
                height,
            },
        );
    }
}

/// Dispatch one inbound method call against the coordinator.
///
/// All shape and type validation happens before any mutation; a request
/// that fails validation has no partial effects.
pub fn handle_method_call(manager: &WindowManager, call: &MethodCall) -> MethodResult {
    tracing::trace!("Method call: {}", call.method);
    match call.method.as_str() {
        "createRegularWindow" => handle_create_regular_window(manager, &call.args),
        "createPopupWindow" => handle_create_popup_window(manager, &call.args),
        "destroyWindow" => handle_destroy_window(manager, &call.args),
        _ => MethodResult::NotImplemented,
    }
}

fn as_int(value: &Value) -> Option<i64> {
    value.as_i64()
}

fn as_int_list(value: &Value, arity: usize) -> Option<Vec<i64>> {
    let list = value.as_array()?;
    if list.len() != arity {
        return None;
    }
    list.iter().map(as_int).collect()
}

fn handle_create_regular_window(manager: &WindowManager, args: &Value) -> MethodResult {
    let Some(map) = args.as_object() else {
        return MethodResult::invalid("Value argument is not a map.");
    };
    let (Some(width), Some(height)) = (map.get("width"), map.get("height")) else {
        return MethodResult::invalid(
            "Map does not contain all required keys: {'width', 'height'}.",
        );
    };
    let (Some(width), Some(height)) = (as_int(width), as_int(height)) else {
        return MethodResult::invalid("Values for {'width', 'height'} must be of type int.");
    };

    let size = Size::new(width as i32, height as i32);
    // New regular windows are centered within the main window.
    let origin = manager.centered_origin(size);
    match manager.create_regular_window("regular", origin, size) {
        Ok(view_id) => MethodResult::Success(Value::from(view_id)),
        Err(err) => MethodResult::unavailable(err.to_string()),
    }
}

fn handle_create_popup_window(manager: &WindowManager, args: &Value) -> MethodResult {
    let Some(map) = args.as_object() else {
        return MethodResult::invalid("Value argument is not a map.");
    };

    let required = [
        "parent",
        "size",
        "anchorRect",
        "positionerParentAnchor",
        "positionerChildAnchor",
        "positionerOffset",
        "positionerConstraintAdjustment",
    ];
    if !required.iter().all(|key| map.contains_key(*key)) {
        return MethodResult::invalid(
            "Map does not contain all required keys: {'parent', 'size', 'anchorRect', \
             'positionerParentAnchor', 'positionerChildAnchor', 'positionerOffset', \
             'positionerConstraintAdjustment'}.",
        );
    }

    let Some(parent) = as_int(&map["parent"]) else {
        return MethodResult::invalid("Value for 'parent' must be of type int.");
    };
    let Some(size) = as_int_list(&map["size"], 2) else {
        return MethodResult::invalid("Values for 'size' must be of type int.");
    };
    let Some(anchor_rect) = as_int_list(&map["anchorRect"], 4) else {
        return MethodResult::invalid("Values for 'anchorRect' must be of type int.");
    };
    let Some(parent_anchor) = as_int(&map["positionerParentAnchor"]) else {
        return MethodResult::invalid("Value for 'positionerParentAnchor' must be of type int.");
    };
    let Some(child_anchor) = as_int(&map["positionerChildAnchor"]) else {
        return MethodResult::invalid("Value for 'positionerChildAnchor' must be of type int.");
    };
    let Some(offset) = as_int_list(&map["positionerOffset"], 2) else {
        return MethodResult::invalid("Values for 'positionerOffset' must be of type int.");
    };
    let Some(constraint_adjustment) = as_int(&map["positionerConstraintAdjustment"]) else {
        return MethodResult::invalid(
            "Value for 'positionerConstraintAdjustment' must be of type int.",
        );
    };

    // The request names the child edge that touches the anchor; the
    // engine wants the direction the child extends.
    let gravity = Gravity::opposite_of(Anchor::from_raw(child_anchor));

    let positioner = Positioner {
        anchor_rect: Rect::new(
            anchor_rect[0] as i32,
            anchor_rect[1] as i32,
            anchor_rect[2] as i32,
            anchor_rect[3] as i32,
        ),
        anchor: Anchor::from_raw(parent_anchor),
        gravity,
        offset: Offset::new(offset[0] as i32, offset[1] as i32),
        constraint_adjustment: ConstraintAdjustment::from_bits(constraint_adjustment as u32),
    };

    if !manager.contains_window(parent) {
        return MethodResult::unavailable(WindowError::UnknownParentWindow(parent).to_string());
    }

    match manager.create_popup_window(
        "popup",
        &positioner,
        Size::new(size[0] as i32, size[1] as i32),
        Some(parent),
    ) {
        Ok(view_id) => MethodResult::Success(Value::from(view_id)),
        Err(err) => MethodResult::unavailable(err.to_string()),
    }
}

fn handle_destroy_window(manager: &WindowManager, args: &Value) -> MethodResult {
    let Some(view_id) = args
        .as_array()
        .filter(|list| list.len() == 1)
        .and_then(|list| as_int(&list[0]))
    else {
        return MethodResult::invalid("Value argument is not valid.");
    };

    if manager.destroy_window(view_id, true) {
        MethodResult::Success(Value::Null)
    } else {
        MethodResult::unavailable("Can't destroy window.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Point;
    use crate::platform::api::{CollectingSink, HeadlessBackend};
    use serde_json::json;

    fn fixture() -> (WindowManager, Arc<HeadlessBackend>, Arc<CollectingSink>) {
        let sink = Arc::new(CollectingSink::new());
        let backend = Arc::new(HeadlessBackend::new(Rect::new(0, 0, 1920, 1080), 1.0));
        let manager = WindowManager::new(sink.clone());
        manager.bind_engine(backend.clone());
        (manager, backend, sink)
    }

    fn popup_args(parent: ViewId) -> Value {
        json!({
            "parent": parent,
            "size": [200, 100],
            "anchorRect": [10, 10, 50, 20],
            "positionerParentAnchor": 2,
            "positionerChildAnchor": 1,
            "positionerOffset": [0, 0],
            "positionerConstraintAdjustment": 0,
        })
    }

    #[test]
    fn test_create_regular_window_success() {
        let (manager, _, sink) = fixture();
        let call = MethodCall::new("createRegularWindow", json!({"width": 640, "height": 480}));
        let result = handle_method_call(&manager, &call);
        let MethodResult::Success(value) = result else {
            panic!("expected success, got {result:?}");
        };
        assert!(value.is_i64());

        let methods: Vec<String> = sink
            .take_messages()
            .into_iter()
            .map(|(method, _)| method)
            .collect();
        assert_eq!(methods, vec!["onWindowCreated", "onWindowResized"]);
    }

    #[test]
    fn test_create_regular_window_rejects_non_map() {
        let (manager, backend, _) = fixture();
        let call = MethodCall::new("createRegularWindow", json!([640, 480]));
        let result = handle_method_call(&manager, &call);
        assert!(
            matches!(result, MethodResult::Error { code, .. } if code == INVALID_VALUE),
            "got {result:?}"
        );
        assert_eq!(backend.create_calls(), 0);
    }

    #[test]
    fn test_create_regular_window_rejects_missing_keys() {
        let (manager, _, _) = fixture();
        let call = MethodCall::new("createRegularWindow", json!({"width": 640}));
        let result = handle_method_call(&manager, &call);
        assert!(matches!(result, MethodResult::Error { code, .. } if code == INVALID_VALUE));
    }

    #[test]
    fn test_create_regular_window_rejects_wrong_types() {
        let (manager, _, _) = fixture();
        let call = MethodCall::new(
            "createRegularWindow",
            json!({"width": "wide", "height": 480}),
        );
        let result = handle_method_call(&manager, &call);
        assert!(matches!(result, MethodResult::Error { code, .. } if code == INVALID_VALUE));
    }

    #[test]
    fn test_create_popup_window_success() {
        let (manager, _, sink) = fixture();
        let parent = manager
            .create_regular_window("main", Point::new(10, 10), Size::new(640, 480))
            .unwrap();
        sink.take_messages();

        let call = MethodCall::new("createPopupWindow", popup_args(parent));
        let result = handle_method_call(&manager, &call);
        assert!(matches!(result, MethodResult::Success(_)), "got {result:?}");

        let messages = sink.take_messages();
        assert_eq!(messages[0].0, "onWindowCreated");
        assert_eq!(messages[0].1["parentViewId"], json!(parent));
        assert_eq!(
            messages[0].1["archetype"],
            json!(Archetype::Popup.as_raw())
        );
    }

    #[test]
    fn test_create_popup_window_rejects_bad_anchor_rect() {
        let (manager, _, _) = fixture();
        let parent = manager
            .create_regular_window("main", Point::new(10, 10), Size::new(640, 480))
            .unwrap();

        let mut args = popup_args(parent);
        args["anchorRect"] = json!([1, 2, 3]);
        let result = handle_method_call(&manager, &MethodCall::new("createPopupWindow", args));
        assert!(matches!(result, MethodResult::Error { code, .. } if code == INVALID_VALUE));
    }

    #[test]
    fn test_create_popup_window_unknown_parent_is_unavailable() {
        let (manager, backend, _) = fixture();
        manager
            .create_regular_window("main", Point::new(10, 10), Size::new(640, 480))
            .unwrap();
        let creates_before = backend.create_calls();

        let result = handle_method_call(
            &manager,
            &MethodCall::new("createPopupWindow", popup_args(4242)),
        );
        assert!(matches!(result, MethodResult::Error { code, .. } if code == UNAVAILABLE));
        assert_eq!(backend.create_calls(), creates_before);
    }

    #[test]
    fn test_destroy_window_validation_and_dispatch() {
        let (manager, _, _) = fixture();
        let view_id = manager
            .create_regular_window("main", Point::new(10, 10), Size::new(640, 480))
            .unwrap();

        let bad = handle_method_call(&manager, &MethodCall::new("destroyWindow", json!("nope")));
        assert!(matches!(bad, MethodResult::Error { code, .. } if code == INVALID_VALUE));

        let missing =
            handle_method_call(&manager, &MethodCall::new("destroyWindow", json!([9999])));
        assert!(matches!(missing, MethodResult::Error { code, .. } if code == UNAVAILABLE));

        let ok = handle_method_call(&manager, &MethodCall::new("destroyWindow", json!([view_id])));
        assert_eq!(ok, MethodResult::Success(Value::Null));
        assert!(!manager.contains_window(view_id));
    }

    #[test]
    fn test_unknown_method_is_not_implemented() {
        let (manager, _, _) = fixture();
        let result = handle_method_call(&manager, &MethodCall::new("minimizeWindow", json!({})));
        assert_eq!(result, MethodResult::NotImplemented);
    }
}
