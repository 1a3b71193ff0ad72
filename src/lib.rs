// Mariposa application runner core
// Copyright (c) 2026
//
// Multi-window lifecycle management and popup positioning for a desktop
// application runner backed by a single rendering engine instance.
// The native windowing layer and the message transport are external;
// this crate owns the window table, the creation/destruction ordering,
// and the popup placement geometry.

pub mod core;
pub mod platform;
pub mod prelude;

// Re-export the types most callers need at the crate root
pub use crate::core::backend::{NativeHandle, SurfaceBackend, ViewId};
pub use crate::core::channel::{
    handle_method_call, MessageSink, MethodCall, MethodResult, WindowChannel,
};
pub use crate::core::errors::WindowError;
pub use crate::core::manager::WindowManager;
pub use crate::core::positioner::{Anchor, ConstraintAdjustment, Gravity, Positioner};
