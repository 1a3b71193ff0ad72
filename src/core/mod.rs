pub mod backend;
pub mod channel;
pub mod errors;
pub mod geometry;
pub mod manager;
pub mod positioner;
pub mod window;

// Re-export key types
pub use backend::{NativeHandle, SurfaceBackend, ViewId};
pub use channel::{handle_method_call, MessageSink, MethodCall, MethodResult, WindowChannel};
pub use errors::{Result, WindowError};
pub use manager::WindowManager;
pub use positioner::Positioner;
pub use window::{Archetype, WindowRecord, WindowRegistry};
