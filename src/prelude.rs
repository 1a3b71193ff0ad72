//! Common imports and types used throughout Mariposa.

pub use std::collections::{HashMap, HashSet};
pub use std::sync::{Arc, Mutex};

// Add common internal types here
pub type Result<T> = std::result::Result<T, crate::core::errors::WindowError>;
