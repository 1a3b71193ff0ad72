pub mod registry;
pub mod window;
mod tests;

pub use registry::WindowRegistry;
pub use window::{Archetype, WindowRecord};
