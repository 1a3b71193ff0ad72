pub mod api;

pub use api::{CollectingSink, HeadlessBackend, HeadlessPlatform, Platform};
