//! Fetching the latest reading and shaping it for the watch.

mod fetch;
mod models;
mod transform;

pub use fetch::GlucoseFetcher;
pub use models::DeviceMessage;
