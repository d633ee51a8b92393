mod fetch;
mod kvs;
mod relay;

pub use fetch::fetch;
pub use kvs::{kvs_get, kvs_set};
pub use relay::relay;
