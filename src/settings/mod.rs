mod credentials;

use kvstore::AsyncKVDb;

use crate::interfaces::http_api;

pub use credentials::{load_credentials, Credentials};

/// Everything a relay flow needs, read once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub credentials: Credentials,
    pub api_url: String,
}

pub async fn load(kvs: &AsyncKVDb) -> RelaySettings {
    RelaySettings {
        credentials: load_credentials(kvs).await,
        api_url: http_api::get_api_url(kvs).await,
    }
}
