use std::sync::Arc;

use kvstore::AsyncKVDb;

use crate::constants::{keys, REMOTE_DEFAULTS};

pub const HEADER_USER_EMAIL: &str = "X-User-Email";
pub const HEADER_ACCESS_TOKEN: &str = "X-Access-Token";

fn default_api_url() -> String {
    REMOTE_DEFAULTS
        .get(keys::GLUCOSE_API_URL)
        .copied()
        .unwrap_or_default()
        .to_string()
}

/// The glucose endpoint, unless overridden in the key-value store.
pub async fn get_api_url(kvs: &AsyncKVDb) -> String {
    match kvs.get::<String>(keys::GLUCOSE_API_URL).await {
        Ok(Some(url)) => {
            log::info!("Using glucose API URL override {url}");
            url
        }
        Ok(None) => default_api_url(),
        Err(e) => {
            log::warn!("Could not read glucose API URL override: {e}");
            default_api_url()
        }
    }
}

// No timeout: an in-flight request is left to the transport's own limits
pub fn get_ureq_agent() -> Result<ureq::Agent, native_tls::Error> {
    Ok(ureq::AgentBuilder::new()
        .tls_connector(Arc::new(native_tls::TlsConnector::new()?))
        .build())
}
