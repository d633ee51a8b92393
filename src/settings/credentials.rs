use std::fmt;

use kvstore::AsyncKVDb;
use serde_json::Value;

use crate::constants::keys;

/// Account used to authenticate against the glucose API. Either field may be
/// empty; the server decides what that means.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub user_email: String,
    pub access_token: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_email", &self.user_email)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Extract credentials from the stored settings. The settings page may
    /// have stored either an object or the object serialized into a string.
    pub fn from_settings(settings: &Value) -> Self {
        let parsed;
        let settings = match settings {
            Value::String(blob) => match serde_json::from_str::<Value>(blob) {
                Ok(value) => {
                    parsed = value;
                    &parsed
                }
                Err(e) => {
                    log::warn!("Stored settings are not valid JSON: {e}");
                    return Self::default();
                }
            },
            other => other,
        };

        let field = |name: &str| {
            settings
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            user_email: field(keys::SETTINGS_USER_EMAIL),
            access_token: field(keys::SETTINGS_ACCESS_TOKEN),
        }
    }
}

/// Never fails: any problem reading the settings leaves the credentials
/// empty.
pub async fn load_credentials(kvs: &AsyncKVDb) -> Credentials {
    match kvs.get::<Value>(keys::SETTINGS).await {
        Ok(Some(settings)) => {
            let credentials = Credentials::from_settings(&settings);
            if credentials.user_email.is_empty() {
                log::warn!("No user email configured");
            } else {
                log::info!("Loaded credentials for {}", credentials.user_email);
            }
            credentials
        }
        Ok(None) => {
            log::warn!("No settings stored under '{}'", keys::SETTINGS);
            Credentials::default()
        }
        Err(e) => {
            log::warn!("Could not read settings: {e}");
            Credentials::default()
        }
    }
}
