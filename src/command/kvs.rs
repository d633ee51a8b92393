use anyhow::{anyhow, Result};
use kvstore::KVDb;
use serde_json::Value;

use crate::argsets::{KvsGetArgs, KvsSetArgs};
use crate::constants::keys;
use crate::interfaces::kvpath;
use crate::settings::Credentials;

/// JSON input is stored as parsed; anything else as a JSON string. The API
/// URL override is always a string, as the relay reads it back as one.
fn value_from_arg(key: &str, arg: String) -> Value {
    if key == keys::GLUCOSE_API_URL {
        return Value::String(arg);
    }
    serde_json::from_str(&arg).unwrap_or(Value::String(arg))
}

/// Report what the relay will make of a freshly provisioned value.
fn report_provisioned(key: &str, value: &Value) {
    match key {
        keys::SETTINGS => {
            let credentials = Credentials::from_settings(value);
            if credentials.user_email.is_empty() {
                log::warn!("Stored settings have no {}", keys::SETTINGS_USER_EMAIL);
            } else {
                log::info!("Provisioned credentials for {}", credentials.user_email);
            }
            if credentials.access_token.is_empty() {
                log::warn!("Stored settings have no {}", keys::SETTINGS_ACCESS_TOKEN);
            }
        }
        keys::GLUCOSE_API_URL => {
            let url = value.as_str().unwrap_or_default();
            log::info!("Glucose API URL override set to {url}");
        }
        _ => log::debug!("Stored value for key '{key}'"),
    }
}

pub fn kvs_set(args: KvsSetArgs) -> Result<()> {
    let kvs = KVDb::new(kvpath::SQLITE_STORE.as_path())?;
    let value = value_from_arg(&args.key, args.value);
    kvs.set(&args.key, &value)?;
    report_provisioned(&args.key, &value);
    Ok(())
}

pub fn kvs_get(args: KvsGetArgs) -> Result<()> {
    let kvs = KVDb::new(kvpath::SQLITE_STORE.as_path())?;
    let value: Value = kvs
        .get(&args.key)?
        .ok_or_else(|| anyhow!("No value set for key '{}'", &args.key))?;
    // A single string is printed bare, anything else as JSON
    match value {
        Value::String(s) => print!("{s}"),
        other => print!("{other}"),
    }
    Ok(())
}
