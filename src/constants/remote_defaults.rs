use once_cell::sync::Lazy;
use std::collections::HashMap;

use super::keys;

pub static REMOTE_DEFAULTS: Lazy<HashMap<&str, &str>> = Lazy::new(|| {
    HashMap::from([(
        keys::GLUCOSE_API_URL,
        "https://sokeriseuranta.fi/api/nightscout/pebble",
    )])
});
