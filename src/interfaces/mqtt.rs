use std::env;

use once_cell::sync::Lazy;
use rumqttc::{AsyncClient, EventLoop, MqttOptions};

use crate::constants::{defaults, envvars};
use crate::helpers::rand_hex;

static MQTT_BRIDGE_HOST: Lazy<String> = Lazy::new(|| {
    if let Ok(host) = env::var(envvars::MQTT_BRIDGE_HOST) {
        return host;
    }
    defaults::MQTT_BRIDGE_HOST.to_string()
});

static MQTT_BRIDGE_PORT: Lazy<u16> = Lazy::new(|| {
    if let Ok(port_str) = env::var(envvars::MQTT_BRIDGE_PORT) {
        match port_str.parse::<u16>() {
            Ok(port) => return port,
            Err(e) => log::warn!("Ignoring invalid {}={port_str}: {e}", envvars::MQTT_BRIDGE_PORT),
        }
    }
    defaults::MQTT_BRIDGE_PORT
});

pub fn get_rand_client_id(prefix: Option<&str>) -> String {
    const RAND_ID_BYTES: usize = 3;
    let randhex = rand_hex(RAND_ID_BYTES);

    if let Some(pref) = prefix {
        format!("{pref}-{randhex}")
    } else {
        randhex
    }
}

/// Build the client and its event loop. Nothing is sent on the wire until
/// the event loop is polled.
pub fn client_conn(client_id: String) -> (AsyncClient, EventLoop) {
    let host = MQTT_BRIDGE_HOST.clone();
    let port = *MQTT_BRIDGE_PORT;
    log::info!("Establishing MQTT connection to {host}:{port} as {client_id}");

    let mut mqttoptions = MqttOptions::new(client_id, host, port);
    mqttoptions.set_clean_session(true);
    mqttoptions.set_keep_alive(defaults::MQTT_KEEP_ALIVE);

    AsyncClient::new(mqttoptions, defaults::MQTT_REQUEST_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_id() {
        let id = get_rand_client_id(Some("glucose-relay"));
        assert!(id.starts_with("glucose-relay-"));
        assert_eq!(id.len(), "glucose-relay-".len() + 6);
        assert_eq!(get_rand_client_id(None).len(), 6);
    }
}
