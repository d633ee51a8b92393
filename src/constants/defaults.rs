use std::time::Duration;

pub const LOG_LEVEL: &str = "info";

pub const MQTT_BRIDGE_HOST: &str = "localhost";
pub const MQTT_BRIDGE_PORT: u16 = 1883;
pub const MQTT_CLIENT_PREFIX: &str = "glucose-relay";
pub const MQTT_KEEP_ALIVE: Duration = Duration::from_secs(30);
pub const MQTT_RECONNECT_DELAY: Duration = Duration::from_secs(1);
pub const MQTT_REQUEST_CAPACITY: usize = 10;
