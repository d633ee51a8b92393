// Published by the watch side
pub const DEVICE_READY: &str = "watch/ready";
pub const DEVICE_REFRESH: &str = "watch/refresh";

// Published by the relay
pub const GLUCOSE: &str = "watch/glucose";
