// Settings blob written by the phone-side settings page
pub const SETTINGS: &str = "clay-settings";
pub const GLUCOSE_API_URL: &str = "glucose_api_url";

// Fields inside the settings blob
pub const SETTINGS_USER_EMAIL: &str = "UserEmail";
pub const SETTINGS_ACCESS_TOKEN: &str = "AccessToken";
