use std::fmt;
use std::sync::Arc;

use tokio::task::JoinHandle;

use super::messenger::{send_to_device, DeviceMessenger};
use crate::constants::topics;
use crate::glucose::GlucoseFetcher;
use crate::settings::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Watchface was launched
    DeviceReady,
    /// Watch sent a message asking for fresh data
    RefreshRequested,
}

impl Trigger {
    pub fn from_topic(topic: &str) -> Option<Self> {
        match topic {
            topics::DEVICE_READY => Some(Trigger::DeviceReady),
            topics::DEVICE_REFRESH => Some(Trigger::RefreshRequested),
            _ => None,
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::DeviceReady => write!(f, "device-ready"),
            Trigger::RefreshRequested => write!(f, "device-requests-refresh"),
        }
    }
}

/// Runs one fetch-and-send flow per trigger. Flows share only read-only
/// state, so overlapping triggers simply run side by side.
pub struct Dispatcher<M> {
    credentials: Arc<Credentials>,
    fetcher: Arc<GlucoseFetcher>,
    messenger: Arc<M>,
}

impl<M> Dispatcher<M>
where
    M: DeviceMessenger + Send + Sync + 'static,
{
    pub fn new(credentials: Credentials, fetcher: GlucoseFetcher, messenger: M) -> Self {
        Self {
            credentials: Arc::new(credentials),
            fetcher: Arc::new(fetcher),
            messenger: Arc::new(messenger),
        }
    }

    pub fn dispatch(&self, trigger: Trigger) -> JoinHandle<()> {
        log::info!("Received {trigger}; fetching glucose");
        let credentials = self.credentials.clone();
        let fetcher = self.fetcher.clone();
        let messenger = self.messenger.clone();

        tokio::spawn(async move {
            relay_glucose(&credentials, &fetcher, messenger.as_ref()).await;
        })
    }
}

/// Fetch, then send. Failures end the flow with a log line.
async fn relay_glucose(
    credentials: &Credentials,
    fetcher: &GlucoseFetcher,
    messenger: &impl DeviceMessenger,
) {
    match fetcher.fetch_glucose(credentials).await {
        Ok(message) => send_to_device(messenger, &message),
        Err(e) => log::error!("Could not get glucose from {}: {e}", fetcher.url()),
    }
}
