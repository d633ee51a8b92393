use anyhow::Result;
use kvstore::AsyncKVDb;

use crate::constants::{defaults, topics};
use crate::glucose::GlucoseFetcher;
use crate::interfaces::{kvpath, mqtt};
use crate::relay::{self, Dispatcher, MqttMessenger};
use crate::settings;

pub async fn relay() -> Result<()> {
    let kvs = AsyncKVDb::new(kvpath::SQLITE_STORE.as_path()).await?;
    let settings = settings::load(&kvs).await;
    log::info!("Relaying glucose from {}", settings.api_url);

    let fetcher = GlucoseFetcher::new(settings.api_url)?;
    let (client, eventloop) =
        mqtt::client_conn(mqtt::get_rand_client_id(Some(defaults::MQTT_CLIENT_PREFIX)));
    let messenger = MqttMessenger::new(client.clone(), topics::GLUCOSE);
    let dispatcher = Dispatcher::new(settings.credentials, fetcher, messenger);

    relay::run(client, eventloop, dispatcher).await;
    Ok(())
}
