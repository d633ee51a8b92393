mod dispatch;
mod messenger;

use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, Packet, QoS};
use tokio::task::JoinHandle;

use crate::constants::{defaults, topics};

pub use dispatch::{Dispatcher, Trigger};
pub use messenger::{DeviceMessenger, MqttMessenger};

const TRIGGER_TOPICS: &[&str] = &[topics::DEVICE_READY, topics::DEVICE_REFRESH];

/// What the event loop does after one notification.
enum Step {
    Continue,
    Dispatched(JoinHandle<()>),
    Reconnect,
    Stop,
}

fn subscribe_triggers(client: &AsyncClient) {
    for topic in TRIGGER_TOPICS {
        log::info!("Subscribing to {topic}");
        if let Err(e) = client.try_subscribe(*topic, QoS::AtLeastOnce) {
            log::error!("Could not subscribe to {topic}: {e}");
        }
    }
}

fn handle_notification<M>(
    client: &AsyncClient,
    dispatcher: &Dispatcher<M>,
    notification: Result<Event, ConnectionError>,
) -> Step
where
    M: DeviceMessenger + Send + Sync + 'static,
{
    match notification {
        Ok(Event::Incoming(Packet::ConnAck(ack))) => {
            log::info!("Connected to MQTT bridge: {:?}", ack.code);
            // Clean sessions forget subscriptions, so renew them on every connect
            subscribe_triggers(client);
            Step::Continue
        }
        Ok(Event::Incoming(Packet::Publish(publish))) => match Trigger::from_topic(&publish.topic) {
            Some(trigger) => Step::Dispatched(dispatcher.dispatch(trigger)),
            None => {
                log::debug!("Ignoring message on {}", publish.topic);
                Step::Continue
            }
        },
        Ok(Event::Incoming(Packet::PubAck(ack))) => {
            log::debug!("Bridge acknowledged message {}", ack.pkid);
            Step::Continue
        }
        Ok(notification) => {
            log::trace!("Notification = {:?}", notification);
            Step::Continue
        }
        Err(ConnectionError::RequestsDone) => {
            log::info!("MQTT client closed; stopping relay");
            Step::Stop
        }
        Err(e) => {
            log::error!(
                "MQTT connection error: {e}; retrying in {:.1}s",
                defaults::MQTT_RECONNECT_DELAY.as_secs_f32()
            );
            Step::Reconnect
        }
    }
}

/// Drive the MQTT connection and dispatch a flow for every trigger message.
/// Only returns if the client's request channel goes away.
pub async fn run<M>(client: AsyncClient, mut eventloop: EventLoop, dispatcher: Dispatcher<M>)
where
    M: DeviceMessenger + Send + Sync + 'static,
{
    loop {
        let notification = eventloop.poll().await;
        match handle_notification(&client, &dispatcher, notification) {
            Step::Continue => {}
            // Flows run detached
            Step::Dispatched(flow) => drop(flow),
            Step::Reconnect => tokio::time::sleep(defaults::MQTT_RECONNECT_DELAY).await,
            Step::Stop => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glucose::GlucoseFetcher;
    use crate::settings::Credentials;
    use rumqttc::{ConnAck, ConnectReturnCode, Publish, Request};
    use serde_json::{json, Value};

    const PATH: &str = "/api/nightscout/pebble";
    const BODY: &str =
        r#"{"bgs":[{"sgv":"5.4","datetime":"2017-06-01T09:05:00Z","bgdelta":-0.3}]}"#;

    /// Client whose subscriptions can be read back from `requests`, and a
    /// dispatcher whose device messages land in `device`.
    struct Harness {
        client: AsyncClient,
        requests: flume::Receiver<Request>,
        dispatcher: Dispatcher<MqttMessenger>,
        device: flume::Receiver<Request>,
    }

    fn harness(url: String) -> Harness {
        let (client_tx, requests) = flume::bounded(10);
        let (device_tx, device) = flume::bounded(10);
        let messenger =
            MqttMessenger::new(AsyncClient::from_senders(device_tx), topics::GLUCOSE);
        let credentials = Credentials {
            user_email: "a@b.com".into(),
            access_token: "tok".into(),
        };
        let fetcher = GlucoseFetcher::new(url).unwrap();
        Harness {
            client: AsyncClient::from_senders(client_tx),
            requests,
            dispatcher: Dispatcher::new(credentials, fetcher, messenger),
            device,
        }
    }

    fn incoming_publish(topic: &str) -> Result<Event, ConnectionError> {
        let publish = Publish::new(topic, QoS::AtLeastOnce, "");
        Ok(Event::Incoming(Packet::Publish(publish)))
    }

    fn subscribed_topics(requests: &flume::Receiver<Request>) -> Vec<String> {
        requests
            .try_iter()
            .flat_map(|request| match request {
                Request::Subscribe(sub) => sub.filters.into_iter().map(|f| f.path).collect::<Vec<_>>(),
                other => panic!("Expected only subscriptions, got {other:?}"),
            })
            .collect()
    }

    #[tokio::test]
    async fn test_connack_subscribes_to_triggers() {
        let h = harness("http://127.0.0.1:1/unused".into());
        let connack = Ok(Event::Incoming(Packet::ConnAck(ConnAck::new(
            ConnectReturnCode::Success,
            false,
        ))));

        assert!(matches!(
            handle_notification(&h.client, &h.dispatcher, connack),
            Step::Continue
        ));
        assert_eq!(
            subscribed_topics(&h.requests),
            vec!["watch/ready".to_string(), "watch/refresh".to_string()]
        );
    }

    #[tokio::test]
    async fn test_every_connack_resubscribes() {
        let h = harness("http://127.0.0.1:1/unused".into());
        for _ in 0..2 {
            let connack = Ok(Event::Incoming(Packet::ConnAck(ConnAck::new(
                ConnectReturnCode::Success,
                false,
            ))));
            handle_notification(&h.client, &h.dispatcher, connack);
        }
        assert_eq!(subscribed_topics(&h.requests).len(), 4);
    }

    #[tokio::test]
    async fn test_trigger_publish_relays_glucose() {
        let mut server = mockito::Server::new_async().await;
        let m = server
            .mock("GET", PATH)
            .with_body(BODY)
            .expect(2)
            .create_async()
            .await;
        let h = harness(format!("{}{PATH}", server.url()));

        for topic in [topics::DEVICE_REFRESH, topics::DEVICE_READY] {
            match handle_notification(&h.client, &h.dispatcher, incoming_publish(topic)) {
                Step::Dispatched(flow) => flow.await.unwrap(),
                _ => panic!("Publish on {topic} did not dispatch a flow"),
            }

            match h.device.try_recv() {
                Ok(Request::Publish(publish)) => {
                    assert_eq!(publish.topic, topics::GLUCOSE);
                    let payload: Value = serde_json::from_slice(&publish.payload).unwrap();
                    assert_eq!(
                        payload,
                        json!({
                            "CURRENT_GLUCOSE": "5,4",
                            "GLUCOSE_DELTA": -0.3,
                            "CURRENT_GLUCOSE_TIMESTAMP": "9.05"
                        })
                    );
                }
                other => panic!("Expected a device message, got {other:?}"),
            }
        }
        assert!(h.requests.is_empty());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_other_topics_are_ignored() {
        let mut server = mockito::Server::new_async().await;
        let m = server.mock("GET", PATH).expect(0).create_async().await;
        let h = harness(format!("{}{PATH}", server.url()));

        for topic in ["watch/other", topics::GLUCOSE, "watch/ready/extra"] {
            assert!(matches!(
                handle_notification(&h.client, &h.dispatcher, incoming_publish(topic)),
                Step::Continue
            ));
        }
        assert!(h.device.is_empty());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_errors() {
        let h = harness("http://127.0.0.1:1/unused".into());

        assert!(matches!(
            handle_notification(&h.client, &h.dispatcher, Err(ConnectionError::RequestsDone)),
            Step::Stop
        ));

        let reset = ConnectionError::Io(std::io::Error::other("connection reset"));
        assert!(matches!(
            handle_notification(&h.client, &h.dispatcher, Err(reset)),
            Step::Reconnect
        ));
        assert!(h.device.is_empty());
    }
}
