use rumqttc::{AsyncClient, QoS};
use thiserror::Error;

use crate::glucose::DeviceMessage;

#[derive(Error, Debug)]
pub enum DeviceSendError {
    #[error("could not serialize device message: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("device channel rejected message: {0}")]
    Channel(#[from] rumqttc::ClientError),
}

/// Delivery channel to the watch.
pub trait DeviceMessenger {
    fn send(&self, message: &DeviceMessage) -> Result<(), DeviceSendError>;
}

/// Publishes device messages as JSON on the watch's MQTT topic.
pub struct MqttMessenger {
    client: AsyncClient,
    topic: String,
}

impl MqttMessenger {
    pub fn new(client: AsyncClient, topic: impl Into<String>) -> Self {
        Self {
            client,
            topic: topic.into(),
        }
    }
}

impl DeviceMessenger for MqttMessenger {
    fn send(&self, message: &DeviceMessage) -> Result<(), DeviceSendError> {
        let payload = serde_json::to_vec(message)?;
        log::debug!("Publishing to {}: {:?}", self.topic, message);
        // Queued for the event loop; the broker's ack shows up there
        self.client
            .try_publish(self.topic.as_str(), QoS::AtLeastOnce, false, payload)?;
        Ok(())
    }
}

/// Hand a message to the watch. Either outcome ends the flow.
pub fn send_to_device(messenger: &impl DeviceMessenger, message: &DeviceMessage) {
    match messenger.send(message) {
        Ok(()) => log::info!(
            "Glucose info sent to watch: {} ({}) at {}",
            message.current_glucose,
            message.glucose_delta,
            message.current_glucose_timestamp
        ),
        Err(e) => log::error!("Error sending glucose info to watch: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::topics;
    use rumqttc::Request;
    use serde_json::{json, Value};

    fn sample_message() -> DeviceMessage {
        DeviceMessage {
            current_glucose: "5,4".into(),
            glucose_delta: json!(-0.3),
            current_glucose_timestamp: "9.05".into(),
        }
    }

    #[test]
    fn test_mqtt_messenger_queues_publish() {
        let (tx, rx) = flume::bounded(10);
        let messenger = MqttMessenger::new(AsyncClient::from_senders(tx), topics::GLUCOSE);

        messenger.send(&sample_message()).unwrap();

        match rx.try_recv() {
            Ok(Request::Publish(publish)) => {
                assert_eq!(publish.topic, topics::GLUCOSE);
                assert_eq!(publish.qos, QoS::AtLeastOnce);
                assert!(!publish.retain);
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
            other => panic!("Expected a queued publish, got {other:?}"),
        }
    }

    #[test]
    fn test_closed_channel_is_send_error() {
        let (tx, rx) = flume::bounded(10);
        drop(rx);
        let messenger = MqttMessenger::new(AsyncClient::from_senders(tx), topics::GLUCOSE);

        assert!(matches!(
            messenger.send(&sample_message()),
            Err(DeviceSendError::Channel(_))
        ));
        // Logged, not propagated
        send_to_device(&messenger, &sample_message());
    }
}
