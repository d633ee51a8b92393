use thiserror::Error;
use tokio::task::JoinError;

use super::models::DeviceMessage;
use super::transform::{message_from_body, ParseError};
use crate::interfaces::http_api::{self, HEADER_ACCESS_TOKEN, HEADER_USER_EMAIL};
use crate::settings::Credentials;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("could not set up TLS: {0}")]
    Tls(#[from] native_tls::Error),
    #[error("glucose request failed: {0}")]
    Transport(#[from] Box<ureq::Error>),
    #[error("could not read glucose response: {0}")]
    ReadBody(#[from] std::io::Error),
    #[error("glucose request task failed: {0}")]
    Task(#[from] JoinError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Fetches the latest reading from the glucose API. Cheap to share; each
/// call issues exactly one request and never retries.
pub struct GlucoseFetcher {
    agent: ureq::Agent,
    url: String,
}

impl GlucoseFetcher {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        Ok(Self {
            agent: http_api::get_ureq_agent()?,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch_glucose(
        &self,
        credentials: &Credentials,
    ) -> Result<DeviceMessage, FetchError> {
        let agent = self.agent.clone();
        let url = self.url.clone();
        let credentials = credentials.clone();

        // The blocking request is the one point where a flow yields
        let body = tokio::task::spawn_blocking(move || request_glucose(&agent, &url, &credentials))
            .await??;

        Ok(message_from_body(&body)?)
    }
}

fn request_glucose(
    agent: &ureq::Agent,
    url: &str,
    credentials: &Credentials,
) -> Result<String, FetchError> {
    log::debug!("Requesting glucose from {url}");
    let response = agent
        .get(url)
        .set(HEADER_USER_EMAIL, &credentials.user_email)
        .set(HEADER_ACCESS_TOKEN, &credentials.access_token)
        .call()
        .map_err(Box::new)?;
    log::trace!("Glucose API responded with status {}", response.status());
    Ok(response.into_string()?)
}
