use async_trait::async_trait;
use log::*;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

use crate::{
    chat::{ChatMessage, Notifier},
    error::{HeraldError, Result},
};

const HTML_FORMAT: &str = "org.matrix.custom.html";

#[derive(Debug, Serialize)]
struct RoomMessage<'a> {
    msgtype: &'a str,
    body: &'a str,
    format: &'a str,
    formatted_body: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    event_id: String,
}

pub struct MatrixClient {
    client: Client,
    homeserver: Url,
    room_id: String,
    dry_run: bool,
}

impl MatrixClient {
    pub fn new(
        homeserver: &str,
        room_id: &str,
        token: SecretString,
        dry_run: bool,
    ) -> Result<Self> {
        if token.expose_secret().is_empty() {
            return Err(HeraldError::invalid_args("must provide matrix token"));
        }

        if room_id.is_empty() {
            return Err(HeraldError::invalid_config(
                "chat.room_id must not be empty",
            ));
        }

        let homeserver = Url::parse(homeserver)?;

        if homeserver.cannot_be_a_base() {
            return Err(HeraldError::invalid_config(format!(
                "invalid matrix homeserver: {homeserver}"
            )));
        }

        let mut headers = HeaderMap::new();

        let token_value = HeaderValue::from_str(&format!(
            "Bearer {}",
            token.expose_secret()
        ))?;

        headers.append("Authorization", token_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            homeserver,
            room_id: room_id.to_string(),
            dry_run,
        })
    }

    /// Endpoint for sending a room message with the given transaction id.
    fn send_url(&self, txn_id: &str) -> Url {
        let mut url = self.homeserver.clone();

        // cannot_be_a_base is rejected in new
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "_matrix",
                "client",
                "v3",
                "rooms",
                self.room_id.as_str(),
                "send",
                "m.room.message",
                txn_id,
            ]);
        }

        url
    }
}

fn transaction_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("release-herald-{nanos}")
}

#[async_trait]
impl Notifier for MatrixClient {
    async fn post_message(&self, message: &ChatMessage) -> Result<()> {
        if self.dry_run {
            warn!(
                "dry_run: would post to {}: {}",
                self.room_id, message.body
            );
            return Ok(());
        }

        let payload = RoomMessage {
            msgtype: "m.text",
            body: &message.body,
            format: HTML_FORMAT,
            formatted_body: &message.formatted_body,
        };

        let response = self
            .client
            .put(self.send_url(&transaction_id()))
            .json(&payload)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| HeraldError::notification(err.to_string()))?
            .json::<SendResponse>()
            .await
            .map_err(|err| HeraldError::notification(err.to_string()))?;

        info!("posted announcement to {}: {}", self.room_id, response.event_id);

        Ok(())
    }
}
