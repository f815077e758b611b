//! `reqwest` implementation of the transport seam.

use super::Transport;
use super::wire::{
    LivenessResponse, MoveResponse, PlaceResponse, ReadyResponse, StartResponse, SubmitMoveRequest,
};
use crate::games::Rules;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info, instrument, warn};

/// HTTP client for the game server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Creates a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        info!(%base_url, "creating game server client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {path} failed"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("reading {path} response failed"))?;
        debug!(%status, path, body = %text, "server response");

        if !status.is_success() {
            anyhow::bail!("{path} returned {status}: {text}");
        }
        serde_json::from_str(&text).with_context(|| format!("unparseable {path} response"))
    }
}

#[async_trait]
impl<R: Rules> Transport<R> for HttpTransport {
    #[instrument(skip(self, placement))]
    async fn place_piece(&self, placement: &R::Placement) -> Result<PlaceResponse> {
        debug!(?placement, "submitting placement");
        self.post_json("/place_piece", placement).await
    }

    #[instrument(skip(self))]
    async fn submit_move(&self, target: R::Target) -> Result<MoveResponse> {
        debug!(?target, "submitting move");
        self.post_json("/submit_move", &SubmitMoveRequest::new(target))
            .await
    }

    #[instrument(skip(self))]
    async fn commit_ready(&self) -> Result<ReadyResponse> {
        info!("committing readiness");
        self.post_json("/player_ready", &serde_json::json!({})).await
    }

    #[instrument(skip(self))]
    async fn start_session(&self) -> Result<StartResponse> {
        info!("requesting session start");
        self.post_json("/start_session", &serde_json::json!({}))
            .await
    }

    #[instrument(skip(self))]
    async fn poll_liveness(&self) -> Result<LivenessResponse> {
        let url = format!("{}/check_connection", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("liveness poll failed")?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("liveness poll returned {status}");
        }
        response
            .json()
            .await
            .context("unparseable liveness response")
    }

    async fn leave_session(&self) {
        let url = format!("{}/leave", self.base_url);
        if let Err(error) = self.client.post(&url).json(&serde_json::json!({})).send().await {
            warn!(%error, "leave notification failed");
        }
    }
}
