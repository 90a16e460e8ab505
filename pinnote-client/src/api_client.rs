//! REST client for the note store service.

use async_trait::async_trait;
use pinnote_core::{
    Note, NoteDraft, NoteId, NoteList, NoteStoreApi, NoteUpdate, StatusMessage, StoreError,
    StoreResult,
};
use reqwest::{Method, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use crate::config::{ClientConfig, ConfigError};
use crate::error::ClientError;

#[derive(Debug, Clone)]
pub struct RestClient {
    client: reqwest::Client,
    base_url: Url,
}

impl RestClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let timeout = Duration::from_millis(config.request_timeout_ms);
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        let trimmed = config.api_base_url.trim().trim_end_matches('/');
        let base_url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidValue {
            field: "api_base_url",
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                field: "api_base_url",
                reason: "must be a hierarchical URL".to_string(),
            }
            .into());
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends `segments` to the base URL, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> StoreResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport(format!("invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T, B>(&self, method: Method, segments: &[&str], body: Option<&B>) -> StoreResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(segments)?;
        tracing::debug!(%method, %url, "Note store request");

        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        parse_response(response).await
    }
}

async fn parse_response<T: DeserializeOwned>(response: reqwest::Response) -> StoreResult<T> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| StoreError::Transport(e.to_string()))?;

    if status.is_success() {
        serde_json::from_str::<T>(&text).map_err(|e| StoreError::Decode(e.to_string()))
    } else {
        Err(StoreError::rejected(status.as_u16(), &text))
    }
}

#[async_trait]
impl NoteStoreApi for RestClient {
    async fn create(&self, draft: &NoteDraft) -> StoreResult<Note> {
        self.send(Method::POST, &["addnotes"], Some(draft)).await
    }

    async fn list(&self) -> StoreResult<NoteList> {
        self.send::<_, ()>(Method::GET, &["fetchnotes"], None).await
    }

    async fn update(&self, id: &NoteId, update: &NoteUpdate) -> StoreResult<StatusMessage> {
        self.send(Method::PUT, &["updatenotes", id.as_str()], Some(update))
            .await
    }

    async fn delete(&self, id: &NoteId) -> StoreResult<StatusMessage> {
        self.send::<_, ()>(Method::DELETE, &["deletenotes", id.as_str()], None)
            .await
    }
}
