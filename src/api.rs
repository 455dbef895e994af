//! Access to the detection backend.

use crate::config::normalize_base_url;
use crate::errors::ApiError;
use crate::models::{DetectionStats, InteractionInfo};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::future::Future;

/// The remote operations the dashboard depends on.
pub trait DashboardBackend: Send + Sync {
    /// `GET detection_stats`
    fn detection_stats(&self) -> impl Future<Output = Result<DetectionStats, ApiError>> + Send;

    /// `GET get_interaction_time`
    fn interaction_time(&self) -> impl Future<Output = Result<InteractionInfo, ApiError>> + Send;

    /// `POST set_streaming_state?value=..`. Succeeds once the backend has
    /// acknowledged with a JSON body.
    fn set_streaming_state(&self, value: bool) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// `GET get_streaming_state`. `None` when the backend has no value stored.
    fn streaming_state(&self) -> impl Future<Output = Result<Option<bool>, ApiError>> + Send;
}

/// reqwest-backed client for the detection backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: normalize_base_url(base_url),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl DashboardBackend for ApiClient {
    async fn detection_stats(&self) -> Result<DetectionStats, ApiError> {
        let response = self.http.get(self.url("detection_stats")).send().await?;
        parse_json(response).await
    }

    async fn interaction_time(&self) -> Result<InteractionInfo, ApiError> {
        let response = self.http.get(self.url("get_interaction_time")).send().await?;
        parse_json(response).await
    }

    async fn set_streaming_state(&self, value: bool) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("set_streaming_state"))
            .query(&[("value", value)])
            .send()
            .await?;
        let _ack: serde_json::Value = parse_json(response).await?;
        Ok(())
    }

    async fn streaming_state(&self) -> Result<Option<bool>, ApiError> {
        let response = self.http.get(self.url("get_streaming_state")).send().await?;
        parse_json(response).await
    }
}

/// Decode a 2xx body as `T`; any other status becomes [`ApiError::Status`].
async fn parse_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
