//! reqwest client for the points API
//!
//! The API sits behind a browser-facing CDN, so requests carry the same
//! Accept/Origin/Referer/fetch-metadata headers the web app sends.

use super::{ApiAck, ScoreApi, SwapRecord};
use crate::error::SwapError;
use alloy::primitives::Address;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, ORIGIN, REFERER, USER_AGENT};
use std::time::Duration;
use tracing::debug;

const APP_ORIGIN: &str = "https://app.tea-fi.com";
const APP_REFERER: &str = "https://app.tea-fi.com/";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/132.0.0.0 Safari/537.36 Edg/132.0.0.0";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpScoreApi {
    client: reqwest::Client,
    submit_url: String,
    points_url: String,
}

impl HttpScoreApi {
    pub fn new(submit_url: impl Into<String>, points_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            submit_url: submit_url.into(),
            points_url: points_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn read_ack(response: reqwest::Response) -> Result<ApiAck, SwapError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SwapError::Api(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(SwapError::Api(format!("{}: {}", status, body)));
        }

        serde_json::from_str(&body)
            .map_err(|e| SwapError::Api(format!("malformed response ({}): {}", e, body)))
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ORIGIN, HeaderValue::from_static(APP_ORIGIN));
    headers.insert(REFERER, HeaderValue::from_static(APP_REFERER));
    headers.insert(HeaderName::from_static("sec-fetch-dest"), HeaderValue::from_static("empty"));
    headers.insert(HeaderName::from_static("sec-fetch-mode"), HeaderValue::from_static("cors"));
    headers.insert(HeaderName::from_static("sec-fetch-site"), HeaderValue::from_static("same-site"));
    headers
}

#[async_trait]
impl ScoreApi for HttpScoreApi {
    async fn submit(&self, record: &SwapRecord) -> Result<ApiAck, SwapError> {
        debug!("POST {} for {}", self.submit_url, record.hash);
        let response = self
            .client
            .post(&self.submit_url)
            .json(record)
            .send()
            .await
            .map_err(|e| SwapError::Api(format!("request failed: {}", e)))?;

        Self::read_ack(response).await
    }

    async fn total_points(&self, wallet: Address) -> Result<ApiAck, SwapError> {
        let url = format!("{}/{}", self.points_url, wallet);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| SwapError::Api(format!("request failed: {}", e)))?;

        Self::read_ack(response).await
    }
}
