use crate::{desired::DesiredConfiguration, identity::DeviceId, monitor::Monitor};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use std::time::Duration;

/// Requests the agent makes against the control server.
///
/// `register` and `report_display` are advisory and never fail from the
/// caller's point of view. `fetch_config` yields `None` whenever no usable
/// document came back.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn register(&self, device: &DeviceId);

    async fn report_display(&self, device: &DeviceId, monitor: &Monitor);

    async fn fetch_config(&self, device: &DeviceId) -> Option<DesiredConfiguration>;
}

pub struct HttpControlPlane {
    client: Client,
    base_url: String,
}

impl HttpControlPlane {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<HttpControlPlane> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpControlPlane {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, device: &DeviceId, leaf: &str) -> String {
        format!("{}/control/{}/{}", self.base_url, device, leaf)
    }

    async fn post<T: Serialize + Sync + ?Sized>(&self, url: &str, body: &T) {
        match self.client.post(url).json(body).send().await {
            Ok(resp) if resp.status().is_success() => debug!("POST {url}: {}", resp.status()),
            Ok(resp) => warn!("POST {url} rejected: {}", resp.status()),
            Err(e) => warn!("POST {url} failed: {e}"),
        }
    }
}

#[async_trait]
impl ControlPlane for HttpControlPlane {
    async fn register(&self, device: &DeviceId) {
        info!("registering device {device}");
        let url = self.endpoint(device, "register");
        self.post(&url, &serde_json::json!({})).await;
    }

    async fn report_display(&self, device: &DeviceId, monitor: &Monitor) {
        let url = self.endpoint(device, "displays");
        self.post(&url, monitor).await;
    }

    async fn fetch_config(&self, device: &DeviceId) -> Option<DesiredConfiguration> {
        let url = self.endpoint(device, "config");
        let resp = match self.client.get(&url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!("GET {url} failed: {e}");
                return None;
            }
        };
        if resp.status() != StatusCode::OK {
            debug!("no config update, server answered {}", resp.status());
            return None;
        }
        let body = match resp.bytes().await {
            Ok(body) => body,
            Err(e) => {
                warn!("reading config body failed: {e}");
                return None;
            }
        };
        decode_config(&body)
    }
}

/// Malformed documents are treated like no document.
pub fn decode_config(body: &[u8]) -> Option<DesiredConfiguration> {
    match serde_json::from_slice(body) {
        Ok(conf) => Some(conf),
        Err(e) => {
            warn!("ignoring malformed config document: {e}");
            None
        }
    }
}
