//! HTTP client for the lab orchestrator
//!
//! Endpoints consumed:
//! - `GET  /ixp/running` → `{info: {hash, discovered}}`, non-2xx when stopped
//! - `POST /ixp/start {filename}` → `{lab_hash}`
//! - `POST /ixp/wipe`
//! - `GET  /ixp/devices` → `{devices: [...]}`

use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;
use crate::types::{
    DeviceStats, DevicesResponse, LabStatus, RunningResponse, StartRequest, StartResponse,
};

type Result<T> = std::result::Result<T, OrchestratorError>;

/// Orchestrator API client; cheap to clone
#[derive(Debug, Clone)]
pub struct OrchestratorClient {
    http: Client,
    base: Url,
}

impl OrchestratorClient {
    /// Build a client from settings
    ///
    /// # Errors
    /// [`OrchestratorError::InvalidUrl`] for an unusable base URL,
    /// [`OrchestratorError::Transport`] if the HTTP client cannot be built
    pub fn new(config: &OrchestratorConfig) -> Result<Self> {
        let base = parse_base(&config.base_url)?;
        let http = Client::builder().timeout(config.request_timeout()).build()?;
        Ok(Self { http, base })
    }

    /// Base URL with trailing slash
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base.join(path).map_err(|e| OrchestratorError::InvalidUrl {
            url: format!("{}{path}", self.base),
            reason: e.to_string(),
        })
    }

    /// Query whether a lab is running
    ///
    /// Any non-success status means stopped.
    ///
    /// # Errors
    /// Transport failures and malformed success bodies
    pub async fn running(&self) -> Result<LabStatus> {
        let url = self.endpoint("ixp/running")?;
        let resp = self.http.get(url).send().await?;
        if !resp.status().is_success() {
            tracing::debug!(status = resp.status().as_u16(), "orchestrator reports no running lab");
            return Ok(LabStatus::Stopped);
        }
        let body: RunningResponse = decode(resp).await?;
        Ok(LabStatus::Running {
            hash: body.info.hash,
            discovered: body.info.discovered,
        })
    }

    /// Lab status with every failure treated as stopped
    pub async fn status(&self) -> LabStatus {
        match self.running().await {
            Ok(status) => status,
            Err(err) if err.is_transport() => {
                tracing::debug!(error = %err, "orchestrator unreachable, assuming stopped");
                LabStatus::Stopped
            }
            Err(err) => {
                tracing::warn!(error = %err, "unreadable lab status, assuming stopped");
                LabStatus::Stopped
            }
        }
    }

    /// Start a lab from a config file name; returns the lab hash
    ///
    /// # Errors
    /// Transport, non-success status or malformed body
    pub async fn start(&self, filename: &str) -> Result<String> {
        let url = self.endpoint("ixp/start")?;
        let resp = self
            .http
            .post(url)
            .json(&StartRequest { filename })
            .send()
            .await?;
        let body: StartResponse = decode(ensure_success(resp).await?).await?;
        tracing::info!(filename, lab_hash = %body.lab_hash, "lab start requested");
        Ok(body.lab_hash)
    }

    /// Tear down the running lab
    ///
    /// # Errors
    /// Transport or non-success status
    pub async fn wipe(&self) -> Result<()> {
        let url = self.endpoint("ixp/wipe")?;
        let resp = self.http.post(url).send().await?;
        ensure_success(resp).await?;
        tracing::info!("lab wipe requested");
        Ok(())
    }

    /// Per-device statistics of the running lab
    ///
    /// # Errors
    /// Transport, non-success status or malformed body
    pub async fn devices(&self) -> Result<Vec<DeviceStats>> {
        let url = self.endpoint("ixp/devices")?;
        let resp = self.http.get(url).send().await?;
        let body: DevicesResponse = decode(ensure_success(resp).await?).await?;
        Ok(body.devices)
    }
}

fn parse_base(raw: &str) -> Result<Url> {
    let invalid = |reason: String| OrchestratorError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };
    let mut url = Url::parse(raw).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {}", url.scheme())));
    }
    // Relative joins replace the last segment unless the path ends in '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let endpoint = resp.url().path().to_string();
    let body = resp.text().await.unwrap_or_default();
    Err(OrchestratorError::Status {
        endpoint,
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let endpoint = resp.url().path().to_string();
    let text = resp.text().await?;
    serde_json::from_str(&text).map_err(|source| OrchestratorError::Decode { endpoint, source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        assert_eq!(parse_base("http://localhost:8000").unwrap().as_str(), "http://localhost:8000/");
        assert_eq!(parse_base("http://lab.local/api").unwrap().as_str(), "http://lab.local/api/");
    }

    #[test]
    fn endpoints_keep_base_path() {
        let config = OrchestratorConfig::default().with_base_url("http://lab.local/api");
        let client = OrchestratorClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("ixp/running").unwrap().as_str(),
            "http://lab.local/api/ixp/running"
        );
    }

    #[test]
    fn rejects_bad_urls() {
        assert!(matches!(parse_base("not a url"), Err(OrchestratorError::InvalidUrl { .. })));
        assert!(matches!(
            parse_base("ftp://lab.local"),
            Err(OrchestratorError::InvalidUrl { .. })
        ));
    }
}
