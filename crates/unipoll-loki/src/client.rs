// HTTP client for the Loki push API.

use serde::Serialize;
use tracing::debug;

use unipoll_core::PollerError;

const PUSH_PATH: &str = "/loki/api/v1/push";

/// A batch of log streams in Loki's push format.
#[derive(Debug, Default, Serialize)]
pub(crate) struct Logs {
    pub streams: Vec<LogStream>,
}

/// One labeled stream with `[nanosecond-ts, line]` entries.
#[derive(Debug, Serialize)]
pub(crate) struct LogStream {
    #[serde(rename = "stream")]
    pub labels: std::collections::BTreeMap<String, String>,
    #[serde(rename = "values")]
    pub entries: Vec<[String; 2]>,
}

/// Posts batches to Loki with optional basic auth and tenant header.
pub(crate) struct LokiClient {
    http: reqwest::Client,
    push_url: String,
    username: String,
    password: String,
    tenant_id: String,
}

impl LokiClient {
    pub fn new(config: &crate::Config) -> Result<Self, PollerError> {
        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .map_err(|e| PollerError::Sink(format!("building loki client: {e}")))?;

        let base = config.url.trim_end_matches('/');
        let push_url = format!("{}{PUSH_PATH}", base.trim_end_matches(PUSH_PATH));

        Ok(Self {
            http,
            push_url,
            username: config.user.clone(),
            password: config.pass.clone(),
            tenant_id: config.tenant_id.clone(),
        })
    }

    /// Marshal and post a batch of log streams. Loki answers 204.
    pub async fn post(&self, logs: &Logs) -> Result<(), PollerError> {
        if logs.streams.is_empty() {
            debug!("no log streams to send to Loki");
            return Ok(());
        }

        let mut req = self.http.post(&self.push_url).json(logs);

        if !self.username.is_empty() || !self.password.is_empty() {
            req = req.basic_auth(&self.username, Some(&self.password));
        }

        if !self.tenant_id.is_empty() {
            req = req.header("X-Scope-OrgID", &self.tenant_id);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| PollerError::Sink(format!("sending to Loki: {e}")))?;

        let status = resp.status();
        if status != reqwest::StatusCode::NO_CONTENT && !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PollerError::Sink(format!(
                "loki push: HTTP {status}: {}",
                body.trim().replace('\n', " ")
            )));
        }

        Ok(())
    }

    /// Health probe against Loki's ready endpoint.
    pub async fn ready(&self) -> Result<(), PollerError> {
        let url = self.push_url.replace(PUSH_PATH, "/ready");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PollerError::Sink(format!("loki ready: {e}")))?;

        if !resp.status().is_success() {
            return Err(PollerError::Sink(format!(
                "loki ready: HTTP {}",
                resp.status()
            )));
        }

        Ok(())
    }
}
