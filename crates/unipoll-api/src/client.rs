// UniFi legacy API HTTP client
//
// Wraps `reqwest::Client` with UniFi-specific URL construction, envelope
// unwrapping, and platform-aware path prefixing. Endpoint methods
// (sites, clients, devices, events) live in sibling files as inherent
// impls to keep this module focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// How the client authenticates with the controller.
#[derive(Debug, Clone)]
pub enum Auth {
    /// Cookie-based session auth.
    Credentials {
        username: String,
        password: SecretString,
    },
    /// `X-API-KEY` header auth (UniFi OS consoles).
    ApiKey(SecretString),
}

/// Standard UniFi legacy API response envelope:
/// `{ "meta": { "rc": "ok", "msg": "optional" }, "data": [...] }`
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

/// Metadata from the envelope. `rc == "ok"` means success.
#[derive(Debug, Deserialize)]
pub struct Meta {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

/// Raw HTTP client for a UniFi controller's legacy API.
///
/// Handles the `{meta, data}` envelope, site-scoped URL construction,
/// and the UniFi OS `/proxy/network` prefix. All methods return
/// unwrapped `data` payloads.
#[derive(Debug)]
pub struct UnifiClient {
    http: reqwest::Client,
    base_url: Url,
    auth: Auth,
    is_unifi_os: bool,
    server_version: String,
}

impl UnifiClient {
    /// Connect and authenticate against a controller.
    ///
    /// Probes the controller root to detect UniFi OS vs a standalone
    /// controller, then logs in (session auth) or validates the API key.
    pub async fn connect(
        base_url: Url,
        auth: Auth,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;

        let is_unifi_os = probe_unifi_os(&http, &base_url).await;
        debug!(is_unifi_os, url = %base_url, "detected controller platform");

        let mut client = Self {
            http,
            base_url,
            auth,
            is_unifi_os,
            server_version: String::new(),
        };
        client.login().await?;
        client.fetch_server_version().await;

        Ok(client)
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The controller software version, when the status endpoint reports one.
    pub fn server_version(&self) -> &str {
        &self.server_version
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Authenticate with the controller.
    ///
    /// Session auth posts to `/api/auth/login` (UniFi OS) or `/api/login`
    /// (standalone). API-key auth is validated with a lightweight request
    /// since there is no login round-trip.
    pub async fn login(&mut self) -> Result<(), Error> {
        match &self.auth {
            Auth::Credentials { username, password } => {
                let path = if self.is_unifi_os {
                    "api/auth/login"
                } else {
                    "api/login"
                };
                let url = self.join(path)?;
                debug!(%url, username, "logging in");

                let body = serde_json::json!({
                    "username": username,
                    "password": password.expose_secret(),
                    "remember": true,
                });

                let resp = self.http.post(url).json(&body).send().await?;
                if !resp.status().is_success() {
                    return Err(Error::Authentication {
                        message: format!("login rejected with HTTP {}", resp.status()),
                    });
                }

                Ok(())
            }
            Auth::ApiKey(_) => {
                // No session to establish; the key rides on every request.
                let url = self.api_url("self")?;
                let resp = self.request(reqwest::Method::GET, url, None::<&()>).await?;
                if resp.status() == reqwest::StatusCode::UNAUTHORIZED {
                    return Err(Error::InvalidApiKey);
                }

                Ok(())
            }
        }
    }

    /// Log out of a session. Non-fatal when it fails.
    pub async fn logout(&self) -> Result<(), Error> {
        if matches!(self.auth, Auth::ApiKey(_)) {
            return Ok(());
        }

        let path = if self.is_unifi_os {
            "api/auth/logout"
        } else {
            "api/logout"
        };
        let url = self.join(path)?;
        self.http.post(url).send().await?;

        Ok(())
    }

    async fn fetch_server_version(&mut self) {
        #[derive(Deserialize)]
        struct Status {
            #[serde(default)]
            meta: Option<StatusMeta>,
        }
        #[derive(Deserialize)]
        struct StatusMeta {
            #[serde(default)]
            server_version: String,
        }

        let Ok(url) = self.join("status") else { return };
        if let Ok(resp) = self.http.get(url).send().await {
            if let Ok(status) = resp.json::<Status>().await {
                self.server_version = status.meta.map(|m| m.server_version).unwrap_or_default();
            }
        }
    }

    // ── URL builders ─────────────────────────────────────────────────

    fn prefix(&self) -> &'static str {
        if self.is_unifi_os { "proxy/network/" } else { "" }
    }

    fn join(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// Build a controller-level API URL: `{base}[/proxy/network]/api/{path}`
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.join(&format!("{}api/{}", self.prefix(), path))
    }

    /// Build a site-scoped URL: `{base}[/proxy/network]/api/s/{site}/{path}`
    pub(crate) fn site_url(&self, site: &str, path: &str) -> Result<Url, Error> {
        self.join(&format!("{}api/s/{}/{}", self.prefix(), site, path))
    }

    // ── Request helpers ──────────────────────────────────────────────

    async fn request(
        &self,
        method: reqwest::Method,
        url: Url,
        body: Option<&impl Serialize>,
    ) -> Result<reqwest::Response, Error> {
        let mut req = self.http.request(method, url);

        if let Auth::ApiKey(key) = &self.auth {
            req = req.header("X-API-KEY", key.expose_secret());
        }

        if let Some(body) = body {
            req = req.json(body);
        }

        Ok(req.send().await?)
    }

    /// Send a GET request and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {url}");
        let resp = self.request(reqwest::Method::GET, url, None::<&()>).await?;
        self.parse_envelope(resp).await
    }

    /// Send a POST request with a JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
    ) -> Result<Vec<T>, Error> {
        debug!("POST {url}");
        let resp = self.request(reqwest::Method::POST, url, Some(body)).await?;
        self.parse_envelope(resp).await
    }

    /// Fetch an arbitrary controller path and return the raw body.
    ///
    /// The path is taken relative to the controller root with no
    /// platform prefix applied; callers name the exact endpoint. Used by
    /// the `--dumpjson other <path>` debug flow and the Protect log pull.
    pub async fn get_json(&self, path: &str) -> Result<Vec<u8>, Error> {
        let url = self.join(path.trim_start_matches('/'))?;
        debug!("GET {url} (raw)");
        let resp = self.request(reqwest::Method::GET, url, None::<&()>).await?;

        Ok(resp.bytes().await?.to_vec())
    }

    /// Parse the `{meta, data}` envelope, returning `data` on success
    /// or an `Error::Api` when `meta.rc != "ok"`.
    async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<Vec<T>, Error> {
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "session expired or invalid credentials".into(),
            });
        }

        let body = resp.text().await?;

        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: body.clone(),
            })?;

        match envelope.meta.rc.as_str() {
            "ok" => Ok(envelope.data),
            _ => Err(Error::Api {
                message: envelope
                    .meta
                    .msg
                    .unwrap_or_else(|| format!("rc={}", envelope.meta.rc)),
            }),
        }
    }
}

/// Probe the controller root. UniFi OS consoles answer `GET /` with 200;
/// standalone controllers redirect to `/manage`.
async fn probe_unifi_os(http: &reqwest::Client, base_url: &Url) -> bool {
    match http.get(base_url.clone()).send().await {
        Ok(resp) => {
            resp.status() == reqwest::StatusCode::OK && !resp.url().path().starts_with("/manage")
        }
        Err(_) => false,
    }
}
