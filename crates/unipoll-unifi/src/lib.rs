//! The `unifi` input plugin: maintains a logged-in session per
//! configured controller, assembles one snapshot per poll, and collects
//! the event log. Client records are augmented with parent-device names
//! before anything leaves this crate.

mod collector;
mod events;
mod pii;
mod webview;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info};
use url::Url;

use unipoll_api::Auth;
use unipoll_core::config::resolve_secret;
use unipoll_core::{ConfigLoader, EventLog, Filter, Input, PollerError, Snapshot};

/// The name this plugin registers under.
pub const PLUGIN_NAME: &str = "unifi";

const DEFAULT_URL: &str = "https://127.0.0.1:8443";
const DEFAULT_USER: &str = "unipoll";
const DEFAULT_PASS: &str = "unipoll";
const DEFAULT_SITE: &str = "all";

// ── Config file types ────────────────────────────────────────────────

/// Per-controller configuration. Unset options inherit from the
/// `defaults` block, then from hard defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerConfig {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub verify_ssl: Option<bool>,
    #[serde(default)]
    pub ssl_cert_paths: Vec<PathBuf>,
    #[serde(default)]
    pub sites: Vec<String>,
    #[serde(default)]
    pub save_ids: Option<bool>,
    #[serde(default)]
    pub save_events: Option<bool>,
    #[serde(default)]
    pub save_alarms: Option<bool>,
    #[serde(default)]
    pub save_anomalies: Option<bool>,
    #[serde(default)]
    pub save_dpi: Option<bool>,
    #[serde(default)]
    pub save_rogue: Option<bool>,
    #[serde(default)]
    pub save_sites: Option<bool>,
    #[serde(default)]
    pub save_protect: Option<bool>,
    #[serde(default)]
    pub hash_pii: Option<bool>,
    #[serde(default)]
    pub drop_pii: Option<bool>,
}

/// The `[unifi]` config section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub disable: bool,
    /// Allow `/scrape?target=` to create controllers on the fly from
    /// the defaults block.
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub defaults: ControllerConfig,
    #[serde(default, rename = "controller")]
    pub controllers: Vec<ControllerConfig>,
}

// ── Runtime state ────────────────────────────────────────────────────

/// Concrete per-controller settings after the defaults overlay.
#[derive(Debug, Clone)]
pub(crate) struct Resolved {
    pub id: String,
    pub url: Url,
    pub auth: Auth,
    pub verify_ssl: bool,
    pub cert_paths: Vec<PathBuf>,
    pub sites: Vec<String>,
    pub save_ids: bool,
    pub save_events: bool,
    pub save_alarms: bool,
    pub save_anomalies: bool,
    pub save_dpi: bool,
    pub save_rogue: bool,
    pub save_sites: bool,
    pub save_protect: bool,
    pub hash_pii: bool,
    pub drop_pii: bool,
}

/// One polled controller: resolved settings, the live session handle,
/// and the verified site filter. The session is `None` until the first
/// successful auth and cleared whenever a request fails auth-like.
pub(crate) struct Controller {
    pub config: Resolved,
    pub session: RwLock<Option<Arc<unipoll_api::UnifiClient>>>,
    pub site_filter: RwLock<Vec<String>>,
}

impl Controller {
    fn new(config: Resolved) -> Arc<Self> {
        let site_filter = config.sites.clone();

        Arc::new(Self {
            config,
            session: RwLock::new(None),
            site_filter: RwLock::new(site_filter),
        })
    }
}

/// The plugin itself. Controllers are fixed after `configure`; the
/// dynamic map grows when targeted scrapes name unconfigured URLs.
#[derive(Default)]
pub struct InputUnifi {
    state: std::sync::RwLock<State>,
}

#[derive(Default)]
struct State {
    disable: bool,
    dynamic: bool,
    defaults: ControllerConfig,
    controllers: Vec<Arc<Controller>>,
    dynamic_controllers: HashMap<String, Arc<Controller>>,
}

impl InputUnifi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn disabled(&self) -> bool {
        self.state.read().expect("lock poisoned").disable
    }

    fn controllers(&self) -> Vec<Arc<Controller>> {
        self.state.read().expect("lock poisoned").controllers.clone()
    }

    /// Find or create the dynamic controller for a scrape target URL.
    fn dynamic_controller(&self, target: &str) -> Result<Arc<Controller>, PollerError> {
        let mut state = self.state.write().expect("lock poisoned");

        if !state.dynamic {
            return Err(PollerError::Input {
                input: PLUGIN_NAME.into(),
                message: format!("scrape target {target} is not a configured controller"),
            });
        }

        if let Some(existing) = state.dynamic_controllers.get(target) {
            return Ok(Arc::clone(existing));
        }

        let mut config = state.defaults.clone();
        config.url = target.to_owned();
        config.name = target.to_owned();

        let defaults = state.defaults.clone();
        let resolved = resolve_controller(&config, &defaults)?;
        let controller = Controller::new(resolved);

        info!(url = target, "created dynamic controller from defaults");
        state
            .dynamic_controllers
            .insert(target.to_owned(), Arc::clone(&controller));

        Ok(controller)
    }
}

/// Overlay one controller's options onto the defaults block and resolve
/// secrets, producing concrete settings.
fn resolve_controller(
    c: &ControllerConfig,
    defaults: &ControllerConfig,
) -> Result<Resolved, PollerError> {
    let pick = |own: Option<bool>, def: Option<bool>, fallback: bool| {
        own.or(def).unwrap_or(fallback)
    };

    let url_str = if c.url.is_empty() {
        if defaults.url.is_empty() {
            DEFAULT_URL.to_owned()
        } else {
            defaults.url.clone()
        }
    } else {
        c.url.clone()
    };

    let url: Url = url_str
        .parse()
        .map_err(|e| PollerError::Config(format!("controller url {url_str}: {e}")))?;

    let api_key = resolve_secret(if c.api_key.is_empty() {
        &defaults.api_key
    } else {
        &c.api_key
    })?;

    let auth = if api_key.is_empty() {
        let user = if c.user.is_empty() {
            if defaults.user.is_empty() {
                DEFAULT_USER.to_owned()
            } else {
                defaults.user.clone()
            }
        } else {
            c.user.clone()
        };

        let pass = resolve_secret(if c.pass.is_empty() {
            &defaults.pass
        } else {
            &c.pass
        })?;
        let pass = if pass.is_empty() {
            DEFAULT_PASS.to_owned()
        } else {
            pass
        };

        Auth::Credentials {
            username: user,
            password: SecretString::from(pass),
        }
    } else {
        // An API key wins; any user/pass combo is ignored.
        Auth::ApiKey(SecretString::from(api_key))
    };

    let mut sites = if c.sites.is_empty() {
        defaults.sites.clone()
    } else {
        c.sites.clone()
    };
    if sites.is_empty() {
        sites = vec![DEFAULT_SITE.to_owned()];
    }

    let cert_paths = if c.ssl_cert_paths.is_empty() {
        defaults.ssl_cert_paths.clone()
    } else {
        c.ssl_cert_paths.clone()
    };

    Ok(Resolved {
        id: if c.name.is_empty() {
            url_str
        } else {
            c.name.clone()
        },
        url,
        auth,
        verify_ssl: pick(c.verify_ssl, defaults.verify_ssl, false),
        cert_paths,
        sites,
        save_ids: pick(c.save_ids, defaults.save_ids, false),
        save_events: pick(c.save_events, defaults.save_events, false),
        save_alarms: pick(c.save_alarms, defaults.save_alarms, false),
        save_anomalies: pick(c.save_anomalies, defaults.save_anomalies, false),
        save_dpi: pick(c.save_dpi, defaults.save_dpi, false),
        save_rogue: pick(c.save_rogue, defaults.save_rogue, false),
        save_sites: pick(c.save_sites, defaults.save_sites, true),
        save_protect: pick(c.save_protect, defaults.save_protect, false),
        hash_pii: pick(c.hash_pii, defaults.hash_pii, false),
        drop_pii: pick(c.drop_pii, defaults.drop_pii, false),
    })
}

// ── Input interface ──────────────────────────────────────────────────

#[async_trait]
impl Input for InputUnifi {
    fn configure(&self, loader: &ConfigLoader) -> Result<(), PollerError> {
        let config: Config = loader.section(PLUGIN_NAME)?;

        let mut controllers = Vec::with_capacity(config.controllers.len());
        for c in &config.controllers {
            controllers.push(Controller::new(resolve_controller(c, &config.defaults)?));
        }

        let mut state = self.state.write().expect("lock poisoned");
        state.disable = config.disable;
        state.dynamic = config.dynamic;
        state.defaults = config.defaults;
        state.controllers = controllers;

        Ok(())
    }

    async fn initialize(&self) -> Result<(), PollerError> {
        if self.disabled() {
            info!("unifi input disabled");
            return Ok(());
        }

        let controllers = self.controllers();
        if controllers.is_empty() {
            return Err(PollerError::Config(
                "no unifi controllers defined for unifi input".into(),
            ));
        }

        for controller in &controllers {
            match self.authenticate(controller).await {
                Ok(()) => {
                    let filter = controller.site_filter.read().await.clone();
                    info!(
                        url = %controller.config.url,
                        sites = ?filter,
                        "polling UniFi controller"
                    );
                }
                Err(e) => {
                    // First contact failing is not fatal; the pool
                    // re-auths on the next poll.
                    error!(
                        controller = controller.config.id,
                        error = %e,
                        "controller auth or connection failed, but continuing to retry"
                    );
                }
            }
        }

        webview::publish_config(self);

        Ok(())
    }

    async fn metrics(&self, filter: &Filter) -> Result<Snapshot, PollerError> {
        if self.disabled() {
            return Ok(Snapshot::default());
        }

        // A targeted scrape with an unconfigured URL goes through the
        // dynamic-controller path.
        if filter.path.starts_with("http")
            && !self
                .controllers()
                .iter()
                .any(|c| c.config.url.as_str().trim_end_matches('/')
                    == filter.path.trim_end_matches('/'))
        {
            let controller = self.dynamic_controller(&filter.path)?;
            return self.collect_controller(&controller).await;
        }

        let mut composite = Snapshot::default();
        let mut collected = false;
        let mut errs = Vec::new();

        for controller in self.controllers() {
            if !filter.term.is_empty() && controller.config.id != filter.term {
                continue;
            }
            if !filter.path.is_empty()
                && controller.config.url.as_str().trim_end_matches('/')
                    != filter.path.trim_end_matches('/')
            {
                continue;
            }

            match self.collect_controller(&controller).await {
                Ok(snapshot) => {
                    collected = true;
                    composite.append(snapshot);
                }
                Err(e) => errs.push(format!("{}: {e}", controller.config.id)),
            }
        }

        match PollerError::join(errs) {
            Some(err) if !collected => Err(err),
            Some(err) => {
                error!(error = %err, "partial metrics collection");
                Ok(composite)
            }
            None => Ok(composite),
        }
    }

    async fn events(&self, filter: &Filter) -> Result<EventLog, PollerError> {
        if self.disabled() {
            return Ok(EventLog::default());
        }

        let mut composite = EventLog::default();
        let mut collected = false;
        let mut errs = Vec::new();

        for controller in self.controllers() {
            if !filter.term.is_empty() && controller.config.id != filter.term {
                continue;
            }

            match self.collect_controller_events(&controller).await {
                Ok(events) => {
                    collected = true;
                    composite.append(events);
                }
                Err(e) => errs.push(format!("{}: {e}", controller.config.id)),
            }
        }

        match PollerError::join(errs) {
            Some(err) if !collected => Err(err),
            Some(err) => {
                error!(error = %err, "partial event collection");
                Ok(composite)
            }
            None => Ok(composite),
        }
    }

    async fn raw_metrics(&self, filter: &Filter) -> Result<Vec<u8>, PollerError> {
        let controllers = self.controllers();
        let controller = controllers.get(filter.unit).ok_or_else(|| {
            PollerError::Input {
                input: PLUGIN_NAME.into(),
                message: format!("no controller at index {}", filter.unit),
            }
        })?;

        self.dump_json(controller, filter).await
    }

    async fn debug_input(&self) -> Result<(), PollerError> {
        if self.disabled() {
            return Ok(());
        }

        let mut errs = Vec::new();

        for controller in self.controllers() {
            if let Err(e) = self.authenticate(&controller).await {
                errs.push(format!("{}: {e}", controller.config.id));
            }
        }

        match PollerError::join(errs) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_overlay_fills_unset_options() {
        let defaults = ControllerConfig {
            url: "https://10.0.0.1:8443".into(),
            user: "poller".into(),
            pass: "secret".into(),
            save_dpi: Some(true),
            verify_ssl: Some(false),
            ..ControllerConfig::default()
        };

        let own = ControllerConfig {
            save_dpi: Some(false),
            ..ControllerConfig::default()
        };

        let resolved = resolve_controller(&own, &defaults).expect("resolve");

        assert_eq!(resolved.url.as_str(), "https://10.0.0.1:8443/");
        assert!(!resolved.save_dpi); // own value wins over default
        assert!(resolved.save_sites); // hard default true
        assert!(!resolved.save_ids); // hard default false
        assert_eq!(resolved.sites, vec!["all".to_owned()]);

        match resolved.auth {
            Auth::Credentials { ref username, .. } => assert_eq!(username, "poller"),
            Auth::ApiKey(_) => panic!("expected credentials auth"),
        }
    }

    #[test]
    fn api_key_wins_over_credentials() {
        let own = ControllerConfig {
            url: "https://10.0.0.2".into(),
            user: "poller".into(),
            pass: "secret".into(),
            api_key: "abc123".into(),
            ..ControllerConfig::default()
        };

        let resolved =
            resolve_controller(&own, &ControllerConfig::default()).expect("resolve");
        assert!(matches!(resolved.auth, Auth::ApiKey(_)));
    }

    #[test]
    fn controller_id_prefers_name() {
        let own = ControllerConfig {
            name: "prod".into(),
            url: "https://10.0.0.3".into(),
            ..ControllerConfig::default()
        };

        let resolved =
            resolve_controller(&own, &ControllerConfig::default()).expect("resolve");
        assert_eq!(resolved.id, "prod");
    }
}
