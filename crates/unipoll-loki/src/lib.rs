//! Loki output plugin: ships the event log (events, IDS, alarms,
//! anomalies, Protect logs) to a Loki instance on an interval.

mod client;
mod report;

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use unipoll_core::config::resolve_secret;
use unipoll_core::webserver::{self, OutputUpdate};
use unipoll_core::{Collect, ConfigLoader, Filter, Output, PollerError};

use crate::client::LokiClient;
use crate::report::Report;

/// The name this plugin registers under.
pub const PLUGIN_NAME: &str = "loki";

/// The input plugin we pull events from.
const INPUT_NAME: &str = "unifi";

const MAX_INTERVAL: u64 = 600; // 10 minutes
const MIN_INTERVAL: u64 = 10;
const DEFAULT_INTERVAL: u64 = 120;
const DEFAULT_TIMEOUT: u64 = 10;

/// The `[loki]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub disable: bool,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
    #[serde(default)]
    pub tenant_id: String,
    #[serde(default)]
    pub verify_ssl: bool,
    /// Poll interval in seconds; clamped to [10, 600].
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// HTTP timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disable: false,
            url: String::new(),
            user: String::new(),
            pass: String::new(),
            tenant_id: String::new(),
            verify_ssl: false,
            interval: DEFAULT_INTERVAL,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Config {
    /// Clamp the interval, resolve secrets, and trim the URL.
    fn normalize(mut self) -> Result<Self, PollerError> {
        self.interval = self.interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        self.pass = resolve_secret(&self.pass)?;
        self.url = self.url.trim_end_matches('/').to_owned();

        Ok(self)
    }
}

/// The Loki output plugin.
#[derive(Default)]
pub struct Loki {
    config: RwLock<Config>,
}

impl Loki {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn config(&self) -> Config {
        self.config.read().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl Output for Loki {
    fn configure(&self, loader: &ConfigLoader) -> Result<(), PollerError> {
        let config: Config = loader.section(PLUGIN_NAME)?;
        let config = config.normalize()?;

        {
            *self.config.write().expect("lock poisoned") = config;
        }

        Ok(())
    }

    fn enabled(&self) -> bool {
        let config = self.config();
        !config.disable && !config.url.is_empty()
    }

    async fn run(&self, collect: Arc<dyn Collect>) -> Result<(), PollerError> {
        if !self.enabled() {
            debug!("Loki config missing (or disabled), Loki output disabled");
            return Ok(());
        }

        let config = self.config();
        let client = LokiClient::new(&config)?;
        let interval = Duration::from_secs(config.interval);

        webserver::update_output(
            PLUGIN_NAME,
            OutputUpdate {
                config: Some(serde_json::json!({
                    "url": config.url,
                    "tenant_id": config.tenant_id,
                    "interval": config.interval,
                    "timeout": config.timeout,
                    "pass": !config.pass.is_empty(),
                })),
            },
        );

        info!(url = config.url, interval = config.interval, "Loki event collection started");

        // Everything newer than one interval ago goes out on the first
        // push.
        let mut last = Utc::now()
            - chrono::Duration::from_std(interval).unwrap_or(chrono::Duration::seconds(120));

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await; // consume the immediate first tick

        loop {
            ticker.tick().await;

            let events = match collect
                .events(&Filter {
                    dur: interval,
                    ..Filter::input(INPUT_NAME)
                })
                .await
            {
                Ok(events) => events,
                Err(e) => {
                    error!(error = %e, "event fetch for Loki failed");
                    continue;
                }
            };

            // A stuck cutoff keeps re-shipping old records; drag it
            // forward when it falls too far behind.
            let four_intervals =
                chrono::Duration::from_std(4 * interval).unwrap_or(chrono::Duration::seconds(480));
            if Utc::now() - last > four_intervals {
                last = Utc::now() - four_intervals;
            }

            let start = Utc::now();
            let mut report = Report::new(start, last);
            let logs = report.process(&events);

            match client.post(&logs).await {
                Ok(()) => {
                    last = report.start;
                    webserver::update_output_counter(
                        PLUGIN_NAME,
                        "streams",
                        logs.streams.len() as i64,
                    );
                    info!("events sent to Loki. {report}");
                }
                Err(e) => error!(error = %e, "sending to Loki failed"),
            }
        }
    }

    async fn debug_output(&self) -> Result<(), PollerError> {
        if !self.enabled() {
            return Ok(());
        }

        let config = self.config();
        LokiClient::new(&config)?.ready().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_clamps_to_bounds() {
        let low = Config {
            interval: 2,
            url: "http://loki:3100".into(),
            ..Config::default()
        }
        .normalize()
        .expect("normalize");
        assert_eq!(low.interval, MIN_INTERVAL);

        let high = Config {
            interval: 86_400,
            ..Config::default()
        }
        .normalize()
        .expect("normalize");
        assert_eq!(high.interval, MAX_INTERVAL);
    }

    #[test]
    fn disabled_without_url() {
        let plugin = Loki::default();
        assert!(!plugin.enabled());
    }
}
