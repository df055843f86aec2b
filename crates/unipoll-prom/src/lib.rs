//! Prometheus bridge output plugin.
//!
//! Inverts the poll loop: a scrape of `/metrics` triggers one snapshot
//! collection and streams the result back as gauge samples. The
//! `/scrape?input=<name>&target=<url>` endpoint narrows collection to a
//! single controller selected by URL.

mod exports;
mod report;

use std::sync::{Arc, RwLock};
use std::time::Instant;

use async_trait::async_trait;
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use unipoll_core::webserver::{self, OutputUpdate};
use unipoll_core::{Collect, ConfigLoader, Filter, ItemKind, Output, PollerError, Snapshot};

use crate::report::{drain, DrainResult, Report, Timing};

/// The name this plugin registers under.
pub const PLUGIN_NAME: &str = "prometheus";

/// The input plugin scrapes pull from.
const INPUT_NAME: &str = "unifi";

const DEFAULT_LISTEN: &str = "0.0.0.0:9130";

/// The `[prometheus]` config section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub disable: bool,
    /// Metric name prefix; hyphens are squeezed out.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Count export failures as an `export_errors_total` metric instead
    /// of silently producing an incomplete scrape.
    #[serde(default)]
    pub report_errors: bool,
    #[serde(default = "default_listen")]
    pub http_listen: String,
}

fn default_namespace() -> String {
    unipoll_core::APP_NAME.replace('-', "")
}

fn default_listen() -> String {
    DEFAULT_LISTEN.to_owned()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disable: false,
            namespace: default_namespace(),
            report_errors: false,
            http_listen: default_listen(),
        }
    }
}

/// The Prometheus bridge plugin.
#[derive(Default)]
pub struct Prometheus {
    config: RwLock<Config>,
}

impl Prometheus {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn config(&self) -> Config {
        self.config.read().expect("lock poisoned").clone()
    }
}

#[derive(Clone)]
struct Ctx {
    collect: Arc<dyn Collect>,
    config: Config,
}

#[async_trait]
impl Output for Prometheus {
    fn configure(&self, loader: &ConfigLoader) -> Result<(), PollerError> {
        let mut config: Config = loader.section(PLUGIN_NAME)?;

        config.namespace = config.namespace.replace('-', "_").trim_matches('_').to_owned();
        if config.namespace.is_empty() {
            config.namespace = default_namespace();
        }
        if config.http_listen.is_empty() {
            config.http_listen = default_listen();
        }

        {
            *self.config.write().expect("lock poisoned") = config;
        }

        Ok(())
    }

    fn enabled(&self) -> bool {
        !self.config().disable
    }

    async fn run(&self, collect: Arc<dyn Collect>) -> Result<(), PollerError> {
        if !self.enabled() {
            debug!("Prometheus config missing (or disabled), Prometheus output disabled");
            return Ok(());
        }

        let config = self.config();

        webserver::update_output(
            PLUGIN_NAME,
            OutputUpdate {
                config: Some(serde_json::json!({
                    "namespace": config.namespace,
                    "http_listen": config.http_listen,
                    "report_errors": config.report_errors,
                })),
            },
        );

        info!(
            listen = config.http_listen,
            namespace = config.namespace,
            "exporting measurements for Prometheus at /metrics"
        );

        let listener = tokio::net::TcpListener::bind(&config.http_listen)
            .await
            .map_err(|e| {
                PollerError::Sink(format!("prometheus bind {}: {e}", config.http_listen))
            })?;

        let ctx = Ctx { collect, config };
        let router = Router::new()
            .route("/metrics", get(handle_metrics))
            .route("/scrape", get(handle_scrape))
            .with_state(ctx);

        axum::serve(listener, router)
            .await
            .map_err(|e| PollerError::Sink(format!("prometheus server: {e}")))
    }

    async fn debug_output(&self) -> Result<(), PollerError> {
        if !self.enabled() {
            return Ok(());
        }

        // A bad listen address is the only local failure mode.
        self.config()
            .http_listen
            .parse::<std::net::SocketAddr>()
            .map(|_| ())
            .map_err(|e| PollerError::Config(format!("prometheus http_listen: {e}")))
    }
}

// ── Scrape handlers ──────────────────────────────────────────────────

async fn handle_metrics(State(ctx): State<Ctx>) -> Response {
    run_scrape(&ctx, Filter::input(INPUT_NAME)).await
}

#[derive(Debug, Deserialize)]
struct ScrapeParams {
    #[serde(default)]
    input: String,
    #[serde(default)]
    target: String,
}

/// Targeted scrape: collect from one controller selected by URL.
async fn handle_scrape(State(ctx): State<Ctx>, Query(params): Query<ScrapeParams>) -> Response {
    let input = if params.input.is_empty() {
        INPUT_NAME.to_owned()
    } else {
        params.input
    };

    let filter = Filter {
        name: input,
        path: params.target,
        ..Filter::default()
    };

    run_scrape(&ctx, filter).await
}

async fn run_scrape(ctx: &Ctx, filter: Filter) -> Response {
    let start = Instant::now();

    let snapshot = match ctx.collect.metrics(&filter).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            error!(error = %e, "metric fetch for Prometheus scrape failed");
            return (StatusCode::BAD_GATEWAY, format!("metric fetch failed: {e}\n"))
                .into_response();
        }
    };

    let timing = Timing {
        fetch: start.elapsed(),
        ..Timing::default()
    };

    match export(ctx, snapshot, timing, start).await {
        Ok(body) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "prometheus export failed");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}\n")).into_response()
        }
    }
}

/// The report pipeline, scrape flavored: transient report, buffered
/// channel, producer fan-out, drain into a fresh registry.
async fn export(
    ctx: &Ctx,
    snapshot: Snapshot,
    mut timing: Timing,
    start: Instant,
) -> Result<String, PollerError> {
    let (report, rx) = Report::new(snapshot, ctx.config.namespace.clone());
    let counts = Arc::clone(&report.counts);

    let drain_task = tokio::spawn(drain(
        rx,
        ctx.config.namespace.clone(),
        ctx.config.report_errors,
    ));

    let producers = exports::spawn_producers(&report);
    drop(report);

    for producer in producers {
        producer
            .await
            .map_err(|e| PollerError::Internal(format!("export task panicked: {e}")))?;
    }

    let DrainResult {
        body,
        total,
        zeros,
        errors,
    } = drain_task
        .await
        .map_err(|e| PollerError::Internal(format!("drain task panicked: {e}")))??;

    timing.elapsed = start.elapsed();

    info!(
        sites = counts.get(ItemKind::Site),
        clients = counts.get(ItemKind::Client),
        uap = counts.get(ItemKind::Uap),
        usw = counts.get(ItemKind::Usw),
        gateways = counts.get(ItemKind::Usg) + counts.get(ItemKind::Udm) + counts.get(ItemKind::Uxg),
        metrics = total,
        zeros,
        errors,
        fetch_ms = timing.fetch.as_millis() as u64,
        elapsed_ms = timing.elapsed.as_millis() as u64,
        "UniFi measurements exported"
    );

    webserver::update_output_counter(PLUGIN_NAME, "scrapes", 1);
    webserver::update_output_counter(PLUGIN_NAME, "metrics", total as i64);

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use unipoll_api::models::{DeviceList, Site, SiteHealth, Uap};
    use unipoll_core::EventLog;

    struct FakeCollect {
        snapshot: Snapshot,
    }

    #[async_trait]
    impl Collect for FakeCollect {
        async fn metrics(&self, _: &Filter) -> Result<Snapshot, PollerError> {
            Ok(self.snapshot.clone())
        }

        async fn events(&self, _: &Filter) -> Result<EventLog, PollerError> {
            Ok(EventLog::default())
        }

        fn poller(&self) -> unipoll_core::PollerSection {
            unipoll_core::PollerSection::default()
        }

        fn inputs(&self) -> Vec<String> {
            vec![INPUT_NAME.to_owned()]
        }

        fn outputs(&self) -> Vec<String> {
            vec![PLUGIN_NAME.to_owned()]
        }
    }

    fn test_snapshot() -> Snapshot {
        let mut devices = DeviceList::default();
        devices.uaps.push(Uap {
            name: "attic-ap".into(),
            mac: "aa:bb".into(),
            adopted: true,
            uptime: 99.0.into(),
            ..Uap::default()
        });
        // Unadopted device: counted nowhere, exported nowhere.
        devices.uaps.push(Uap::default());

        Snapshot {
            sites: vec![Site {
                site_name: "Home (default)".into(),
                health: vec![SiteHealth {
                    subsystem: "wlan".into(),
                    status: "ok".into(),
                    ..SiteHealth::default()
                }],
                ..Site::default()
            }],
            devices: Some(devices),
            ..Snapshot::default()
        }
    }

    #[tokio::test]
    async fn scrape_exports_gauges_and_counts_families() {
        let ctx = Ctx {
            collect: Arc::new(FakeCollect {
                snapshot: test_snapshot(),
            }),
            config: Config::default(),
        };

        let start = Instant::now();
        let body = export(&ctx, test_snapshot(), Timing::default(), start)
            .await
            .expect("export");

        assert!(body.contains("unipoll_device_uptime_seconds"));
        assert!(body.contains("attic-ap"));
        assert!(body.contains("unipoll_site_users"));
        // The unadopted AP must not appear.
        assert_eq!(body.matches("device_uptime_seconds{").count(), 1);
    }

    #[tokio::test]
    async fn report_errors_adds_error_metric() {
        let ctx = Ctx {
            collect: Arc::new(FakeCollect {
                snapshot: Snapshot::default(),
            }),
            config: Config {
                report_errors: true,
                ..Config::default()
            },
        };

        let body = export(&ctx, Snapshot::default(), Timing::default(), Instant::now())
            .await
            .expect("export");

        assert!(body.contains("unipoll_export_errors_total"));
    }
}
