//! InfluxDB output plugin: turns each snapshot into line-protocol
//! points with appropriate tags and fields, batched through the report
//! pipeline and committed with one write per poll.

mod clients;
mod devices;
mod dpi;
mod events;
mod line;
mod report;
mod site;

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, error, info};
use url::Url;

use unipoll_core::config::resolve_secret;
use unipoll_core::webserver::{self, OutputUpdate};
use unipoll_core::{Collect, ConfigLoader, EventLog, Filter, Output, PollerError, Snapshot};

use crate::line::{InfluxWriter, ServerVersion};
use crate::report::{drain, Report, ReportOpts, Summary};

/// The name this plugin registers under.
pub const PLUGIN_NAME: &str = "influxdb";

const DEFAULT_INTERVAL: u64 = 30;
const MINIMUM_INTERVAL: u64 = 10;
const DEFAULT_URL: &str = "http://127.0.0.1:8086";
const DEFAULT_DB: &str = "unifi";
const DEFAULT_USER: &str = "unipoll";
const DEFAULT_ORG: &str = "unifi";
const DEFAULT_BUCKET: &str = "unifi";

/// The `[influxdb]` config section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub disable: bool,
    /// Poll interval in seconds; clamped to at least 10.
    #[serde(default)]
    pub interval: u64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub verify_ssl: bool,
    /// Record data for ports that are down or disabled.
    #[serde(default)]
    pub dead_ports: bool,
    /// Emit per-application DPI totals (very high cardinality).
    #[serde(default)]
    pub app_totals: bool,

    // v1 settings.
    #[serde(default)]
    pub db: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,

    // v2 settings; a non-empty auth_token selects the v2 write path.
    #[serde(default)]
    pub auth_token: String,
    #[serde(default)]
    pub org: String,
    #[serde(default)]
    pub bucket: String,
}

impl Config {
    /// Fill defaults, resolve `file://` secrets, and clamp the interval.
    fn normalize(mut self) -> Result<Self, PollerError> {
        if self.url.is_empty() {
            self.url = DEFAULT_URL.to_owned();
        }

        self.auth_token = resolve_secret(&self.auth_token)?;
        self.pass = resolve_secret(&self.pass)?;

        if self.auth_token.is_empty() {
            if self.user.is_empty() {
                self.user = DEFAULT_USER.to_owned();
            }
            if self.pass.is_empty() {
                self.pass = DEFAULT_USER.to_owned();
            }
            if self.db.is_empty() {
                self.db = DEFAULT_DB.to_owned();
            }
        } else {
            if self.org.is_empty() {
                self.org = DEFAULT_ORG.to_owned();
            }
            if self.bucket.is_empty() {
                self.bucket = DEFAULT_BUCKET.to_owned();
            }
        }

        if self.interval == 0 {
            self.interval = DEFAULT_INTERVAL;
        } else if self.interval < MINIMUM_INTERVAL {
            self.interval = MINIMUM_INTERVAL;
        }

        Ok(self)
    }

    fn version(&self) -> ServerVersion {
        if self.auth_token.is_empty() {
            ServerVersion::V1 {
                db: self.db.clone(),
                user: self.user.clone(),
                pass: self.pass.clone(),
            }
        } else {
            ServerVersion::V2 {
                org: self.org.clone(),
                bucket: self.bucket.clone(),
                token: self.auth_token.clone(),
            }
        }
    }

    fn writer(&self) -> Result<InfluxWriter, PollerError> {
        let url: Url = self
            .url
            .parse()
            .map_err(|e| PollerError::Config(format!("invalid influx URL {}: {e}", self.url)))?;

        InfluxWriter::new(url, self.version(), self.verify_ssl)
    }
}

/// The InfluxDB output plugin.
#[derive(Default)]
pub struct InfluxDb {
    config: RwLock<Config>,
}

impl InfluxDb {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn config(&self) -> Config {
        self.config.read().expect("lock poisoned").clone()
    }

    /// One poll tick: fetch, report, commit, log. Failures are logged
    /// and skipped; the scheduler never dies on a bad tick.
    async fn poll(&self, collect: &Arc<dyn Collect>, writer: &InfluxWriter, interval: Duration) {
        let snapshot = match collect.metrics(&Filter::input("unifi")).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!(error = %e, "metric fetch for InfluxDB failed");
                return;
            }
        };

        let events = match collect
            .events(&Filter {
                dur: interval,
                ..Filter::input("unifi")
            })
            .await
        {
            Ok(events) => events,
            Err(e) => {
                error!(error = %e, "event fetch for InfluxDB failed");
                return;
            }
        };

        match self.report_metrics(snapshot, events, writer, interval).await {
            Ok(summary) => info!("UniFi metrics recorded. {summary}"),
            Err(e) => error!(error = %e, "reporting metrics to InfluxDB failed"),
        }
    }

    /// Run one report: spawn the drain and the producer fan-out, wait
    /// for the pipeline to settle, commit the batch, stamp elapsed.
    async fn report_metrics(
        &self,
        snapshot: Snapshot,
        events: EventLog,
        writer: &InfluxWriter,
        interval: Duration,
    ) -> Result<Summary, PollerError> {
        let config = self.config();
        let start = Instant::now();
        let oldest = Utc::now()
            - chrono::Duration::from_std(interval + Duration::from_secs(1))
                .unwrap_or(chrono::Duration::seconds(31));

        let opts = ReportOpts {
            dead_ports: config.dead_ports,
            app_totals: config.app_totals,
        };

        let (report, rx) = Report::new(snapshot, events, opts, oldest);
        let counts = Arc::clone(&report.counts);
        let snapshot = Arc::clone(&report.snapshot);

        let drain_task = tokio::spawn(drain(rx, Arc::clone(&counts), snapshot.ts));
        let producers = spawn_producers(&report);

        // Our handle on the report (and its sender) goes away here; the
        // channel closes once the last producer finishes.
        drop(report);

        for producer in producers {
            producer
                .await
                .map_err(|e| PollerError::Internal(format!("producer task panicked: {e}")))?;
        }

        let drained = drain_task
            .await
            .map_err(|e| PollerError::Internal(format!("drain task panicked: {e}")))?;

        for err in &drained.errors {
            error!(error = %err, "point serialization failed");
        }

        // Commit the batch exactly once; a commit failure surfaces.
        writer.write(&drained.batch).await?;

        webserver::update_output_counter(PLUGIN_NAME, "points", drained.batch.points as i64);

        Ok(Summary::new(counts, &snapshot, drained.errors.len(), start))
    }
}

/// One producer task per top-level snapshot collection.
fn spawn_producers(report: &Arc<Report>) -> Vec<JoinHandle<()>> {
    let mut tasks = Vec::new();
    let mut spawn = |task: JoinHandle<()>| tasks.push(task);

    let r = Arc::clone(report);
    spawn(tokio::spawn(async move {
        for s in &r.snapshot.sites {
            site::site(&r, s).await;
        }
    }));

    let r = Arc::clone(report);
    spawn(tokio::spawn(async move {
        for table in &r.snapshot.sites_dpi {
            dpi::site_dpi(&r, table).await;
        }
    }));

    let r = Arc::clone(report);
    spawn(tokio::spawn(async move {
        for c in &r.snapshot.clients {
            clients::client(&r, c).await;
        }
    }));

    let r = Arc::clone(report);
    spawn(tokio::spawn(async move {
        for ap in &r.snapshot.rogue_aps {
            devices::rogue_ap(&r, ap).await;
        }
    }));

    let r = Arc::clone(report);
    spawn(tokio::spawn(async move {
        for record in &r.events.logs {
            events::log_record(&r, record).await;
        }
    }));

    // The DPI totals need every client table, so the fold and the
    // totals emission share one task.
    let r = Arc::clone(report);
    spawn(tokio::spawn(async move {
        let mut app_totals = dpi::TotalsMap::new();
        let mut cat_totals = dpi::TotalsMap::new();

        for table in &r.snapshot.clients_dpi {
            dpi::client_dpi(&r, table, &mut app_totals, &mut cat_totals).await;
        }

        dpi::report_totals(&r, app_totals, cat_totals).await;
    }));

    if report.snapshot.devices.is_some() {
        let r = Arc::clone(report);
        spawn(tokio::spawn(async move {
            let Some(list) = r.snapshot.devices.as_ref() else {
                return;
            };

            for d in &list.uaps {
                devices::uap(&r, d).await;
            }
            for d in &list.usws {
                devices::usw(&r, d).await;
            }
            for d in &list.usgs {
                devices::usg(&r, d).await;
            }
            for d in &list.udms {
                devices::udm(&r, d).await;
            }
            for d in &list.uxgs {
                devices::uxg(&r, d).await;
            }
            for d in &list.udbs {
                devices::udb(&r, d).await;
            }
            for d in &list.ucis {
                devices::uci(&r, d).await;
            }
            for d in &list.ubbs {
                devices::ubb(&r, d).await;
            }
            for d in &list.pdus {
                devices::pdu(&r, d).await;
            }
        }));
    }

    tasks
}

#[async_trait]
impl Output for InfluxDb {
    fn configure(&self, loader: &ConfigLoader) -> Result<(), PollerError> {
        let config: Config = loader.section(PLUGIN_NAME)?;
        let config = config.normalize()?;

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
            debug!("InfluxDB config missing (or disabled), InfluxDB output disabled");
            return Ok(());
        }

        let config = self.config();
        let writer = config.writer()?;
        let interval = Duration::from_secs(config.interval);

        // Publish a scrubbed config view for the status UI.
        webserver::update_output(
            PLUGIN_NAME,
            OutputUpdate {
                config: Some(serde_json::json!({
                    "url": config.url,
                    "db": config.db,
                    "org": config.org,
                    "bucket": config.bucket,
                    "interval": config.interval,
                    "dead_ports": config.dead_ports,
                    "pass": !config.pass.is_empty(),
                    "auth_token": !config.auth_token.is_empty(),
                })),
            },
        );

        info!(
            url = config.url,
            interval = config.interval,
            dead_ports = config.dead_ports,
            "Poller -> InfluxDB started"
        );

        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        ticker.tick().await; // consume the immediate first tick

        loop {
            ticker.tick().await;
            self.poll(&collect, &writer, interval).await;
        }
    }

    async fn debug_output(&self) -> Result<(), PollerError> {
        if !self.enabled() {
            return Ok(());
        }

        self.config().writer()?.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unipoll_api::models::{ClientStation, DeviceList, RogueAp, Site, Uap, Usg, Usw};
    use unipoll_core::ItemKind;

    fn adopted<T: Default>(make: impl Fn(&mut T)) -> T {
        let mut d = T::default();
        make(&mut d);
        d
    }

    fn test_snapshot() -> Snapshot {
        let mut devices = DeviceList::default();

        for i in 0..3 {
            devices.uaps.push(adopted(|d: &mut Uap| {
                d.mac = format!("ap:{i}");
                d.adopted = true;
            }));
        }
        for i in 0..2 {
            devices.usws.push(adopted(|d: &mut Usw| {
                d.mac = format!("sw:{i}");
                d.adopted = true;
            }));
        }
        devices.usgs.push(adopted(|d: &mut Usg| {
            d.mac = "gw:0".into();
            d.adopted = true;
            d.stat.gw = Some(Default::default());
        }));

        // An unadopted AP and a locating switch must be skipped.
        devices.uaps.push(adopted(|d: &mut Uap| {
            d.mac = "ap:unadopted".into();
        }));
        devices.usws.push(adopted(|d: &mut Usw| {
            d.mac = "sw:locating".into();
            d.adopted = true;
            d.locating = true;
        }));

        Snapshot {
            ts: Utc::now(),
            sites: vec![Site::default()],
            clients: vec![ClientStation::default()],
            rogue_aps: vec![
                RogueAp {
                    age: 5.0.into(),
                    ..RogueAp::default()
                },
                // age == 0 is never emitted.
                RogueAp::default(),
            ],
            devices: Some(devices),
            ..Snapshot::default()
        }
    }

    /// Run a full report against a mock Influx server and check the
    /// pipeline accounting: every enqueued point lands in the batch,
    /// device counters match the adopted population, and the commit
    /// happens exactly once.
    #[tokio::test]
    async fn report_counts_devices_and_commits_once() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/write"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let plugin = InfluxDb::default();
        let config = Config {
            url: server.uri(),
            ..Config::default()
        }
        .normalize()
        .expect("normalize");
        let writer = config.writer().expect("writer");
        {
            *plugin.config.write().expect("lock poisoned") = config;
        }

        let summary = plugin
            .report_metrics(
                test_snapshot(),
                EventLog::default(),
                &writer,
                Duration::from_secs(30),
            )
            .await
            .expect("report");

        assert_eq!(summary.counts.get(ItemKind::Uap), 3);
        assert_eq!(summary.counts.get(ItemKind::Usw), 2);
        assert_eq!(summary.counts.get(ItemKind::Usg), 1);
        assert_eq!(summary.counts.get(ItemKind::RogueAp), 1);
        assert_eq!(summary.errors, 0);

        // Every point the producers enqueued was drained into the batch.
        let points = summary.counts.get(ItemKind::Point);
        assert!(points >= 7, "expected at least 7 points, got {points}");
        assert!(summary.counts.get(ItemKind::Fields) > points);
    }

    #[test]
    fn interval_clamping() {
        let low = Config {
            interval: 3,
            ..Config::default()
        }
        .normalize()
        .expect("normalize");
        assert_eq!(low.interval, 10);

        let zero = Config::default().normalize().expect("normalize");
        assert_eq!(zero.interval, 30);

        let high = Config {
            interval: 600,
            ..Config::default()
        }
        .normalize()
        .expect("normalize");
        assert_eq!(high.interval, 600);
    }
}
