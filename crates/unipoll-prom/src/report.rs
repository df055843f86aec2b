// ── Scrape-time report ──
//
// The Prometheus bridge inverts the poll loop: every scrape builds a
// transient report, runs the producer fan-out over a fresh snapshot,
// and drains samples into a per-scrape registry that is encoded and
// thrown away. Nothing is cached between scrapes.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tokio::sync::mpsc;

use unipoll_core::{Counts, PollerError, Snapshot};

/// Channel depth: fits at least one burst of family samples.
pub(crate) const BUFFER: usize = 50;

/// One exported sample on its way to the registry.
#[derive(Debug, Clone)]
pub(crate) struct Sample {
    /// Full metric name, namespace included.
    pub name: String,
    pub help: &'static str,
    pub labels: Vec<(&'static str, String)>,
    pub value: f64,
}

/// Shared state for producer tasks during one scrape.
pub(crate) struct Report {
    pub snapshot: Arc<Snapshot>,
    pub counts: Arc<Counts>,
    pub namespace: String,
    tx: mpsc::Sender<Sample>,
}

impl Report {
    pub fn new(snapshot: Snapshot, namespace: String) -> (Arc<Self>, mpsc::Receiver<Sample>) {
        let (tx, rx) = mpsc::channel(BUFFER);

        (
            Arc::new(Self {
                snapshot: Arc::new(snapshot),
                counts: Arc::new(Counts::new()),
                namespace,
                tx,
            }),
            rx,
        )
    }

    /// Enqueue one sample for the drain.
    pub async fn send(&self, sample: Sample) {
        let _ = self.tx.send(sample).await;
    }

    /// Build the full metric name for a family/field pair.
    pub fn name(&self, family: &str, field: &str) -> String {
        format!("{}_{family}_{field}", self.namespace)
    }
}

/// Accounting the drain hands back after the channel closes.
#[derive(Debug, Default)]
pub(crate) struct DrainResult {
    pub body: String,
    pub total: usize,
    pub zeros: usize,
    pub errors: usize,
}

/// The single consumer: folds samples into per-name gauge vectors in a
/// fresh registry, then encodes the exposition body. A sample whose
/// label keys disagree with its metric's established set cannot be
/// exported; it is counted as an error (and surfaced as an
/// `export_errors_total` metric when `report_errors` is set).
pub(crate) async fn drain(
    mut rx: mpsc::Receiver<Sample>,
    namespace: String,
    report_errors: bool,
) -> Result<DrainResult, PollerError> {
    struct FamilyState {
        gauge: GaugeVec,
        label_keys: Vec<&'static str>,
    }

    let registry = Registry::new();
    let mut families: BTreeMap<String, FamilyState> = BTreeMap::new();
    let mut result = DrainResult::default();

    while let Some(sample) = rx.recv().await {
        let label_keys: Vec<&'static str> = sample.labels.iter().map(|(k, _)| *k).collect();

        let family = match families.entry(sample.name.clone()) {
            std::collections::btree_map::Entry::Occupied(e) => e.into_mut(),
            std::collections::btree_map::Entry::Vacant(e) => {
                let gauge = GaugeVec::new(
                    Opts::new(sample.name.clone(), sample.help),
                    &label_keys,
                )
                .map_err(|e| PollerError::Sink(format!("prometheus desc: {e}")))?;

                registry
                    .register(Box::new(gauge.clone()))
                    .map_err(|e| PollerError::Sink(format!("prometheus register: {e}")))?;

                e.insert(FamilyState {
                    gauge,
                    label_keys: label_keys.clone(),
                })
            }
        };

        if family.label_keys != label_keys {
            result.errors += 1;
            continue;
        }

        let values: Vec<&str> = sample.labels.iter().map(|(_, v)| v.as_str()).collect();
        match family.gauge.get_metric_with_label_values(&values) {
            Ok(metric) => {
                metric.set(sample.value);
                result.total += 1;
                if sample.value == 0.0 {
                    result.zeros += 1;
                }
            }
            Err(_) => result.errors += 1,
        }
    }

    if report_errors {
        let errors = prometheus::Gauge::new(
            format!("{namespace}_export_errors_total"),
            "Samples that could not be exported during this scrape",
        )
        .map_err(|e| PollerError::Sink(format!("prometheus desc: {e}")))?;
        errors.set(result.errors as f64);
        registry
            .register(Box::new(errors))
            .map_err(|e| PollerError::Sink(format!("prometheus register: {e}")))?;
    }

    let mut buf = Vec::new();
    TextEncoder::new()
        .encode(&registry.gather(), &mut buf)
        .map_err(|e| PollerError::Sink(format!("prometheus encode: {e}")))?;

    result.body = String::from_utf8(buf)
        .map_err(|e| PollerError::Sink(format!("prometheus encode: {e}")))?;

    Ok(result)
}

/// Per-scrape timing split for the summary log line.
#[derive(Debug, Default)]
pub(crate) struct Timing {
    pub fetch: Duration,
    pub elapsed: Duration,
}
