// Shared, process-wide plugin display state.
//
// Input plugins refresh their site/device/client summaries every poll;
// output plugins push their (scrubbed) config at startup and bump
// counters as they work. Each plugin record carries its own lock:
// handler reads take it shared, plugin updates take it exclusive.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, LazyLock, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A log message for the rolling per-plugin event ring.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub msg: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// A bounded, timestamp-ordered ring of events for one group
/// (controller UUID + category suffix).
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventGroup {
    pub latest: Option<DateTime<Utc>>,
    pub events: Vec<Event>,
}

impl EventGroup {
    /// Insert one event. Events not strictly newer than `latest` are
    /// dropped; `latest` is not advanced on drop, so bursts with equal
    /// timestamps collapse to the first. The ring is head-trimmed to
    /// `max` afterwards.
    pub fn add(&mut self, event: Event, max: usize) {
        if let Some(latest) = self.latest {
            if event.ts <= latest {
                return;
            }
        }

        self.latest = Some(event.ts);
        self.events.push(event);

        if self.events.len() > max {
            let excess = self.events.len() - max;
            self.events.drain(..excess);
        }
    }
}

// ── Display summaries ────────────────────────────────────────────────

/// Minimal site row for the status UI.
#[derive(Debug, Clone, Serialize)]
pub struct WebSite {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub source: String,
    pub controller: String,
}

/// Minimal device row for the status UI.
#[derive(Debug, Clone, Serialize)]
pub struct WebDevice {
    pub name: String,
    pub site_id: String,
    pub source: String,
    pub controller: String,
    pub mac: String,
    pub ip: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub model: String,
    pub version: String,
    pub clients: i64,
    pub uptime: i64,
}

/// Minimal client row for the status UI.
#[derive(Debug, Clone, Serialize)]
pub struct WebClient {
    pub name: String,
    pub site_id: String,
    pub source: String,
    pub controller: String,
    pub mac: String,
    pub ip: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub device_mac: String,
    pub rx_bytes: i64,
    pub tx_bytes: i64,
    pub since: Option<DateTime<Utc>>,
    pub last: Option<DateTime<Utc>>,
}

/// Live record for one input plugin.
#[derive(Debug, Default, Serialize)]
pub struct InputRecord {
    pub name: String,
    pub config: serde_json::Value,
    pub sites: Vec<WebSite>,
    pub devices: Vec<WebDevice>,
    pub clients: Vec<WebClient>,
    pub events: BTreeMap<String, EventGroup>,
    pub counters: BTreeMap<String, i64>,
}

/// Live record for one output plugin.
#[derive(Debug, Default, Serialize)]
pub struct OutputRecord {
    pub name: String,
    pub config: serde_json::Value,
    pub events: BTreeMap<String, EventGroup>,
    pub counters: BTreeMap<String, i64>,
}

/// Partial update from an input plugin; `None` fields are left as-is.
#[derive(Debug, Default)]
pub struct InputUpdate {
    pub config: Option<serde_json::Value>,
    pub sites: Option<Vec<WebSite>>,
    pub devices: Option<Vec<WebDevice>>,
    pub clients: Option<Vec<WebClient>>,
}

/// Partial update from an output plugin.
#[derive(Debug, Default)]
pub struct OutputUpdate {
    pub config: Option<serde_json::Value>,
}

// ── The shared state singleton ───────────────────────────────────────

pub(crate) struct WebState {
    enabled: AtomicBool,
    max_events: AtomicUsize,
    inputs: RwLock<Vec<Arc<RwLock<InputRecord>>>>,
    outputs: RwLock<Vec<Arc<RwLock<OutputRecord>>>>,
}

pub(crate) static STATE: LazyLock<WebState> = LazyLock::new(|| WebState {
    enabled: AtomicBool::new(false),
    max_events: AtomicUsize::new(super::DEFAULT_MAX_EVENTS),
    inputs: RwLock::new(Vec::new()),
    outputs: RwLock::new(Vec::new()),
});

impl WebState {
    pub(crate) fn enable(&self, max_events: usize) {
        self.max_events.store(max_events.max(1), Ordering::Relaxed);
        self.enabled.store(true, Ordering::Relaxed);
    }

    fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    fn max_events(&self) -> usize {
        self.max_events.load(Ordering::Relaxed)
    }

    pub(crate) fn input(&self, name: &str) -> Option<Arc<RwLock<InputRecord>>> {
        self.inputs
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|r| r.read().is_ok_and(|r| r.name == name))
            .cloned()
    }

    pub(crate) fn output(&self, name: &str) -> Option<Arc<RwLock<OutputRecord>>> {
        self.outputs
            .read()
            .expect("lock poisoned")
            .iter()
            .find(|r| r.read().is_ok_and(|r| r.name == name))
            .cloned()
    }

    fn input_or_new(&self, name: &str) -> Arc<RwLock<InputRecord>> {
        if let Some(record) = self.input(name) {
            return record;
        }

        let record = Arc::new(RwLock::new(InputRecord {
            name: name.to_owned(),
            ..InputRecord::default()
        }));

        self.inputs.write().expect("lock poisoned").push(Arc::clone(&record));
        record
    }

    fn output_or_new(&self, name: &str) -> Arc<RwLock<OutputRecord>> {
        if let Some(record) = self.output(name) {
            return record;
        }

        let record = Arc::new(RwLock::new(OutputRecord {
            name: name.to_owned(),
            ..OutputRecord::default()
        }));

        self.outputs.write().expect("lock poisoned").push(Arc::clone(&record));
        record
    }
}

// ── Plugin-facing hooks ──────────────────────────────────────────────

/// Create or partially update an input plugin's display record.
pub fn update_input(name: &str, update: InputUpdate) {
    if !STATE.enabled() {
        return;
    }

    let record = STATE.input_or_new(name);
    let mut record = record.write().expect("lock poisoned");

    if let Some(config) = update.config {
        record.config = config;
    }
    if let Some(sites) = update.sites {
        record.sites = sites;
    }
    if let Some(devices) = update.devices {
        record.devices = devices;
    }
    if let Some(clients) = update.clients {
        record.clients = clients;
    }
}

/// Create or update an output plugin's display record.
pub fn update_output(name: &str, update: OutputUpdate) {
    if !STATE.enabled() {
        return;
    }

    let record = STATE.output_or_new(name);
    let mut record = record.write().expect("lock poisoned");

    if let Some(config) = update.config {
        record.config = config;
    }
}

/// Append an event to an input plugin's ring for `group`.
pub fn new_input_event(name: &str, group: &str, event: Event) {
    if !STATE.enabled() {
        return;
    }

    let max = STATE.max_events();
    let record = STATE.input_or_new(name);
    let mut record = record.write().expect("lock poisoned");
    record
        .events
        .entry(group.to_owned())
        .or_default()
        .add(event, max);
}

/// Append an event to an output plugin's ring for `group`.
pub fn new_output_event(name: &str, group: &str, event: Event) {
    if !STATE.enabled() {
        return;
    }

    let max = STATE.max_events();
    let record = STATE.output_or_new(name);
    let mut record = record.write().expect("lock poisoned");
    record
        .events
        .entry(group.to_owned())
        .or_default()
        .add(event, max);
}

/// Add `value` to an input plugin's display counter.
pub fn update_input_counter(name: &str, label: &str, value: i64) {
    if !STATE.enabled() {
        return;
    }

    let record = STATE.input_or_new(name);
    let mut record = record.write().expect("lock poisoned");
    *record.counters.entry(label.to_owned()).or_insert(0) += value;
}

/// Add `value` to an output plugin's display counter.
pub fn update_output_counter(name: &str, label: &str, value: i64) {
    if !STATE.enabled() {
        return;
    }

    let record = STATE.output_or_new(name);
    let mut record = record.write().expect("lock poisoned");
    *record.counters.entry(label.to_owned()).or_insert(0) += value;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event_at(secs: i64) -> Event {
        Event {
            ts: Utc.timestamp_opt(secs, 0).single().expect("ts"),
            msg: format!("t={secs}"),
            tags: BTreeMap::new(),
        }
    }

    #[test]
    fn ring_keeps_newest_and_trims_head() {
        let mut group = EventGroup::default();

        for t in [1, 2, 3, 4] {
            group.add(event_at(t), 3);
        }

        let msgs: Vec<_> = group.events.iter().map(|e| e.msg.as_str()).collect();
        assert_eq!(msgs, ["t=2", "t=3", "t=4"]);
        assert_eq!(group.latest, Some(event_at(4).ts));
    }

    #[test]
    fn ring_drops_stale_and_duplicate_timestamps() {
        let mut group = EventGroup::default();
        group.add(event_at(2), 10);

        // Equal timestamp: dropped, latest unchanged.
        group.add(event_at(2), 10);
        // Older timestamp: dropped.
        group.add(event_at(1), 10);

        assert_eq!(group.events.len(), 1);
        assert_eq!(group.latest, Some(event_at(2).ts));
    }
}
