// ── Snapshot, event log, and filter types ──
//
// A Snapshot is produced once per poll per controller, appended across
// controllers into one composite, handed read-only to each report, and
// discarded when the report completes. Nothing here persists.

use std::time::Duration;

use chrono::{DateTime, Utc};

use unipoll_api::models::{
    Alarm, Anomaly, ClientStation, DeviceList, DpiTable, EventRecord, IdsRecord, ProtectLogEntry,
    RogueAp, Site,
};

/// One in-memory, read-only view of everything collected in a poll cycle.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub ts: DateTime<Utc>,
    pub sites: Vec<Site>,
    pub clients: Vec<ClientStation>,
    pub sites_dpi: Vec<DpiTable>,
    pub clients_dpi: Vec<DpiTable>,
    pub rogue_aps: Vec<RogueAp>,
    /// `None` when no controller returned a device payload; every typed
    /// family sequence is empty in that case.
    pub devices: Option<DeviceList>,
}

impl Snapshot {
    /// Element-wise concatenation of `other` into `self`.
    ///
    /// The destination device container is allocated only when a source
    /// actually carries one, preserving the `devices == None` invariant
    /// for device-free polls.
    pub fn append(&mut self, mut other: Snapshot) {
        if self.ts < other.ts {
            self.ts = other.ts;
        }

        self.sites.append(&mut other.sites);
        self.clients.append(&mut other.clients);
        self.sites_dpi.append(&mut other.sites_dpi);
        self.clients_dpi.append(&mut other.clients_dpi);
        self.rogue_aps.append(&mut other.rogue_aps);

        if let Some(mut incoming) = other.devices.take() {
            self.devices
                .get_or_insert_with(DeviceList::default)
                .append(&mut incoming);
        }
    }
}

/// One record in the heterogeneous event log.
///
/// A closed sum type; sinks dispatch by exhaustive `match`.
#[derive(Debug, Clone)]
pub enum LogRecord {
    Event(EventRecord),
    Ids(IdsRecord),
    Alarm(Alarm),
    Anomaly(Anomaly),
    Protect(ProtectLogEntry),
}

impl LogRecord {
    /// The record's own timestamp; emitters drop records older than the
    /// poll interval plus one second.
    pub fn datetime(&self) -> DateTime<Utc> {
        match self {
            Self::Event(e) => e.datetime(),
            Self::Ids(e) => e.datetime(),
            Self::Alarm(e) => e.datetime(),
            Self::Anomaly(e) => e.datetime(),
            Self::Protect(e) => e.datetime(),
        }
    }
}

/// Log records collected alongside a [`Snapshot`]; same lifecycle.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    pub logs: Vec<LogRecord>,
}

impl EventLog {
    pub fn append(&mut self, mut other: EventLog) {
        self.logs.append(&mut other.logs);
    }
}

/// Selection passed to inputs. Zero values mean "no restriction".
#[derive(Debug, Clone, Default)]
pub struct Filter {
    /// Input plugin name ("unifi"); empty matches every input.
    pub name: String,
    /// Payload kind for raw dumps: devices, clients, other.
    pub kind: String,
    /// Free-form term: the `other` dump path.
    pub path: String,
    /// Controller selector for targeted scrapes (URL) or dumps.
    pub term: String,
    /// Controller index for `--dumpjson kind:n`.
    pub unit: usize,
    /// Recency window for event fetches.
    pub dur: Duration,
}

impl Filter {
    /// A filter that selects one input plugin by name.
    pub fn input(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use unipoll_api::models::Uap;

    fn snap_with_uap(name: &str) -> Snapshot {
        let mut devices = DeviceList::default();
        devices.uaps.push(Uap {
            name: name.into(),
            ..Uap::default()
        });

        Snapshot {
            sites: vec![Site::default()],
            devices: Some(devices),
            ..Snapshot::default()
        }
    }

    #[test]
    fn append_concatenates_everything() {
        let mut composite = snap_with_uap("a");
        composite.append(snap_with_uap("b"));

        assert_eq!(composite.sites.len(), 2);
        let devices = composite.devices.expect("devices");
        assert_eq!(devices.uaps.len(), 2);
        assert_eq!(devices.uaps[1].name, "b");
    }

    #[test]
    fn append_leaves_devices_unallocated_for_device_free_sources() {
        let mut composite = Snapshot::default();
        composite.append(Snapshot {
            sites: vec![Site::default()],
            ..Snapshot::default()
        });

        // No source carried a device container, so none was allocated.
        assert!(composite.devices.is_none());
        assert_eq!(composite.sites.len(), 1);
    }

    #[test]
    fn append_allocates_devices_on_first_some_source() {
        let mut composite = Snapshot::default();
        composite.append(snap_with_uap("only"));
        assert_eq!(composite.devices.expect("devices").uaps.len(), 1);
    }
}
