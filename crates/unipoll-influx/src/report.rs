// ── The report pipeline ──
//
// One report ties a snapshot to the sink through a bounded point
// channel. Producer tasks walk their slice of the snapshot and send
// points; the single drain task owns the receiver, encodes each point
// into the line batch, and keeps the only mutable error list. The
// channel closes when the last producer drops its sender clone; the
// caller then awaits the drain, commits the batch, and stamps elapsed.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use unipoll_core::{Counts, EventLog, ItemKind, Point, Snapshot};

/// Channel depth: enough to smooth producer bursts without letting the
/// batch lag far behind the walk.
const CHANNEL_BUFFER: usize = 16;

/// Per-report options copied out of the plugin config.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ReportOpts {
    /// Record ports that are down and disabled.
    pub dead_ports: bool,
    /// Emit per-application DPI totals (high cardinality; off by default).
    pub app_totals: bool,
}

/// Shared state each producer holds while walking the snapshot.
pub(crate) struct Report {
    pub snapshot: Arc<Snapshot>,
    pub events: Arc<EventLog>,
    pub counts: Arc<Counts>,
    pub opts: ReportOpts,
    /// Records older than this are ignored by event producers.
    pub oldest: DateTime<Utc>,
    tx: mpsc::Sender<Point>,
}

impl Report {
    pub fn new(
        snapshot: Snapshot,
        events: EventLog,
        opts: ReportOpts,
        oldest: DateTime<Utc>,
    ) -> (Arc<Self>, mpsc::Receiver<Point>) {
        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER);

        let report = Arc::new(Self {
            snapshot: Arc::new(snapshot),
            events: Arc::new(events),
            counts: Arc::new(Counts::new()),
            opts,
            oldest,
            tx,
        });

        (report, rx)
    }

    /// Enqueue one point for the drain. Tags are cleaned here so empty
    /// values never reach a sink.
    pub async fn send(&self, mut point: Point) {
        point.clean_tags();
        // The receiver outlives every producer; a send failure means the
        // drain panicked, and the join below will surface that.
        let _ = self.tx.send(point).await;
    }

    pub fn count(&self, kind: ItemKind) {
        self.counts.bump(kind);
    }
}

/// What the drain hands back when the channel closes.
pub(crate) struct DrainResult {
    pub batch: crate::line::LineBatch,
    pub errors: Vec<String>,
}

/// The single consumer: encodes points into the line batch and counts
/// them. Serialization failures land in the error list; this is the
/// only task that writes it, so no lock is needed.
pub(crate) async fn drain(
    mut rx: mpsc::Receiver<Point>,
    counts: Arc<Counts>,
    default_ts: DateTime<Utc>,
) -> DrainResult {
    let mut batch = crate::line::LineBatch::default();
    let mut errors = Vec::new();

    while let Some(point) = rx.recv().await {
        let field_count = point.fields.len() as u64;

        match batch.add(&point, default_ts) {
            Ok(()) => {
                counts.bump(ItemKind::Point);
                counts.add(ItemKind::Fields, field_count);
            }
            Err(e) => errors.push(e.to_string()),
        }
    }

    DrainResult { batch, errors }
}

/// End-of-cycle summary printed after each committed report.
pub(crate) struct Summary {
    pub counts: Arc<Counts>,
    pub sites: usize,
    pub clients: usize,
    pub sites_dpi: usize,
    pub clients_dpi: usize,
    pub errors: usize,
    pub elapsed: std::time::Duration,
}

impl Summary {
    pub(crate) fn new(
        counts: Arc<Counts>,
        snapshot: &Snapshot,
        errors: usize,
        start: Instant,
    ) -> Self {
        Self {
            counts,
            sites: snapshot.sites.len(),
            clients: snapshot.clients.len(),
            sites_dpi: snapshot.sites_dpi.len(),
            clients_dpi: snapshot.clients_dpi.len(),
            errors,
            elapsed: start.elapsed(),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = |k| self.counts.get(k);
        let gateways =
            c(ItemKind::Udm) + c(ItemKind::Usg) + c(ItemKind::Uxg) + c(ItemKind::Uci);

        write!(
            f,
            "Site: {}, Client: {}, Gateways: {}, UAP: {}, USW: {}, PDU: {}, UBB: {}, \
             IDs/Event/Alarm/Anomaly: {}/{}/{}/{}, DPI Site/Client: {}/{}, \
             Point: {}, Fields: {}, Err: {}, Dur: {}ms",
            self.sites,
            self.clients,
            gateways,
            c(ItemKind::Uap),
            c(ItemKind::Usw),
            c(ItemKind::Pdu),
            c(ItemKind::Ubb),
            c(ItemKind::Ids),
            c(ItemKind::Event),
            c(ItemKind::Alarm),
            c(ItemKind::Anomaly),
            self.sites_dpi,
            self.clients_dpi,
            c(ItemKind::Point),
            c(ItemKind::Fields),
            self.errors,
            self.elapsed.as_millis(),
        )
    }
}
