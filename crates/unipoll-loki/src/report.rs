// Event-log report for Loki.
//
// Each record becomes one labeled stream whose line is the record's raw
// JSON, ready for Loki's `| json` pipeline. Records older than the
// report's cutoff are dropped, and per-variant counters feed the
// summary line.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use unipoll_core::{EventLog, LogRecord};

use crate::client::{LogStream, Logs};

/// Accumulates one poll's worth of log streams and counters.
pub(crate) struct Report {
    pub oldest: DateTime<Utc>,
    pub start: DateTime<Utc>,
    counts: BTreeMap<&'static str, usize>,
    skipped: usize,
}

impl Report {
    pub fn new(start: DateTime<Utc>, oldest: DateTime<Utc>) -> Self {
        Self {
            oldest,
            start,
            counts: BTreeMap::new(),
            skipped: 0,
        }
    }

    /// Convert the event log into Loki streams, dropping stale records.
    pub fn process(&mut self, events: &EventLog) -> Logs {
        let mut logs = Logs::default();

        for record in &events.logs {
            if record.datetime() < self.oldest {
                self.skipped += 1;
                continue;
            }

            match record {
                LogRecord::Event(e) => self.push(
                    &mut logs,
                    "Event",
                    record.datetime(),
                    e,
                    labels([
                        ("application", "unifi_event"),
                        ("site_name", &e.site_name),
                        ("source", &e.source_name),
                    ]),
                ),
                LogRecord::Ids(e) => self.push(
                    &mut logs,
                    "IDS",
                    record.datetime(),
                    e,
                    labels([
                        ("application", "unifi_ids"),
                        ("site_name", &e.site_name),
                        ("source", &e.source_name),
                    ]),
                ),
                LogRecord::Alarm(e) => self.push(
                    &mut logs,
                    "Alarm",
                    record.datetime(),
                    e,
                    labels([
                        ("application", "unifi_alarm"),
                        ("site_name", &e.site_name),
                        ("source", &e.source_name),
                    ]),
                ),
                LogRecord::Anomaly(e) => self.push(
                    &mut logs,
                    "Anomaly",
                    record.datetime(),
                    e,
                    labels([
                        ("application", "unifi_anomaly"),
                        ("site_name", &e.site_name),
                        ("source", &e.source_name),
                    ]),
                ),
                LogRecord::Protect(e) => self.push(
                    &mut logs,
                    "ProtectLog",
                    record.datetime(),
                    e,
                    labels([
                        ("application", "unifi_protect_log"),
                        ("camera", &e.camera),
                        ("severity", &e.severity),
                        ("source", &e.source_name),
                    ]),
                ),
            }
        }

        logs
    }

    fn push<T: Serialize>(
        &mut self,
        logs: &mut Logs,
        kind: &'static str,
        ts: DateTime<Utc>,
        record: &T,
        labels: BTreeMap<String, String>,
    ) {
        // The raw JSON is the log line; a marshal failure should be
        // impossible for our own models but costs only that record.
        let Ok(line) = serde_json::to_string(record) else {
            return;
        };

        *self.counts.entry(kind).or_insert(0) += 1;

        logs.streams.push(LogStream {
            labels,
            entries: vec![[
                ts.timestamp_nanos_opt().unwrap_or_default().to_string(),
                line,
            ]],
        });
    }
}

/// Build a label map, dropping empty values to keep streams valid.
fn labels<const N: usize>(pairs: [(&str, &str); N]) -> BTreeMap<String, String> {
    pairs
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect()
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total: usize = self.counts.values().sum();
        write!(f, "Logs: {total} (")?;

        let mut first = true;
        for (kind, count) in &self.counts {
            if !first {
                write!(f, ", ")?;
            }
            first = false;
            write!(f, "{kind}: {count}")?;
        }

        write!(f, "), Skipped: {}", self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use unipoll_api::models::EventRecord;

    fn event_at(ts: DateTime<Utc>) -> LogRecord {
        LogRecord::Event(EventRecord {
            msg: "client connected".into(),
            datetime: Some(ts),
            site_name: "home".into(),
            ..EventRecord::default()
        })
    }

    #[test]
    fn stale_records_are_skipped() {
        let now = Utc::now();
        let mut report = Report::new(now, now - Duration::seconds(31));

        let events = EventLog {
            logs: vec![
                event_at(now - Duration::seconds(5)),
                event_at(now - Duration::seconds(120)), // stale
            ],
        };

        let logs = report.process(&events);
        assert_eq!(logs.streams.len(), 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.counts["Event"], 1);
    }

    #[test]
    fn streams_carry_labels_and_json_lines() {
        let now = Utc::now();
        let mut report = Report::new(now, now - Duration::seconds(31));

        let logs = report.process(&EventLog {
            logs: vec![event_at(now)],
        });

        let stream = &logs.streams[0];
        assert_eq!(stream.labels["application"], "unifi_event");
        assert_eq!(stream.labels["site_name"], "home");
        assert!(stream.entries[0][1].contains("client connected"));
    }
}
