// ── Event collection ──
//
// Events are gathered per save flag and per site, appended into one
// heterogeneous log, and mirrored into the status web surface's rolling
// rings with type tags.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use unipoll_api::models::{Alarm, EventRecord, IpGeo, Site};
use unipoll_api::UnifiClient;
use unipoll_core::webserver::{self, Event as WebEvent};
use unipoll_core::{EventLog, LogRecord, PollerError};

use crate::pii::{redact_mac, redact_name};
use crate::{Controller, InputUnifi, PLUGIN_NAME};

const EVENT_LOOKBACK_HOURS: i64 = 1;

fn web_event(
    ts: DateTime<Utc>,
    msg: &str,
    tags: &[(&str, &str)],
) -> WebEvent {
    WebEvent {
        ts,
        msg: msg.to_owned(),
        tags: tags
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect(),
    }
}

impl InputUnifi {
    /// Collect every enabled event category for one controller.
    pub(crate) async fn collect_controller_events(
        &self,
        c: &Controller,
    ) -> Result<EventLog, PollerError> {
        debug!(controller = c.config.id, "collecting controller events");

        let client = self.session(c).await?;
        let sites = self.event_sites(c, &client).await?;

        let mut log = EventLog::default();

        self.collect_ids(c, &client, &sites, &mut log).await?;
        self.collect_anomalies(c, &client, &sites, &mut log).await?;
        self.collect_alarms(c, &client, &sites, &mut log).await?;
        self.collect_events(c, &client, &sites, &mut log).await?;
        self.collect_protect(c, &client, &mut log).await?;

        Ok(log)
    }

    async fn event_sites(
        &self,
        c: &Controller,
        client: &UnifiClient,
    ) -> Result<Vec<Site>, PollerError> {
        // Any enabled category needs the site list; skip the round-trip
        // when everything is off.
        let cfg = &c.config;
        if !(cfg.save_ids || cfg.save_events || cfg.save_alarms || cfg.save_anomalies) {
            return Ok(Vec::new());
        }

        let sites = client.get_sites().await?;
        let filter = c.site_filter.read().await;

        if filter.is_empty() || filter.iter().any(|s| s.eq_ignore_ascii_case("all")) {
            return Ok(sites);
        }

        Ok(sites
            .into_iter()
            .filter(|s| filter.iter().any(|f| f == &s.name))
            .collect())
    }

    async fn collect_ids(
        &self,
        c: &Controller,
        client: &UnifiClient,
        sites: &[Site],
        log: &mut EventLog,
    ) -> Result<(), PollerError> {
        if !c.config.save_ids {
            return Ok(());
        }

        for site in sites {
            let records = client.get_ids_site(site).await?;

            for r in records {
                webserver::new_input_event(
                    PLUGIN_NAME,
                    &format!("{}_ids", site.id),
                    web_event(
                        r.datetime(),
                        &r.msg,
                        &[
                            ("type", "ids"),
                            ("key", &r.key),
                            ("site_id", &r.site_id),
                            ("site_name", &r.site_name),
                            ("source", &r.source_name),
                        ],
                    ),
                );

                log.logs.push(LogRecord::Ids(r));
            }
        }

        Ok(())
    }

    async fn collect_anomalies(
        &self,
        c: &Controller,
        client: &UnifiClient,
        sites: &[Site],
        log: &mut EventLog,
    ) -> Result<(), PollerError> {
        if !c.config.save_anomalies {
            return Ok(());
        }

        for site in sites {
            let records = client.get_anomalies_site(site).await?;

            for r in records {
                webserver::new_input_event(
                    PLUGIN_NAME,
                    &format!("{}_anomalies", site.id),
                    web_event(
                        r.datetime(),
                        &r.anomaly,
                        &[
                            ("type", "anomaly"),
                            ("site_name", &r.site_name),
                            ("source", &r.source_name),
                        ],
                    ),
                );

                log.logs.push(LogRecord::Anomaly(r));
            }
        }

        Ok(())
    }

    async fn collect_alarms(
        &self,
        c: &Controller,
        client: &UnifiClient,
        sites: &[Site],
        log: &mut EventLog,
    ) -> Result<(), PollerError> {
        if !c.config.save_alarms {
            return Ok(());
        }

        // MAC-to-name lookup so alarms can name the device they fired
        // on. A device fetch failure only costs the names.
        let mac_names = match client.get_devices(sites).await {
            Ok(devices) => {
                let mut names = HashMap::new();
                let mut insert = |mac: &str, name: &str| {
                    if !mac.is_empty() && !name.is_empty() {
                        names.insert(mac.to_lowercase(), name.to_owned());
                    }
                };

                for d in &devices.uaps {
                    insert(&d.mac, &d.name);
                }
                for d in &devices.usws {
                    insert(&d.mac, &d.name);
                }
                for d in &devices.usgs {
                    insert(&d.mac, &d.name);
                }
                for d in &devices.udms {
                    insert(&d.mac, &d.name);
                }
                for d in &devices.uxgs {
                    insert(&d.mac, &d.name);
                }
                for d in &devices.pdus {
                    insert(&d.mac, &d.name);
                }
                for d in &devices.ubbs {
                    insert(&d.mac, &d.name);
                }
                for d in &devices.ucis {
                    insert(&d.mac, &d.name);
                }

                names
            }
            Err(e) => {
                debug!(error = %e, "device fetch for alarm enrichment failed; continuing without names");
                HashMap::new()
            }
        };

        for site in sites {
            let records = client.get_alarms_site(site).await?;

            for mut r in records {
                r.device_name = device_name_for_alarm(&r, &mac_names);

                webserver::new_input_event(
                    PLUGIN_NAME,
                    &format!("{}_alarms", site.id),
                    web_event(
                        r.datetime(),
                        &r.msg,
                        &[
                            ("type", "alarm"),
                            ("key", &r.key),
                            ("site_id", &r.site_id),
                            ("site_name", &r.site_name),
                            ("source", &r.source_name),
                        ],
                    ),
                );

                log.logs.push(LogRecord::Alarm(r));
            }
        }

        Ok(())
    }

    async fn collect_events(
        &self,
        c: &Controller,
        client: &UnifiClient,
        sites: &[Site],
        log: &mut EventLog,
    ) -> Result<(), PollerError> {
        if !c.config.save_events {
            return Ok(());
        }

        for site in sites {
            let records = client.get_site_events(site, EVENT_LOOKBACK_HOURS).await?;

            for r in records {
                let r = redact_event(r, c.config.hash_pii, c.config.drop_pii);

                webserver::new_input_event(
                    PLUGIN_NAME,
                    &format!("{}_events", site.id),
                    web_event(
                        r.datetime(),
                        &r.msg,
                        &[
                            ("type", "event"),
                            ("key", &r.key),
                            ("site_id", &r.site_id),
                            ("site_name", &r.site_name),
                            ("source", &r.source_name),
                        ],
                    ),
                );

                log.logs.push(LogRecord::Event(r));
            }
        }

        Ok(())
    }

    async fn collect_protect(
        &self,
        c: &Controller,
        client: &UnifiClient,
        log: &mut EventLog,
    ) -> Result<(), PollerError> {
        if !c.config.save_protect {
            return Ok(());
        }

        // Consoles without Protect answer with an error body; that is
        // "no logs", not a failed poll.
        let entries = match client.get_protect_logs().await {
            Ok(entries) => entries,
            Err(e) => {
                debug!(error = %e, "protect log fetch failed (continuing)");
                return Ok(());
            }
        };

        for e in entries {
            webserver::new_input_event(
                PLUGIN_NAME,
                "protect_logs",
                web_event(
                    e.datetime(),
                    &e.message,
                    &[
                        ("type", "protect_log"),
                        ("event_type", &e.kind),
                        ("severity", &e.severity),
                        ("camera", &e.camera),
                        ("source", &e.source_name),
                    ],
                ),
            );

            log.logs.push(LogRecord::Protect(e));
        }

        Ok(())
    }
}

/// Mask PII on an event record. The free-text `msg` is left alone --
/// the controller embeds names there in formats we cannot safely strip.
fn redact_event(mut e: EventRecord, hash: bool, drop: bool) -> EventRecord {
    if !hash && !drop {
        return e;
    }

    e.dest_ip_geo = IpGeo::default();
    e.source_ip_geo = IpGeo::default();

    e.host = redact_name(&e.host, hash, drop);
    e.hostname = redact_name(&e.hostname, hash, drop);
    e.src_mac = redact_mac(&e.src_mac, hash, drop);
    e.dst_mac = redact_mac(&e.dst_mac, hash, drop);

    e
}

/// Find a device name for an alarm: a bracketed MAC in the message
/// (`AP[aa:bb:cc:dd:ee:ff] was disconnected`) or the src/dst MAC fields.
fn device_name_for_alarm(alarm: &Alarm, mac_names: &HashMap<String, String>) -> String {
    if let (Some(start), Some(end)) = (alarm.msg.find('['), alarm.msg.find(']')) {
        if end > start {
            let candidate = &alarm.msg[start + 1..end];
            if candidate.len() == 17 && candidate.matches(':').count() == 5 {
                if let Some(name) = mac_names.get(&candidate.to_lowercase()) {
                    return name.clone();
                }
            }
        }
    }

    for mac in [&alarm.src_mac, &alarm.dst_mac] {
        if !mac.is_empty() {
            if let Some(name) = mac_names.get(&mac.to_lowercase()) {
                return name.clone();
            }
        }
    }

    String::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alarm_device_name_from_bracketed_mac() {
        let mut names = HashMap::new();
        names.insert("fc:ec:da:89:a6:91".to_owned(), "attic-ap".to_owned());

        let alarm = Alarm {
            msg: "AP[FC:EC:DA:89:A6:91] was disconnected".into(),
            ..Alarm::default()
        };

        assert_eq!(device_name_for_alarm(&alarm, &names), "attic-ap");
    }

    #[test]
    fn alarm_device_name_falls_back_to_mac_fields() {
        let mut names = HashMap::new();
        names.insert("aa:bb:cc:dd:ee:ff".to_owned(), "core-sw".to_owned());

        let alarm = Alarm {
            msg: "spanning tree topology changed".into(),
            src_mac: "AA:BB:CC:DD:EE:FF".into(),
            ..Alarm::default()
        };

        assert_eq!(device_name_for_alarm(&alarm, &names), "core-sw");

        let unknown = Alarm::default();
        assert_eq!(device_name_for_alarm(&unknown, &names), "");
    }

    #[test]
    fn event_redaction_clears_geo_and_masks_macs() {
        let event = EventRecord {
            host: "laptop.lan".into(),
            src_mac: "aa:bb:cc:dd:ee:ff".into(),
            dest_ip_geo: IpGeo {
                city: "Springfield".into(),
                ..IpGeo::default()
            },
            ..EventRecord::default()
        };

        let redacted = redact_event(event.clone(), true, false);
        assert!(redacted.dest_ip_geo.is_empty());
        assert_ne!(redacted.src_mac, event.src_mac);
        assert_ne!(redacted.host, event.host);

        let untouched = redact_event(event.clone(), false, false);
        assert_eq!(untouched.host, event.host);
    }
}
