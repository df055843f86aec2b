// Producer fan-out for the scrape path: one task per snapshot
// collection, each turning its slice into gauge samples.
//
// Gates match the metric pipeline everywhere else: unadopted/locating
// devices are skipped (but counted), rogue APs with age zero never
// export.

use std::sync::Arc;

use tokio::task::JoinHandle;

use unipoll_api::models::{SysStats, SystemStats};
use unipoll_core::ItemKind;

use crate::report::{Report, Sample};

/// Identity labels shared by all device samples.
fn device_labels(
    name: &str,
    mac: &str,
    site_name: &str,
    source: &str,
    model: &str,
    version: &str,
    kind: &str,
) -> Vec<(&'static str, String)> {
    vec![
        ("name", name.to_owned()),
        ("mac", mac.to_owned()),
        ("site_name", site_name.to_owned()),
        ("source", source.to_owned()),
        ("model", model.to_owned()),
        ("version", version.to_owned()),
        ("type", kind.to_owned()),
    ]
}

async fn send_device_stats(
    r: &Report,
    labels: Vec<(&'static str, String)>,
    sys: &SysStats,
    system: &SystemStats,
    gauges: Vec<(&'static str, &'static str, f64)>,
) {
    let base: Vec<(&str, &str, f64)> = vec![
        ("load_average_1", "1-minute load average", sys.loadavg_1.val),
        ("load_average_5", "5-minute load average", sys.loadavg_5.val),
        ("load_average_15", "15-minute load average", sys.loadavg_15.val),
        ("memory_used_bytes", "Memory in use", sys.mem_used.val),
        ("memory_total_bytes", "Total memory", sys.mem_total.val),
        ("cpu_utilization_ratio", "CPU utilization", system.cpu.val),
        ("memory_utilization_ratio", "Memory utilization", system.mem.val),
    ];

    for (field, help, value) in base.into_iter().chain(gauges) {
        r.send(Sample {
            name: r.name("device", field),
            help,
            labels: labels.clone(),
            value,
        })
        .await;
    }
}

macro_rules! export_common_device {
    ($r:expr, $d:expr, $kind:expr) => {{
        let d = $d;

        if !d.adopted || d.locating {
            continue;
        }

        $r.counts.bump($kind);

        let labels = device_labels(
            &d.name,
            &d.mac,
            &d.site_name,
            &d.source_name,
            &d.model,
            &d.version,
            &d.kind,
        );

        send_device_stats(
            $r,
            labels,
            &d.sys_stats,
            &d.system_stats,
            vec![
                ("uptime_seconds", "Device uptime", d.uptime.val),
                ("state", "Device state", d.state.val),
                ("stations_total", "Connected stations", d.num_sta.val),
                ("bytes_total", "Total transferred bytes", d.bytes.val),
                ("receive_bytes_total", "Received bytes", d.rx_bytes.val),
                ("transmit_bytes_total", "Transmitted bytes", d.tx_bytes.val),
            ],
        )
        .await;
    }};
}

/// Spawn the producer set for one scrape.
pub(crate) fn spawn_producers(report: &Arc<Report>) -> Vec<JoinHandle<()>> {
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    // Sites: one sample set per health subsystem.
    let r = Arc::clone(report);
    tasks.push(tokio::spawn(async move {
        for site in &r.snapshot.sites {
            r.counts.bump(ItemKind::Site);

            for h in &site.health {
                let labels = vec![
                    ("site_name", site.site_name.clone()),
                    ("source", site.source_name.clone()),
                    ("subsystem", h.subsystem.clone()),
                    ("status", h.status.clone()),
                ];

                for (field, help, value) in [
                    ("users", "Connected users", h.num_user.val),
                    ("guests", "Connected guests", h.num_guest.val),
                    ("iot_devices", "Connected IoT devices", h.num_iot.val),
                    ("adopted_devices", "Adopted devices", h.num_adopted.val),
                    ("disconnected_devices", "Disconnected devices", h.num_disconnected.val),
                    ("pending_devices", "Pending devices", h.num_pending.val),
                    ("receive_rate_bytes", "Receive rate", h.rx_bytes_r.val),
                    ("transmit_rate_bytes", "Transmit rate", h.tx_bytes_r.val),
                    ("latency_ms", "WAN latency", h.latency.val),
                    ("drops_total", "WAN drops", h.drops.val),
                    ("throughput_up_rate", "Upload throughput", h.xput_up.val),
                    ("throughput_down_rate", "Download throughput", h.xput_down.val),
                ] {
                    r.send(Sample {
                        name: r.name("site", field),
                        help,
                        labels: labels.clone(),
                        value,
                    })
                    .await;
                }
            }
        }
    }));

    // Clients.
    let r = Arc::clone(report);
    tasks.push(tokio::spawn(async move {
        for c in &r.snapshot.clients {
            r.counts.bump(ItemKind::Client);

            let labels = vec![
                ("name", c.name.clone()),
                ("mac", c.mac.clone()),
                ("site_name", c.site_name.clone()),
                ("source", c.source_name.clone()),
                ("ap_name", c.ap_name.clone()),
                ("sw_name", c.sw_name.clone()),
                ("gw_name", c.gw_name.clone()),
                ("radio", c.radio.clone()),
                ("wired", c.is_wired.to_string()),
                ("guest", c.is_guest.to_string()),
            ];

            for (field, help, value) in [
                ("uptime_seconds", "Client session uptime", c.uptime.val),
                ("rssi_dbm", "Client RSSI", c.rssi.val),
                ("signal_dbm", "Client signal strength", c.signal.val),
                ("noise_dbm", "Client noise floor", c.noise.val),
                ("satisfaction_ratio", "Client satisfaction", c.satisfaction.val),
                ("receive_bytes_total", "Received bytes", c.rx_bytes.val),
                ("transmit_bytes_total", "Transmitted bytes", c.tx_bytes.val),
                ("receive_packets_total", "Received packets", c.rx_packets.val),
                ("transmit_packets_total", "Transmitted packets", c.tx_packets.val),
                ("receive_rate_bps", "Receive rate", c.rx_rate.val),
                ("transmit_rate_bps", "Transmit rate", c.tx_rate.val),
            ] {
                r.send(Sample {
                    name: r.name("client", field),
                    help,
                    labels: labels.clone(),
                    value,
                })
                .await;
            }
        }
    }));

    // Rogue (neighboring) APs.
    let r = Arc::clone(report);
    tasks.push(tokio::spawn(async move {
        for ap in &r.snapshot.rogue_aps {
            if ap.age.val == 0.0 {
                continue;
            }

            r.counts.bump(ItemKind::RogueAp);

            let labels = vec![
                ("bssid", ap.bssid.clone()),
                ("essid", ap.essid.clone()),
                ("ap_mac", ap.ap_mac.clone()),
                ("security", ap.security.clone()),
                ("site_name", ap.site_name.clone()),
                ("source", ap.source_name.clone()),
            ];

            for (field, help, value) in [
                ("age_seconds", "Seconds since last sighting", ap.age.val),
                ("signal_dbm", "Observed signal strength", ap.signal.val),
                ("rssi_dbm", "Observed RSSI", ap.rssi.val),
                ("channel", "Broadcast channel", ap.channel.val),
            ] {
                r.send(Sample {
                    name: r.name("rogue_ap", field),
                    help,
                    labels: labels.clone(),
                    value,
                })
                .await;
            }
        }
    }));

    // Devices, one task per scrape over all families.
    if report.snapshot.devices.is_some() {
        let r = Arc::clone(report);
        tasks.push(tokio::spawn(async move {
            let Some(devices) = r.snapshot.devices.as_ref() else {
                return;
            };

            for d in &devices.uaps {
                export_common_device!(&r, d, ItemKind::Uap);
            }
            for d in &devices.usws {
                export_common_device!(&r, d, ItemKind::Usw);
            }
            for d in &devices.usgs {
                export_common_device!(&r, d, ItemKind::Usg);
            }
            for d in &devices.udms {
                export_common_device!(&r, d, ItemKind::Udm);
            }
            for d in &devices.uxgs {
                export_common_device!(&r, d, ItemKind::Uxg);
            }
            for d in &devices.udbs {
                export_common_device!(&r, d, ItemKind::Udb);
            }
            for d in &devices.ubbs {
                export_common_device!(&r, d, ItemKind::Ubb);
            }
            for d in &devices.pdus {
                export_common_device!(&r, d, ItemKind::Pdu);
            }

            // Console-integration devices carry no traffic counters;
            // export the lifecycle gauges only.
            for d in &devices.ucis {
                if !d.adopted || d.locating {
                    continue;
                }

                r.counts.bump(ItemKind::Uci);

                let labels = device_labels(
                    &d.name,
                    &d.mac,
                    &d.site_name,
                    &d.source_name,
                    &d.model,
                    &d.version,
                    &d.kind,
                );

                send_device_stats(
                    &r,
                    labels,
                    &d.sys_stats,
                    &d.system_stats,
                    vec![
                        ("uptime_seconds", "Device uptime", d.uptime.val),
                        ("state", "Device state", d.state.val),
                    ],
                )
                .await;
            }
        }));
    }

    tasks
}
