// Per-family device batchers. Shared tag/field builders live here;
// each family file owns its table layout.
//
// Gates applied across every family: devices that are not adopted or
// are actively locating are skipped for the full point (their summary
// is still counted upstream); ports that are neither up nor enabled are
// skipped unless the output records dead ports.

mod pdu;
mod rogue;
mod uap;
mod ubb;
mod uci;
mod udb;
mod udm;
mod usg;
mod usw;
mod uxg;

pub(crate) use pdu::pdu;
pub(crate) use rogue::rogue_ap;
pub(crate) use uap::uap;
pub(crate) use ubb::ubb;
pub(crate) use uci::uci;
pub(crate) use udb::udb;
pub(crate) use udm::udm;
pub(crate) use usg::usg;
pub(crate) use usw::usw;
pub(crate) use uxg::uxg;

use std::collections::BTreeMap;

use unipoll_api::models::{
    ApStat, GwStat, Port, SpeedtestStatus, SwStat, SysStats, SystemStats, Uplink, Vap, Wan,
};
use unipoll_core::point::{fields, tags};
use unipoll_core::{FieldValue, Point};

use crate::report::Report;

type Tags = BTreeMap<String, String>;
type Fields = BTreeMap<String, FieldValue>;

/// The identity tag set shared by every device family.
#[allow(clippy::too_many_arguments)]
pub(crate) fn identity_tags(
    mac: &str,
    site_name: &str,
    source: &str,
    name: &str,
    version: &str,
    model: &str,
    serial: &str,
    kind: &str,
) -> Tags {
    tags([
        ("mac", mac.to_owned()),
        ("site_name", site_name.to_owned()),
        ("source", source.to_owned()),
        ("name", name.to_owned()),
        ("version", version.to_owned()),
        ("model", model.to_owned()),
        ("serial", serial.to_owned()),
        ("type", kind.to_owned()),
    ])
}

/// Load/memory/cpu block shared by every device family.
pub(crate) fn sys_stats_fields(sys: &SysStats, system: &SystemStats) -> Fields {
    fields([
        ("loadavg_1", sys.loadavg_1.into()),
        ("loadavg_5", sys.loadavg_5.into()),
        ("loadavg_15", sys.loadavg_15.into()),
        ("mem_used", sys.mem_used.into()),
        ("mem_buffer", sys.mem_buffer.into()),
        ("mem_total", sys.mem_total.into()),
        ("cpu", system.cpu.into()),
        ("mem", system.mem.into()),
        ("system_uptime", system.uptime.into()),
    ])
}

/// Switch statistics block (`stat.sw`).
///
/// `stat_rx_packets` is sourced from the transmit counter here, exactly
/// as the upstream data pipeline does; whether that is a field-name bug
/// or intentional is ambiguous, so the behavior is preserved.
pub(crate) fn sw_stat_fields(sw: Option<&SwStat>) -> Fields {
    let Some(sw) = sw else {
        return Fields::new();
    };

    fields([
        ("stat_bytes", sw.bytes.into()),
        ("stat_rx_bytes", sw.rx_bytes.into()),
        ("stat_rx_crypts", sw.rx_crypts.into()),
        ("stat_rx_dropped", sw.rx_dropped.into()),
        ("stat_rx_errors", sw.rx_errors.into()),
        ("stat_rx_frags", sw.rx_frags.into()),
        ("stat_rx_packets", sw.tx_packets.into()),
        ("stat_tx_bytes", sw.tx_bytes.into()),
        ("stat_tx_dropped", sw.tx_dropped.into()),
        ("stat_tx_errors", sw.tx_errors.into()),
        ("stat_tx_packets", sw.tx_packets.into()),
        ("stat_tx_retries", sw.tx_retries.into()),
    ])
}

/// Access point statistics block (`stat.ap`).
pub(crate) fn ap_stat_fields(ap: Option<&ApStat>) -> Fields {
    let Some(ap) = ap else {
        return Fields::new();
    };

    fields([
        ("stat_bytes", ap.bytes.into()),
        ("stat_rx_bytes", ap.rx_bytes.into()),
        ("stat_rx_packets", ap.rx_packets.into()),
        ("stat_rx_errors", ap.rx_errors.into()),
        ("stat_rx_dropped", ap.rx_dropped.into()),
        ("stat_rx_crypts", ap.rx_crypts.into()),
        ("stat_rx_frags", ap.rx_frags.into()),
        ("stat_tx_bytes", ap.tx_bytes.into()),
        ("stat_tx_packets", ap.tx_packets.into()),
        ("stat_tx_errors", ap.tx_errors.into()),
        ("stat_tx_dropped", ap.tx_dropped.into()),
        ("stat_tx_retries", ap.tx_retries.into()),
        ("stat_user-rx_bytes", ap.user_rx_bytes.into()),
        ("stat_user-tx_bytes", ap.user_tx_bytes.into()),
        ("stat_guest-rx_bytes", ap.guest_rx_bytes.into()),
        ("stat_guest-tx_bytes", ap.guest_tx_bytes.into()),
    ])
}

/// Gateway statistics plus uplink and speed-test results.
pub(crate) fn gw_stat_fields(
    speedtest: &SpeedtestStatus,
    gw: Option<&GwStat>,
    uplink: &Uplink,
) -> Fields {
    let Some(gw) = gw else {
        return Fields::new();
    };

    fields([
        ("uplink_name", uplink.name.as_str().into()),
        ("uplink_latency", uplink.latency.into()),
        ("uplink_speed", uplink.speed.into()),
        ("uplink_max_speed", uplink.max_speed.into()),
        ("uplink_uptime", uplink.uptime.into()),
        ("speedtest-status_latency", speedtest.latency.into()),
        ("speedtest-status_runtime", speedtest.runtime.into()),
        ("speedtest-status_rundate", speedtest.rundate.into()),
        ("speedtest-status_xput_download", speedtest.xput_download.into()),
        ("speedtest-status_xput_upload", speedtest.xput_upload.into()),
        ("lan-rx_bytes", gw.lan_rx_bytes.into()),
        ("lan-rx_packets", gw.lan_rx_packets.into()),
        ("lan-rx_dropped", gw.lan_rx_dropped.into()),
        ("lan-tx_bytes", gw.lan_tx_bytes.into()),
        ("lan-tx_packets", gw.lan_tx_packets.into()),
        ("wan-rx_bytes", gw.wan_rx_bytes.into()),
        ("wan-rx_dropped", gw.wan_rx_dropped.into()),
        ("wan-rx_packets", gw.wan_rx_packets.into()),
        ("wan-tx_bytes", gw.wan_tx_bytes.into()),
        ("wan-tx_packets", gw.wan_tx_packets.into()),
    ])
}

/// One point per switch port, skipping dead ports unless configured in.
pub(crate) async fn port_points(r: &Report, device: &Tags, ports: &[Port]) {
    let tag = |key: &str| device.get(key).cloned().unwrap_or_default();

    for p in ports {
        if !r.opts.dead_ports && (!p.up || !p.enable) {
            continue; // only record UP ports.
        }

        let mut point = Point::new("usw_ports");
        point.tags = tags([
            ("site_name", tag("site_name")),
            ("device_name", tag("name")),
            ("source", tag("source")),
            ("type", tag("type")),
            ("name", p.name.clone()),
            ("poe_mode", p.poe_mode.clone()),
            ("port_poe", p.port_poe.to_string()),
            ("port_idx", p.port_idx.txt()),
            ("port_id", format!("{} Port {}", tag("name"), p.port_idx.txt())),
            ("poe_enable", p.poe_enable.to_string()),
            ("media", p.media.clone()),
            ("has_sfp", p.sfp_found.to_string()),
            ("sfp_compliance", p.sfp_compliance.clone()),
            ("sfp_serial", p.sfp_serial.clone()),
            ("sfp_vendor", p.sfp_vendor.clone()),
            ("sfp_part", p.sfp_part.clone()),
        ]);
        point.fields = fields([
            ("dbytes_r", p.bytes_r.into()),
            ("rx_broadcast", p.rx_broadcast.into()),
            ("rx_bytes", p.rx_bytes.into()),
            ("rx_bytes-r", p.rx_bytes_r.into()),
            ("rx_dropped", p.rx_dropped.into()),
            ("rx_errors", p.rx_errors.into()),
            ("rx_multicast", p.rx_multicast.into()),
            ("rx_packets", p.rx_packets.into()),
            ("speed", p.speed.into()),
            ("stp_pathcost", p.stp_pathcost.into()),
            ("tx_broadcast", p.tx_broadcast.into()),
            ("tx_bytes", p.tx_bytes.into()),
            ("tx_bytes-r", p.tx_bytes_r.into()),
            ("tx_dropped", p.tx_dropped.into()),
            ("tx_errors", p.tx_errors.into()),
            ("tx_multicast", p.tx_multicast.into()),
            ("tx_packets", p.tx_packets.into()),
        ]);

        if p.poe_enable && p.port_poe {
            point.fields.insert("poe_current".into(), p.poe_current.into());
            point.fields.insert("poe_power".into(), p.poe_power.into());
            point.fields.insert("poe_voltage".into(), p.poe_voltage.into());
        }

        if p.sfp_found {
            point.fields.insert("sfp_current".into(), p.sfp_current.into());
            point.fields.insert("sfp_voltage".into(), p.sfp_voltage.into());
            point
                .fields
                .insert("sfp_temperature".into(), p.sfp_temperature.into());
            point.fields.insert("sfp_txpower".into(), p.sfp_txpower.into());
            point.fields.insert("sfp_rxpower".into(), p.sfp_rxpower.into());
        }

        r.send(point).await;
    }
}

/// One point per WAN interface that is up.
pub(crate) async fn wan_points(r: &Report, device: &Tags, wans: [&Wan; 2]) {
    let tag = |key: &str| device.get(key).cloned().unwrap_or_default();

    for wan in wans {
        if !wan.up {
            continue;
        }

        let mut point = Point::new("usg_wan_ports");
        point.tags = tags([
            ("device_name", tag("name")),
            ("site_name", tag("site_name")),
            ("source", tag("source")),
            ("ip", wan.ip.clone()),
            ("purpose", wan.name.clone()),
            ("mac", wan.mac.clone()),
            ("ifname", wan.ifname.clone()),
            ("up", wan.up.to_string()),
            ("enabled", wan.enable.to_string()),
        ]);
        point.fields = fields([
            ("full_duplex", wan.full_duplex.into()),
            ("max_speed", wan.max_speed.into()),
            ("rx_bytes", wan.rx_bytes.into()),
            ("rx_bytes-r", wan.rx_bytes_r.into()),
            ("rx_dropped", wan.rx_dropped.into()),
            ("rx_errors", wan.rx_errors.into()),
            ("rx_packets", wan.rx_packets.into()),
            ("speed", wan.speed.into()),
            ("tx_bytes", wan.tx_bytes.into()),
            ("tx_bytes-r", wan.tx_bytes_r.into()),
            ("tx_dropped", wan.tx_dropped.into()),
            ("tx_errors", wan.tx_errors.into()),
            ("tx_packets", wan.tx_packets.into()),
        ]);

        r.send(point).await;
    }
}

/// One point per virtual AP (SSID broadcast).
pub(crate) async fn vap_points(r: &Report, device: &Tags, vaps: &[Vap]) {
    let tag = |key: &str| device.get(key).cloned().unwrap_or_default();

    for vap in vaps {
        let mut point = Point::new("uap_vaps");
        point.tags = tags([
            ("device_name", tag("name")),
            ("site_name", tag("site_name")),
            ("source", tag("source")),
            ("name", vap.name.clone()),
            ("bssid", vap.bssid.clone()),
            ("radio", vap.radio.clone()),
            ("radio_name", vap.radio_name.clone()),
            ("essid", vap.essid.clone()),
            ("usage", vap.usage.clone()),
            ("up", vap.up.to_string()),
        ]);
        point.fields = fields([
            ("ccq", vap.ccq.into()),
            ("channel", vap.channel.into()),
            ("num_sta", vap.num_sta.into()),
            ("satisfaction", vap.satisfaction.into()),
            ("avg_client_signal", vap.avg_client_signal.into()),
            ("tx_power", vap.tx_power.into()),
            ("rx_bytes", vap.rx_bytes.into()),
            ("rx_packets", vap.rx_packets.into()),
            ("rx_dropped", vap.rx_dropped.into()),
            ("rx_errors", vap.rx_errors.into()),
            ("tx_bytes", vap.tx_bytes.into()),
            ("tx_packets", vap.tx_packets.into()),
            ("tx_dropped", vap.tx_dropped.into()),
            ("tx_errors", vap.tx_errors.into()),
            ("tx_retries", vap.tx_retries.into()),
        ]);

        r.send(point).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Report, ReportOpts};
    use chrono::Utc;
    use unipoll_api::models::{RogueAp, Usw};
    use unipoll_core::{EventLog, Snapshot};

    fn switch_with_ports() -> Usw {
        Usw {
            mac: "aa:bb".into(),
            name: "core-sw".into(),
            adopted: true,
            port_table: vec![
                Port {
                    name: "uplink".into(),
                    up: true,
                    enable: true,
                    ..Port::default()
                },
                Port {
                    name: "dead".into(),
                    up: false,
                    enable: false,
                    ..Port::default()
                },
            ],
            ..Usw::default()
        }
    }

    async fn run_batch<F, Fut>(opts: ReportOpts, produce: F) -> usize
    where
        F: FnOnce(std::sync::Arc<Report>) -> Fut,
        Fut: std::future::Future<Output = ()>,
    {
        let (report, mut rx) =
            Report::new(Snapshot::default(), EventLog::default(), opts, Utc::now());

        produce(std::sync::Arc::clone(&report)).await;
        drop(report);

        let mut count = 0;
        while rx.recv().await.is_some() {
            count += 1;
        }
        count
    }

    #[tokio::test]
    async fn dead_ports_are_skipped_unless_configured() {
        let device = switch_with_ports();

        let without = run_batch(ReportOpts::default(), |r| {
            let device = device.clone();
            async move { usw(&r, &device).await }
        })
        .await;
        // The device point plus the one live port.
        assert_eq!(without, 2);

        let with = run_batch(
            ReportOpts {
                dead_ports: true,
                ..ReportOpts::default()
            },
            |r| {
                let device = device.clone();
                async move { usw(&r, &device).await }
            },
        )
        .await;
        assert_eq!(with, 3);
    }

    #[tokio::test]
    async fn unadopted_and_locating_devices_emit_nothing() {
        let mut unadopted = switch_with_ports();
        unadopted.adopted = false;

        let count = run_batch(ReportOpts::default(), |r| async move {
            usw(&r, &unadopted).await;
        })
        .await;
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn fresh_rogue_aps_export_and_stale_ones_do_not() {
        let count = run_batch(ReportOpts::default(), |r| async move {
            rogue_ap(
                &r,
                &RogueAp {
                    age: 10.0.into(),
                    ..RogueAp::default()
                },
            )
            .await;
            rogue_ap(&r, &RogueAp::default()).await; // age == 0
        })
        .await;
        assert_eq!(count, 1);
    }
}

/// One point per radio from `radio_table_stats`.
pub(crate) async fn radio_points(
    r: &Report,
    device: &Tags,
    radios: &[unipoll_api::models::RadioStat],
) {
    let tag = |key: &str| device.get(key).cloned().unwrap_or_default();

    for radio in radios {
        let mut point = Point::new("uap_radios");
        point.tags = tags([
            ("device_name", tag("name")),
            ("site_name", tag("site_name")),
            ("source", tag("source")),
            ("radio", radio.radio.clone()),
            ("radio_name", radio.name.clone()),
        ]);
        point.fields = fields([
            ("channel", radio.channel.into()),
            ("cu_total", radio.cu_total.into()),
            ("cu_self_rx", radio.cu_self_rx.into()),
            ("cu_self_tx", radio.cu_self_tx.into()),
            ("gain", radio.gain.into()),
            ("num_sta", radio.num_sta.into()),
            ("tx_power", radio.tx_power.into()),
            ("tx_packets", radio.tx_packets.into()),
            ("rx_packets", radio.rx_packets.into()),
            ("tx_retries", radio.tx_retries.into()),
        ]);

        r.send(point).await;
    }
}
