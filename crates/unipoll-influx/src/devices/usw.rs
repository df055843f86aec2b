use unipoll_api::models::Usw;
use unipoll_core::point::{combine, fields};
use unipoll_core::{ItemKind, Point};

use super::{identity_tags, port_points, sw_stat_fields, sys_stats_fields};
use crate::report::Report;

/// Batch one switch: the device point plus its port table.
pub(crate) async fn usw(r: &Report, d: &Usw) {
    if !d.adopted || d.locating {
        return;
    }

    let tags = identity_tags(
        &d.mac,
        &d.site_name,
        &d.source_name,
        &d.name,
        &d.version,
        &d.model,
        &d.serial,
        &d.kind,
    );

    let mut point = Point::new("usw");
    point.tags = tags.clone();
    point.fields = combine([
        sw_stat_fields(d.stat.sw.as_ref()),
        sys_stats_fields(&d.sys_stats, &d.system_stats),
        fields([
            ("ip", d.ip.as_str().into()),
            ("bytes", d.bytes.into()),
            ("fan_level", d.fan_level.into()),
            ("general_temperature", d.general_temperature.into()),
            ("overheating", d.overheating.into()),
            ("last_seen", d.last_seen.into()),
            ("rx_bytes", d.rx_bytes.into()),
            ("tx_bytes", d.tx_bytes.into()),
            ("uptime", d.uptime.into()),
            ("state", d.state.into()),
            ("user-num_sta", d.user_num_sta.into()),
            ("guest-num_sta", d.guest_num_sta.into()),
            ("upgradeable", d.upgradable.into()),
            ("uplink_speed", d.uplink.speed.into()),
            ("uplink_max_speed", d.uplink.max_speed.into()),
            ("uplink_latency", d.uplink.latency.into()),
            ("uplink_uptime", d.uplink.uptime.into()),
        ]),
    ]);

    r.count(ItemKind::Usw);
    r.send(point).await;

    port_points(r, &tags, &d.port_table).await;
}
