use unipoll_api::models::Ubb;
use unipoll_core::point::{combine, fields};
use unipoll_core::{ItemKind, Point};

use super::{identity_tags, sys_stats_fields};
use crate::report::Report;

/// Batch one building-to-building bridge.
pub(crate) async fn ubb(r: &Report, d: &Ubb) {
    if !d.adopted || d.locating {
        return;
    }

    let mut point = Point::new("ubb");
    point.tags = identity_tags(
        &d.mac,
        &d.site_name,
        &d.source_name,
        &d.name,
        &d.version,
        &d.model,
        &d.serial,
        &d.kind,
    );
    point.fields = combine([
        sys_stats_fields(&d.sys_stats, &d.system_stats),
        fields([
            ("ip", d.ip.as_str().into()),
            ("bytes", d.bytes.into()),
            ("last_seen", d.last_seen.into()),
            ("rx_bytes", d.rx_bytes.into()),
            ("tx_bytes", d.tx_bytes.into()),
            ("uptime", d.uptime.into()),
            ("state", d.state.into()),
            ("num_sta", d.num_sta.into()),
            ("uplink_speed", d.uplink.speed.into()),
            ("uplink_max_speed", d.uplink.max_speed.into()),
            ("uplink_uptime", d.uplink.uptime.into()),
        ]),
    ]);

    r.count(ItemKind::Ubb);
    r.send(point).await;
}
