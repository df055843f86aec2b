use unipoll_api::models::Usg;
use unipoll_core::point::{combine, fields};
use unipoll_core::{ItemKind, Point};

use super::{gw_stat_fields, identity_tags, sys_stats_fields, wan_points};
use crate::report::Report;

/// Batch one security gateway: the device point plus its WAN ports.
pub(crate) async fn usg(r: &Report, d: &Usg) {
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

    let mut point = Point::new("usg");
    point.tags = tags.clone();
    point.fields = combine([
        gw_stat_fields(&d.speedtest_status, d.stat.gw.as_ref(), &d.uplink),
        sys_stats_fields(&d.sys_stats, &d.system_stats),
        fields([
            ("ip", d.ip.as_str().into()),
            ("bytes", d.bytes.into()),
            ("last_seen", d.last_seen.into()),
            ("rx_bytes", d.rx_bytes.into()),
            ("tx_bytes", d.tx_bytes.into()),
            ("uptime", d.uptime.into()),
            ("state", d.state.into()),
            ("user-num_sta", d.user_num_sta.into()),
            ("guest-num_sta", d.guest_num_sta.into()),
            ("num_desktop", d.num_desktop.into()),
            ("num_handheld", d.num_handheld.into()),
            ("num_mobile", d.num_mobile.into()),
            ("upgradeable", d.upgradable.into()),
        ]),
    ]);

    r.count(ItemKind::Usg);
    r.send(point).await;

    wan_points(r, &tags, [&d.wan1, &d.wan2]).await;
}
