use unipoll_api::models::Uxg;
use unipoll_core::point::{combine, fields};
use unipoll_core::{ItemKind, Point};

use super::{gw_stat_fields, identity_tags, port_points, sw_stat_fields, sys_stats_fields,
    wan_points};
use crate::report::Report;

/// Batch one NeXt-Gen gateway: a gateway point plus a switch point for
/// its port block.
pub(crate) async fn uxg(r: &Report, d: &Uxg) {
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

    let common = || {
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
        ])
    };

    let mut point = Point::new("usg");
    point.tags = tags.clone();
    point.fields = combine([
        gw_stat_fields(&d.speedtest_status, d.stat.gw.as_ref(), &Default::default()),
        sys_stats_fields(&d.sys_stats, &d.system_stats),
        common(),
    ]);

    r.count(ItemKind::Uxg);
    r.send(point).await;
    wan_points(r, &tags, [&d.wan1, &d.wan2]).await;

    let mut point = Point::new("usw");
    point.tags = tags.clone();
    point.fields = combine([sw_stat_fields(d.stat.sw.as_ref()), common()]);
    r.send(point).await;
    port_points(r, &tags, &d.port_table).await;
}
