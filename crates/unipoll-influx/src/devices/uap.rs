use unipoll_api::models::Uap;
use unipoll_core::point::{combine, fields};
use unipoll_core::{ItemKind, Point};

use super::{ap_stat_fields, identity_tags, radio_points, sys_stats_fields, vap_points};
use crate::report::Report;

/// Batch one access point: the device point, then one point per VAP
/// and per radio.
pub(crate) async fn uap(r: &Report, d: &Uap) {
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

    let mut point = Point::new("uap");
    point.tags = tags.clone();
    point.fields = combine([
        ap_stat_fields(d.stat.ap.as_ref()),
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
            ("num_sta", d.num_sta.into()),
            ("upgradeable", d.upgradable.into()),
        ]),
    ]);

    r.count(ItemKind::Uap);
    r.send(point).await;

    vap_points(r, &tags, &d.vap_table).await;
    radio_points(r, &tags, &d.radio_table_stats).await;
}
