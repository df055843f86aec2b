use unipoll_api::models::Udm;
use unipoll_core::point::{combine, fields};
use unipoll_core::{ItemKind, Point};

use super::{
    ap_stat_fields, gw_stat_fields, identity_tags, port_points, radio_points, sw_stat_fields,
    sys_stats_fields, vap_points, wan_points,
};
use crate::report::Report;

/// Batch one Dream Machine. A UDM is three devices in one chassis, so
/// it emits a gateway point, a switch point with the port table, and --
/// when the model broadcasts WiFi -- an AP point with VAPs and radios.
pub(crate) async fn udm(r: &Report, d: &Udm) {
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

    // Gateway half.
    let mut point = Point::new("usg");
    point.tags = tags.clone();
    point.fields = combine([
        gw_stat_fields(&d.speedtest_status, d.stat.gw.as_ref(), &d.uplink),
        sys_stats_fields(&d.sys_stats, &d.system_stats),
        common(),
        fields([
            ("num_desktop", d.num_desktop.into()),
            ("num_handheld", d.num_handheld.into()),
            ("num_mobile", d.num_mobile.into()),
        ]),
    ]);

    r.count(ItemKind::Udm);
    r.send(point).await;
    wan_points(r, &tags, [&d.wan1, &d.wan2]).await;

    // Switch half.
    let mut point = Point::new("usw");
    point.tags = tags.clone();
    point.fields = combine([sw_stat_fields(d.stat.sw.as_ref()), common()]);
    r.send(point).await;
    port_points(r, &tags, &d.port_table).await;

    // AP half, only on models that carry radios.
    if d.stat.ap.is_none() {
        return;
    }

    let mut point = Point::new("uap");
    point.tags = tags.clone();
    point.fields = combine([
        ap_stat_fields(d.stat.ap.as_ref()),
        common(),
        fields([("num_sta", d.num_sta.into())]),
    ]);
    r.send(point).await;

    if let Some(vaps) = d.vap_table.as_deref() {
        vap_points(r, &tags, vaps).await;
    }
    if let Some(radios) = d.radio_table_stats.as_deref() {
        radio_points(r, &tags, radios).await;
    }
}
