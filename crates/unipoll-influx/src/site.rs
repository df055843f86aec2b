use unipoll_api::models::Site;
use unipoll_core::point::{fields, tags};
use unipoll_core::{ItemKind, Point};

use crate::report::Report;

/// Batch one site: one point per health subsystem.
pub(crate) async fn site(r: &Report, s: &Site) {
    r.count(ItemKind::Site);

    for h in &s.health {
        let mut point = Point::new("subsystems");
        point.tags = tags([
            ("name", s.name.clone()),
            ("site_name", s.site_name.clone()),
            ("source", s.source_name.clone()),
            ("desc", s.desc.clone()),
            ("status", h.status.clone()),
            ("subsystem", h.subsystem.clone()),
        ]);
        point.fields = fields([
            ("num_user", h.num_user.into()),
            ("num_guest", h.num_guest.into()),
            ("num_iot", h.num_iot.into()),
            ("tx_bytes-r", h.tx_bytes_r.into()),
            ("rx_bytes-r", h.rx_bytes_r.into()),
            ("num_ap", h.num_ap.into()),
            ("num_adopted", h.num_adopted.into()),
            ("num_disabled", h.num_disabled.into()),
            ("num_disconnected", h.num_disconnected.into()),
            ("num_pending", h.num_pending.into()),
            ("num_gw", h.num_gw.into()),
            ("num_sw", h.num_sw.into()),
            ("latency", h.latency.into()),
            ("uptime", h.uptime.into()),
            ("drops", h.drops.into()),
            ("xput_up", h.xput_up.into()),
            ("xput_down", h.xput_down.into()),
            ("speedtest_ping", h.speedtest_ping.into()),
            ("remote_user_num_active", h.remote_user_num_active.into()),
            ("remote_user_rx_bytes", h.remote_user_rx_bytes.into()),
            ("remote_user_tx_bytes", h.remote_user_tx_bytes.into()),
            ("num_new_alarms", s.num_new_alarms.into()),
        ]);

        r.send(point).await;
    }
}
