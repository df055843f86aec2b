use unipoll_api::models::RogueAp;
use unipoll_core::point::{fields, tags};
use unipoll_core::{ItemKind, Point};

use crate::report::Report;

/// Batch one neighboring AP. Entries with `age == 0` are stale scans
/// the controller has not refreshed; they are never emitted.
pub(crate) async fn rogue_ap(r: &Report, d: &RogueAp) {
    if d.age.val == 0.0 {
        return;
    }

    let mut point = Point::new("uap_rogue");
    point.tags = tags([
        ("ap_mac", d.ap_mac.clone()),
        ("bssid", d.bssid.clone()),
        ("essid", d.essid.clone()),
        ("oui", d.oui.clone()),
        ("band", d.band.clone()),
        ("radio", d.radio.clone()),
        ("radio_name", d.radio_name.clone()),
        ("security", d.security.clone()),
        ("is_ubnt", d.is_ubnt.to_string()),
        ("site_name", d.site_name.clone()),
        ("source", d.source_name.clone()),
    ]);
    point.fields = fields([
        ("age", d.age.into()),
        ("bw", d.bw.into()),
        ("center_freq", d.center_freq.into()),
        ("channel", d.channel.into()),
        ("freq", d.freq.into()),
        ("noise", d.noise.into()),
        ("rssi", d.rssi.into()),
        ("rssi_age", d.rssi_age.into()),
        ("signal", d.signal.into()),
    ]);

    r.count(ItemKind::RogueAp);
    r.send(point).await;
}
