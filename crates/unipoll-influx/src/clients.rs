use unipoll_api::models::ClientStation;
use unipoll_core::point::{fields, tags};
use unipoll_core::{ItemKind, Point};

use crate::report::Report;

/// Batch one connected client.
pub(crate) async fn client(r: &Report, s: &ClientStation) {
    let mut point = Point::new("clients");
    point.tags = tags([
        ("mac", s.mac.clone()),
        ("site_name", s.site_name.clone()),
        ("source", s.source_name.clone()),
        ("ap_name", s.ap_name.clone()),
        ("gw_name", s.gw_name.clone()),
        ("sw_name", s.sw_name.clone()),
        ("oui", s.oui.clone()),
        ("radio", s.radio.clone()),
        ("radio_proto", s.radio_proto.clone()),
        ("name", s.name.clone()),
        ("network", s.network.clone()),
        ("sw_port", s.sw_port.txt()),
        ("is_wired", s.is_wired.to_string()),
        ("is_guest", s.is_guest.to_string()),
        ("channel", s.channel.txt()),
        ("vlan", s.vlan.txt()),
    ]);
    point.fields = fields([
        ("ip", s.ip.as_str().into()),
        ("essid", s.essid.as_str().into()),
        ("bssid", s.bssid.as_str().into()),
        ("channel", s.channel.into()),
        ("hostname", s.hostname.as_str().into()),
        ("radio_desc", s.radio_description.as_str().into()),
        ("satisfaction", s.satisfaction.into()),
        ("ccq", s.ccq.into()),
        ("noise", s.noise.into()),
        ("powersave_enabled", s.powersave_enabled.into()),
        ("rssi", s.rssi.into()),
        ("signal", s.signal.into()),
        ("authorized", s.authorized.into()),
        ("rx_bytes", s.rx_bytes.into()),
        ("rx_bytes_r", s.rx_bytes_r.into()),
        ("rx_packets", s.rx_packets.into()),
        ("rx_rate", s.rx_rate.into()),
        ("tx_bytes", s.tx_bytes.into()),
        ("tx_bytes_r", s.tx_bytes_r.into()),
        ("tx_packets", s.tx_packets.into()),
        ("tx_retries", s.tx_retries.into()),
        ("tx_rate", s.tx_rate.into()),
        ("uptime", s.uptime.into()),
        ("wifi_tx_attempts", s.wifi_tx_attempts.into()),
    ]);

    r.count(ItemKind::Client);
    r.send(point).await;
}
