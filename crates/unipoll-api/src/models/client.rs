use serde::{Deserialize, Serialize};

use super::Flex;

/// A connected station from `stat/sta`.
///
/// `sw_name`/`ap_name`/`gw_name`/`radio_description` never arrive on the
/// wire; the input plugin's augmentation pass fills them from the device
/// tables collected in the same poll.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientStation {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub oui: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub essid: String,
    #[serde(default)]
    pub bssid: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub is_wired: bool,
    #[serde(default)]
    pub is_guest: bool,
    #[serde(default)]
    pub authorized: bool,
    #[serde(default)]
    pub powersave_enabled: bool,
    #[serde(default)]
    pub radio: String,
    #[serde(default)]
    pub radio_proto: String,
    #[serde(default)]
    pub channel: Flex,
    #[serde(default)]
    pub vlan: Flex,
    #[serde(default)]
    pub signal: Flex,
    #[serde(default)]
    pub noise: Flex,
    #[serde(default)]
    pub rssi: Flex,
    #[serde(default)]
    pub ccq: Flex,
    #[serde(default)]
    pub satisfaction: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub first_seen: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default, rename = "tx_bytes-r")]
    pub tx_bytes_r: Flex,
    #[serde(default, rename = "rx_bytes-r")]
    pub rx_bytes_r: Flex,
    #[serde(default)]
    pub tx_packets: Flex,
    #[serde(default)]
    pub rx_packets: Flex,
    #[serde(default)]
    pub tx_rate: Flex,
    #[serde(default)]
    pub rx_rate: Flex,
    #[serde(default)]
    pub tx_retries: Flex,
    #[serde(default)]
    pub wifi_tx_attempts: Flex,
    #[serde(default)]
    pub sw_mac: String,
    #[serde(default)]
    pub sw_port: Flex,
    #[serde(default)]
    pub ap_mac: String,
    #[serde(default)]
    pub gw_mac: String,

    // ── Augmentation outputs (never on the wire) ─────────────────────
    #[serde(default)]
    pub sw_name: String,
    #[serde(default)]
    pub ap_name: String,
    #[serde(default)]
    pub gw_name: String,
    #[serde(default)]
    pub radio_description: String,

    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}
