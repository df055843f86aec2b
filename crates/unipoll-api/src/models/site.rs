use serde::{Deserialize, Serialize};

use super::Flex;

/// A site from `stat/sites`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Site {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default)]
    pub num_new_alarms: Flex,
    #[serde(default)]
    pub health: Vec<SiteHealth>,
    /// Filled in after decoding: the controller this site came from.
    #[serde(default)]
    pub source_name: String,
    /// Filled in after decoding: `desc (name)`, used as the site tag.
    #[serde(default)]
    pub site_name: String,
}

/// Per-subsystem health block nested inside a [`Site`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteHealth {
    #[serde(default)]
    pub subsystem: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub num_user: Flex,
    #[serde(default)]
    pub num_guest: Flex,
    #[serde(default)]
    pub num_iot: Flex,
    #[serde(default)]
    pub num_ap: Flex,
    #[serde(default)]
    pub num_adopted: Flex,
    #[serde(default)]
    pub num_disabled: Flex,
    #[serde(default)]
    pub num_disconnected: Flex,
    #[serde(default)]
    pub num_pending: Flex,
    #[serde(default)]
    pub num_gw: Flex,
    #[serde(default)]
    pub num_sw: Flex,
    #[serde(default)]
    pub rx_bytes_r: Flex,
    #[serde(default)]
    pub tx_bytes_r: Flex,
    #[serde(default)]
    pub latency: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub drops: Flex,
    #[serde(default, rename = "xput_up")]
    pub xput_up: Flex,
    #[serde(default, rename = "xput_down")]
    pub xput_down: Flex,
    #[serde(default)]
    pub speedtest_ping: Flex,
    #[serde(default)]
    pub remote_user_num_active: Flex,
    #[serde(default)]
    pub remote_user_rx_bytes: Flex,
    #[serde(default)]
    pub remote_user_tx_bytes: Flex,
}
