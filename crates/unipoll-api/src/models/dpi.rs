use serde::{Deserialize, Serialize};

use super::Flex;

/// Deep packet inspection table for one site or one client.
///
/// Site DPI comes from `stat/sitedpi`; client DPI from `stat/stadpi`.
/// The shape is identical; `mac` is empty for site tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DpiTable {
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub by_app: Vec<DpiEntry>,
    #[serde(default)]
    pub by_cat: Vec<DpiEntry>,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// One application or category row in a DPI table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DpiEntry {
    #[serde(default)]
    pub app: Flex,
    #[serde(default)]
    pub cat: Flex,
    #[serde(default)]
    pub known_clients: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub rx_packets: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub tx_packets: Flex,
}
