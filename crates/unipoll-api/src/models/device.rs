use serde::{Deserialize, Serialize};

use super::Flex;

/// All devices returned by one `stat/device` call, split by family.
///
/// The wire mixes every family into a single array and tags each element
/// with a `type` field; [`DeviceList::push_raw`] dispatches on that tag.
#[derive(Debug, Clone, Default)]
pub struct DeviceList {
    pub uaps: Vec<Uap>,
    pub usws: Vec<Usw>,
    pub usgs: Vec<Usg>,
    pub udms: Vec<Udm>,
    pub uxgs: Vec<Uxg>,
    pub udbs: Vec<Udb>,
    pub ucis: Vec<Uci>,
    pub ubbs: Vec<Ubb>,
    pub pdus: Vec<Pdu>,
}

impl DeviceList {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.uaps.len()
            + self.usws.len()
            + self.usgs.len()
            + self.udms.len()
            + self.uxgs.len()
            + self.udbs.len()
            + self.ucis.len()
            + self.ubbs.len()
            + self.pdus.len()
    }

    /// Move every device out of `other` into `self`, family by family.
    pub fn append(&mut self, other: &mut DeviceList) {
        self.uaps.append(&mut other.uaps);
        self.usws.append(&mut other.usws);
        self.usgs.append(&mut other.usgs);
        self.udms.append(&mut other.udms);
        self.uxgs.append(&mut other.uxgs);
        self.udbs.append(&mut other.udbs);
        self.ucis.append(&mut other.ucis);
        self.ubbs.append(&mut other.ubbs);
        self.pdus.append(&mut other.pdus);
    }

    /// Decode one raw device object into the matching family list.
    ///
    /// Unknown `type` tags are reported back so the caller can log them;
    /// decode failures surface as deserialization errors.
    pub fn push_raw(&mut self, raw: &serde_json::Value) -> Result<(), crate::Error> {
        fn decode<T: serde::de::DeserializeOwned>(
            kind: &str,
            raw: &serde_json::Value,
        ) -> Result<T, crate::Error> {
            T::deserialize(raw).map_err(|e| crate::Error::Deserialization {
                message: format!("device type {kind:?}: {e}"),
                body: raw.to_string(),
            })
        }

        let kind = raw
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or_default();

        match kind {
            "uap" => self.uaps.push(decode(kind, raw)?),
            "usw" => self.usws.push(decode(kind, raw)?),
            "ugw" | "usg" => self.usgs.push(decode(kind, raw)?),
            "udm" => self.udms.push(decode(kind, raw)?),
            "uxg" => self.uxgs.push(decode(kind, raw)?),
            "udb" => self.udbs.push(decode(kind, raw)?),
            "uci" => self.ucis.push(decode(kind, raw)?),
            "ubb" => self.ubbs.push(decode(kind, raw)?),
            "usp" | "pdu" => self.pdus.push(decode(kind, raw)?),
            other => {
                return Err(crate::Error::Deserialization {
                    message: format!("unknown device type {other:?}"),
                    body: raw.to_string(),
                });
            }
        }

        Ok(())
    }
}

// ── Shared nested blocks ─────────────────────────────────────────────

/// Load and memory statistics shared by every device family.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SysStats {
    #[serde(default)]
    pub loadavg_1: Flex,
    #[serde(default)]
    pub loadavg_5: Flex,
    #[serde(default)]
    pub loadavg_15: Flex,
    #[serde(default)]
    pub mem_buffer: Flex,
    #[serde(default)]
    pub mem_total: Flex,
    #[serde(default)]
    pub mem_used: Flex,
}

/// CPU/memory utilization percentages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemStats {
    #[serde(default)]
    pub cpu: Flex,
    #[serde(default)]
    pub mem: Flex,
    #[serde(default)]
    pub uptime: Flex,
}

/// Uplink block on switches and access points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Uplink {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub speed: Flex,
    #[serde(default)]
    pub max_speed: Flex,
    #[serde(default)]
    pub latency: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
}

/// One entry from a switch/gateway `port_table`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Port {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub port_idx: Flex,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub media: String,
    #[serde(default)]
    pub full_duplex: bool,
    #[serde(default)]
    pub speed: Flex,
    #[serde(default)]
    pub stp_pathcost: Flex,
    #[serde(default)]
    pub poe_mode: String,
    #[serde(default)]
    pub port_poe: bool,
    #[serde(default)]
    pub poe_enable: bool,
    #[serde(default)]
    pub poe_current: Flex,
    #[serde(default)]
    pub poe_power: Flex,
    #[serde(default)]
    pub poe_voltage: Flex,
    #[serde(default)]
    pub sfp_found: bool,
    #[serde(default)]
    pub sfp_vendor: String,
    #[serde(default)]
    pub sfp_part: String,
    #[serde(default)]
    pub sfp_serial: String,
    #[serde(default)]
    pub sfp_compliance: String,
    #[serde(default)]
    pub sfp_current: Flex,
    #[serde(default)]
    pub sfp_voltage: Flex,
    #[serde(default)]
    pub sfp_temperature: Flex,
    #[serde(default)]
    pub sfp_txpower: Flex,
    #[serde(default)]
    pub sfp_rxpower: Flex,
    #[serde(default, rename = "bytes-r")]
    pub bytes_r: Flex,
    #[serde(default)]
    pub rx_broadcast: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default, rename = "rx_bytes-r")]
    pub rx_bytes_r: Flex,
    #[serde(default)]
    pub rx_dropped: Flex,
    #[serde(default)]
    pub rx_errors: Flex,
    #[serde(default)]
    pub rx_multicast: Flex,
    #[serde(default)]
    pub rx_packets: Flex,
    #[serde(default)]
    pub tx_broadcast: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default, rename = "tx_bytes-r")]
    pub tx_bytes_r: Flex,
    #[serde(default)]
    pub tx_dropped: Flex,
    #[serde(default)]
    pub tx_errors: Flex,
    #[serde(default)]
    pub tx_multicast: Flex,
    #[serde(default)]
    pub tx_packets: Flex,
}

/// One virtual AP (SSID broadcast) from a UAP `vap_table`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vap {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub essid: String,
    #[serde(default)]
    pub bssid: String,
    #[serde(default)]
    pub radio: String,
    #[serde(default)]
    pub radio_name: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub channel: Flex,
    #[serde(default)]
    pub ccq: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default)]
    pub satisfaction: Flex,
    #[serde(default)]
    pub avg_client_signal: Flex,
    #[serde(default)]
    pub tx_power: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub rx_packets: Flex,
    #[serde(default)]
    pub rx_dropped: Flex,
    #[serde(default)]
    pub rx_errors: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub tx_packets: Flex,
    #[serde(default)]
    pub tx_dropped: Flex,
    #[serde(default)]
    pub tx_errors: Flex,
    #[serde(default)]
    pub tx_retries: Flex,
}

/// Per-radio counters from a UAP `radio_table_stats`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RadioStat {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub radio: String,
    #[serde(default)]
    pub channel: Flex,
    #[serde(default)]
    pub cu_total: Flex,
    #[serde(default)]
    pub cu_self_rx: Flex,
    #[serde(default)]
    pub cu_self_tx: Flex,
    #[serde(default)]
    pub gain: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default)]
    pub tx_power: Flex,
    #[serde(default)]
    pub tx_packets: Flex,
    #[serde(default)]
    pub rx_packets: Flex,
    #[serde(default)]
    pub tx_retries: Flex,
}

/// A WAN interface block on gateways.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wan {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ifname: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub enable: bool,
    #[serde(default)]
    pub max_speed: Flex,
    #[serde(default)]
    pub speed: Flex,
    #[serde(default)]
    pub full_duplex: bool,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default, rename = "rx_bytes-r")]
    pub rx_bytes_r: Flex,
    #[serde(default)]
    pub rx_dropped: Flex,
    #[serde(default)]
    pub rx_errors: Flex,
    #[serde(default)]
    pub rx_packets: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default, rename = "tx_bytes-r")]
    pub tx_bytes_r: Flex,
    #[serde(default)]
    pub tx_dropped: Flex,
    #[serde(default)]
    pub tx_errors: Flex,
    #[serde(default)]
    pub tx_packets: Flex,
}

/// Gateway traffic statistics (`stat.gw`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GwStat {
    #[serde(default, rename = "lan-rx_bytes")]
    pub lan_rx_bytes: Flex,
    #[serde(default, rename = "lan-rx_packets")]
    pub lan_rx_packets: Flex,
    #[serde(default, rename = "lan-rx_dropped")]
    pub lan_rx_dropped: Flex,
    #[serde(default, rename = "lan-tx_bytes")]
    pub lan_tx_bytes: Flex,
    #[serde(default, rename = "lan-tx_packets")]
    pub lan_tx_packets: Flex,
    #[serde(default, rename = "wan-rx_bytes")]
    pub wan_rx_bytes: Flex,
    #[serde(default, rename = "wan-rx_dropped")]
    pub wan_rx_dropped: Flex,
    #[serde(default, rename = "wan-rx_packets")]
    pub wan_rx_packets: Flex,
    #[serde(default, rename = "wan-tx_bytes")]
    pub wan_tx_bytes: Flex,
    #[serde(default, rename = "wan-tx_packets")]
    pub wan_tx_packets: Flex,
}

/// Switch traffic statistics (`stat.sw`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwStat {
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub rx_crypts: Flex,
    #[serde(default)]
    pub rx_dropped: Flex,
    #[serde(default)]
    pub rx_errors: Flex,
    #[serde(default)]
    pub rx_frags: Flex,
    #[serde(default)]
    pub rx_packets: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub tx_dropped: Flex,
    #[serde(default)]
    pub tx_errors: Flex,
    #[serde(default)]
    pub tx_packets: Flex,
    #[serde(default)]
    pub tx_retries: Flex,
}

/// Access point traffic statistics (`stat.ap`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApStat {
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub rx_packets: Flex,
    #[serde(default)]
    pub rx_errors: Flex,
    #[serde(default)]
    pub rx_dropped: Flex,
    #[serde(default)]
    pub rx_crypts: Flex,
    #[serde(default)]
    pub rx_frags: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub tx_packets: Flex,
    #[serde(default)]
    pub tx_errors: Flex,
    #[serde(default)]
    pub tx_dropped: Flex,
    #[serde(default)]
    pub tx_retries: Flex,
    #[serde(default)]
    pub user_rx_bytes: Flex,
    #[serde(default)]
    pub user_tx_bytes: Flex,
    #[serde(default)]
    pub guest_rx_bytes: Flex,
    #[serde(default)]
    pub guest_tx_bytes: Flex,
}

/// Nested `stat` wrapper; families populate the block matching their role.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceStat {
    #[serde(default)]
    pub ap: Option<ApStat>,
    #[serde(default)]
    pub sw: Option<SwStat>,
    #[serde(default)]
    pub gw: Option<GwStat>,
}

/// Latest speed test result, present on gateways.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeedtestStatus {
    #[serde(default)]
    pub latency: Flex,
    #[serde(default)]
    pub rundate: Flex,
    #[serde(default)]
    pub runtime: Flex,
    #[serde(default)]
    pub xput_download: Flex,
    #[serde(default)]
    pub xput_upload: Flex,
}

/// One outlet from a PDU `outlet_table`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outlet {
    #[serde(default)]
    pub index: Flex,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub relay_state: bool,
    #[serde(default)]
    pub cycle_enabled: bool,
    #[serde(default)]
    pub outlet_caps: Flex,
    #[serde(default)]
    pub outlet_current: Flex,
    #[serde(default)]
    pub outlet_power: Flex,
    #[serde(default)]
    pub outlet_power_factor: Flex,
    #[serde(default)]
    pub outlet_voltage: Flex,
}

// ── Device families ──────────────────────────────────────────────────

/// UniFi access point from `stat/device`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Uap {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub upgradable: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default, rename = "user-num_sta")]
    pub user_num_sta: Flex,
    #[serde(default, rename = "guest-num_sta")]
    pub guest_num_sta: Flex,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub uplink: Uplink,
    #[serde(default)]
    pub stat: DeviceStat,
    #[serde(default)]
    pub vap_table: Vec<Vap>,
    #[serde(default)]
    pub radio_table_stats: Vec<RadioStat>,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// UniFi switch from `stat/device`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usw {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub upgradable: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default, rename = "user-num_sta")]
    pub user_num_sta: Flex,
    #[serde(default, rename = "guest-num_sta")]
    pub guest_num_sta: Flex,
    #[serde(default)]
    pub fan_level: Flex,
    #[serde(default)]
    pub general_temperature: Flex,
    #[serde(default)]
    pub overheating: bool,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub uplink: Uplink,
    #[serde(default)]
    pub stat: DeviceStat,
    #[serde(default)]
    pub port_table: Vec<Port>,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// UniFi security gateway from `stat/device`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usg {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub upgradable: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default, rename = "user-num_sta")]
    pub user_num_sta: Flex,
    #[serde(default, rename = "guest-num_sta")]
    pub guest_num_sta: Flex,
    #[serde(default)]
    pub num_desktop: Flex,
    #[serde(default)]
    pub num_mobile: Flex,
    #[serde(default)]
    pub num_handheld: Flex,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub uplink: Uplink,
    #[serde(default)]
    pub stat: DeviceStat,
    #[serde(default)]
    pub wan1: Wan,
    #[serde(default)]
    pub wan2: Wan,
    #[serde(default)]
    pub speedtest_status: SpeedtestStatus,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// UniFi Dream Machine: a gateway that also switches and (on some
/// models) broadcasts WiFi, so it carries all three table sets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Udm {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub upgradable: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default, rename = "user-num_sta")]
    pub user_num_sta: Flex,
    #[serde(default, rename = "guest-num_sta")]
    pub guest_num_sta: Flex,
    #[serde(default)]
    pub num_desktop: Flex,
    #[serde(default)]
    pub num_mobile: Flex,
    #[serde(default)]
    pub num_handheld: Flex,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub uplink: Uplink,
    #[serde(default)]
    pub stat: DeviceStat,
    #[serde(default)]
    pub wan1: Wan,
    #[serde(default)]
    pub wan2: Wan,
    #[serde(default)]
    pub speedtest_status: SpeedtestStatus,
    #[serde(default)]
    pub port_table: Vec<Port>,
    #[serde(default)]
    pub vap_table: Option<Vec<Vap>>,
    #[serde(default)]
    pub radio_table_stats: Option<Vec<RadioStat>>,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// UniFi NeXt-Gen gateway (UXG): gateway plus switch ports.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Uxg {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub upgradable: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default, rename = "user-num_sta")]
    pub user_num_sta: Flex,
    #[serde(default, rename = "guest-num_sta")]
    pub guest_num_sta: Flex,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub stat: DeviceStat,
    #[serde(default)]
    pub wan1: Wan,
    #[serde(default)]
    pub wan2: Wan,
    #[serde(default)]
    pub speedtest_status: SpeedtestStatus,
    #[serde(default)]
    pub port_table: Vec<Port>,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// UniFi device bridge (UDB).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Udb {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub uplink: Uplink,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// UniFi console integration device (UCI).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Uci {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// UniFi building-to-building bridge (UBB).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ubb {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub uplink: Uplink,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// UniFi smart power distribution unit (PDU): a switch with outlets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pdu {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub mac: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial: String,
    #[serde(default)]
    pub version: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub adopted: bool,
    #[serde(default)]
    pub locating: bool,
    #[serde(default)]
    pub upgradable: bool,
    #[serde(default)]
    pub state: Flex,
    #[serde(default)]
    pub uptime: Flex,
    #[serde(default)]
    pub last_seen: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub rx_bytes: Flex,
    #[serde(default)]
    pub tx_bytes: Flex,
    #[serde(default)]
    pub num_sta: Flex,
    #[serde(default, rename = "user-num_sta")]
    pub user_num_sta: Flex,
    #[serde(default, rename = "guest-num_sta")]
    pub guest_num_sta: Flex,
    #[serde(default)]
    pub total_max_power: Flex,
    #[serde(default)]
    pub outlet_ac_power_budget: Flex,
    #[serde(default)]
    pub outlet_ac_power_consumption: Flex,
    #[serde(default)]
    pub outlet_enabled: bool,
    #[serde(default)]
    pub sys_stats: SysStats,
    #[serde(default)]
    pub system_stats: SystemStats,
    #[serde(default)]
    pub stat: DeviceStat,
    #[serde(default)]
    pub port_table: Vec<Port>,
    #[serde(default)]
    pub outlet_table: Vec<Outlet>,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

/// A neighboring AP observed (but not managed) by the controller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RogueAp {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub ap_mac: String,
    #[serde(default)]
    pub bssid: String,
    #[serde(default)]
    pub essid: String,
    #[serde(default)]
    pub oui: String,
    #[serde(default)]
    pub band: String,
    #[serde(default)]
    pub radio: String,
    #[serde(default)]
    pub radio_name: String,
    #[serde(default)]
    pub security: String,
    #[serde(default)]
    pub is_ubnt: bool,
    #[serde(default)]
    pub age: Flex,
    #[serde(default)]
    pub bw: Flex,
    #[serde(default)]
    pub center_freq: Flex,
    #[serde(default)]
    pub channel: Flex,
    #[serde(default)]
    pub freq: Flex,
    #[serde(default)]
    pub noise: Flex,
    #[serde(default)]
    pub rssi: Flex,
    #[serde(default)]
    pub rssi_age: Flex,
    #[serde(default)]
    pub signal: Flex,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}
