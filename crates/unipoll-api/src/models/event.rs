use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::Flex;

fn millis_to_datetime(ms: &Flex) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms.as_i64())
        .single()
        .unwrap_or_default()
}

/// GeoIP block attached to IDS/event records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct IpGeo {
    #[serde(default)]
    pub asn: Flex,
    #[serde(default)]
    pub latitude: Flex,
    #[serde(default)]
    pub longitude: Flex,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub continent_code: String,
    #[serde(default)]
    pub country_code: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub organization: String,
}

impl IpGeo {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A site event from `stat/event`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventRecord {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time: Flex,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub subsystem: String,
    #[serde(default)]
    pub admin: String,
    #[serde(default)]
    pub ap: String,
    #[serde(default)]
    pub gw: String,
    #[serde(default)]
    pub sw: String,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub network: String,
    #[serde(default)]
    pub ssid: String,
    #[serde(default)]
    pub radio: String,
    #[serde(default)]
    pub radio_from: String,
    #[serde(default)]
    pub radio_to: String,
    #[serde(default)]
    pub channel: Flex,
    #[serde(default)]
    pub channel_from: Flex,
    #[serde(default)]
    pub channel_to: Flex,
    #[serde(default)]
    pub duration: Flex,
    #[serde(default)]
    pub bytes: Flex,
    #[serde(default)]
    pub guest: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub src_mac: String,
    #[serde(default)]
    pub dst_mac: String,
    #[serde(default)]
    pub dest_ip: String,
    #[serde(default)]
    pub src_ip: String,
    #[serde(default)]
    pub dest_port: Flex,
    #[serde(default)]
    pub src_port: Flex,
    #[serde(default)]
    pub proto: String,
    #[serde(default)]
    pub app_proto: String,
    #[serde(default)]
    pub catname: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub dest_ip_geo: IpGeo,
    #[serde(default)]
    pub source_ip_geo: IpGeo,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

impl EventRecord {
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime.unwrap_or_else(|| millis_to_datetime(&self.time))
    }
}

/// An intrusion detection record from `stat/ips/event`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdsRecord {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time: Flex,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub subsystem: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub app_proto: String,
    #[serde(default)]
    pub catname: String,
    #[serde(default)]
    pub proto: String,
    #[serde(default)]
    pub in_iface: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub src_mac: String,
    #[serde(default)]
    pub dst_mac: String,
    #[serde(default)]
    pub dest_ip: String,
    #[serde(default)]
    pub src_ip: String,
    #[serde(default)]
    pub dest_port: Flex,
    #[serde(default)]
    pub src_port: Flex,
    #[serde(default)]
    pub usgip: String,
    #[serde(default)]
    pub inner_alert_action: String,
    #[serde(default)]
    pub inner_alert_category: String,
    #[serde(default)]
    pub inner_alert_signature: String,
    #[serde(default)]
    pub inner_alert_gid: Flex,
    #[serde(default)]
    pub inner_alert_rev: Flex,
    #[serde(default)]
    pub inner_alert_severity: Flex,
    #[serde(default)]
    pub inner_alert_signature_id: Flex,
    #[serde(default)]
    pub dest_ip_geo: IpGeo,
    #[serde(default)]
    pub source_ip_geo: IpGeo,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

impl IdsRecord {
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime.unwrap_or_else(|| millis_to_datetime(&self.time))
    }
}

/// An alarm from `list/alarm`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alarm {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time: Flex,
    #[serde(default)]
    pub site_id: String,
    #[serde(default)]
    pub subsystem: String,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub catname: String,
    #[serde(default)]
    pub app_proto: String,
    #[serde(default)]
    pub proto: String,
    #[serde(default)]
    pub in_iface: String,
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub src_mac: String,
    #[serde(default)]
    pub dst_mac: String,
    #[serde(default)]
    pub dest_ip: String,
    #[serde(default)]
    pub src_ip: String,
    #[serde(default)]
    pub dest_port: Flex,
    #[serde(default)]
    pub src_port: Flex,
    #[serde(default)]
    pub dest_ip_geo: IpGeo,
    #[serde(default)]
    pub source_ip_geo: IpGeo,
    /// Filled by the input plugin when a device MAC in the message matches.
    #[serde(default)]
    pub device_name: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

impl Alarm {
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime.unwrap_or_else(|| millis_to_datetime(&self.time))
    }
}

/// An anomaly record from `stat/anomalies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Anomaly {
    #[serde(default)]
    pub anomaly: String,
    #[serde(default)]
    pub datetime: Option<DateTime<Utc>>,
    #[serde(default, rename = "timestamp")]
    pub time: Flex,
    #[serde(default)]
    pub device_mac: String,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

impl Anomaly {
    pub fn datetime(&self) -> DateTime<Utc> {
        self.datetime.unwrap_or_else(|| millis_to_datetime(&self.time))
    }
}

/// A UniFi Protect activity log entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtectLogEntry {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub camera: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "start")]
    pub time: Flex,
    #[serde(default)]
    pub site_name: String,
    #[serde(default)]
    pub source_name: String,
}

impl ProtectLogEntry {
    pub fn datetime(&self) -> DateTime<Utc> {
        millis_to_datetime(&self.time)
    }
}
