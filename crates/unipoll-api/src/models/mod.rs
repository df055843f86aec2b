// Wire models for the UniFi legacy API.
//
// Fields use `#[serde(default)]` liberally because the API is
// inconsistent about field presence across firmware versions. Each
// model carries `site_name` and `source_name`, filled in by the
// endpoint methods after decoding (the wire never includes them).

pub mod client;
pub mod device;
pub mod dpi;
pub mod event;
pub mod site;

mod flex;

pub use client::ClientStation;
pub use device::{
    ApStat, DeviceList, DeviceStat, GwStat, Outlet, Pdu, Port, RadioStat, RogueAp,
    SpeedtestStatus, SwStat, SysStats, SystemStats, Uap, Ubb, Uci, Udb, Udm, Uplink, Usg, Usw,
    Uxg, Vap, Wan,
};
pub use dpi::{DpiEntry, DpiTable};
pub use event::{Alarm, Anomaly, EventRecord, IdsRecord, IpGeo, ProtectLogEntry};
pub use flex::Flex;
pub use site::{Site, SiteHealth};
