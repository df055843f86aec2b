// Event-log endpoints: site events, IDS records, alarms, anomalies,
// and Protect activity logs.

use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;
use crate::models::{Alarm, Anomaly, EventRecord, IdsRecord, ProtectLogEntry, Site};

const EVENT_LIMIT: u32 = 1000;

impl UnifiClient {
    /// Fetch recent events for one site, looking back `hours`.
    ///
    /// `POST /api/s/{site}/stat/event`
    pub async fn get_site_events(
        &self,
        site: &Site,
        hours: i64,
    ) -> Result<Vec<EventRecord>, Error> {
        let url = self.site_url(&site.name, "stat/event")?;
        let body = serde_json::json!({ "_limit": EVENT_LIMIT, "within": hours, "_sort": "-time" });
        let mut events: Vec<EventRecord> = self.post(url, &body).await?;

        for e in &mut events {
            e.site_name = site.site_name.clone();
            e.source_name = site.source_name.clone();
        }

        debug!(site = %site.name, count = events.len(), "fetched events");

        Ok(events)
    }

    /// Fetch intrusion detection records for one site.
    ///
    /// `POST /api/s/{site}/stat/ips/event`
    pub async fn get_ids_site(&self, site: &Site) -> Result<Vec<IdsRecord>, Error> {
        let url = self.site_url(&site.name, "stat/ips/event")?;
        let body = serde_json::json!({ "_limit": EVENT_LIMIT });
        let mut records: Vec<IdsRecord> = self.post(url, &body).await?;

        for r in &mut records {
            r.site_name = site.site_name.clone();
            r.source_name = site.source_name.clone();
        }

        Ok(records)
    }

    /// Fetch unarchived alarms for one site.
    ///
    /// `GET /api/s/{site}/list/alarm`
    pub async fn get_alarms_site(&self, site: &Site) -> Result<Vec<Alarm>, Error> {
        let url = self.site_url(&site.name, "list/alarm")?;
        let mut alarms: Vec<Alarm> = self.get(url).await?;

        for a in &mut alarms {
            a.site_name = site.site_name.clone();
            a.source_name = site.source_name.clone();
        }

        Ok(alarms)
    }

    /// Fetch anomaly records for one site.
    ///
    /// `GET /api/s/{site}/stat/anomalies`
    pub async fn get_anomalies_site(&self, site: &Site) -> Result<Vec<Anomaly>, Error> {
        let url = self.site_url(&site.name, "stat/anomalies")?;
        let mut anomalies: Vec<Anomaly> = self.get(url).await?;

        for a in &mut anomalies {
            a.site_name = site.site_name.clone();
            a.source_name = site.source_name.clone();
        }

        Ok(anomalies)
    }

    /// Fetch UniFi Protect activity logs, when the console runs Protect.
    ///
    /// `GET /proxy/protect/api/events` -- consoles without Protect answer
    /// 404, which callers should treat as "no logs", not a failure.
    pub async fn get_protect_logs(&self) -> Result<Vec<ProtectLogEntry>, Error> {
        let raw = self.get_json("proxy/protect/api/events").await?;

        let mut entries: Vec<ProtectLogEntry> =
            serde_json::from_slice(&raw).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body: String::from_utf8_lossy(&raw).into_owned(),
            })?;

        for e in &mut entries {
            e.source_name = self.base_url().to_string();
        }

        Ok(entries)
    }
}
