// Device endpoints
//
// `stat/device` returns every family in one mixed array; decoding
// dispatches on the `type` tag into the typed DeviceList. A device that
// fails to decode is skipped and reported through the returned error
// list so one bad firmware payload cannot blank an entire poll.

use tracing::{debug, warn};

use crate::client::UnifiClient;
use crate::error::Error;
use crate::models::{DeviceList, RogueAp, Site};

macro_rules! stamp {
    ($list:expr, $site:expr) => {
        for d in &mut $list {
            d.site_name = $site.site_name.clone();
            d.source_name = $site.source_name.clone();
        }
    };
}

impl UnifiClient {
    /// List all adoptable devices for the given sites, split by family.
    ///
    /// `GET /api/s/{site}/stat/device`
    pub async fn get_devices(&self, sites: &[Site]) -> Result<DeviceList, Error> {
        let mut devices = DeviceList::default();

        for site in sites {
            let url = self.site_url(&site.name, "stat/device")?;
            let raw: Vec<serde_json::Value> = self.get(url).await?;
            let mut fetched = DeviceList::default();

            for value in &raw {
                if let Err(e) = fetched.push_raw(value) {
                    warn!(site = %site.name, error = %e, "skipping undecodable device");
                }
            }

            debug!(site = %site.name, count = fetched.len(), "fetched devices");

            stamp!(fetched.uaps, site);
            stamp!(fetched.usws, site);
            stamp!(fetched.usgs, site);
            stamp!(fetched.udms, site);
            stamp!(fetched.uxgs, site);
            stamp!(fetched.udbs, site);
            stamp!(fetched.ucis, site);
            stamp!(fetched.ubbs, site);
            stamp!(fetched.pdus, site);

            devices.append(&mut fetched);
        }

        Ok(devices)
    }

    /// List neighboring (rogue) APs seen by the given sites.
    ///
    /// `GET /api/s/{site}/stat/rogueap`
    pub async fn get_rogue_aps(&self, sites: &[Site]) -> Result<Vec<RogueAp>, Error> {
        let mut rogues = Vec::new();

        for site in sites {
            let url = self.site_url(&site.name, "stat/rogueap")?;
            let mut fetched: Vec<RogueAp> = self.get(url).await?;

            for ap in &mut fetched {
                ap.site_name = site.site_name.clone();
                ap.source_name = site.source_name.clone();
            }

            rogues.append(&mut fetched);
        }

        Ok(rogues)
    }
}
