// Site endpoints
//
// Sites are the root of every other query: clients, devices, and event
// fetches all iterate the site list the caller provides.

use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;
use crate::models::{DpiTable, Site};

impl UnifiClient {
    /// List all sites on the controller.
    ///
    /// `GET /api/stat/sites`
    pub async fn get_sites(&self) -> Result<Vec<Site>, Error> {
        let url = self.api_url("stat/sites")?;
        let mut sites: Vec<Site> = self.get(url).await?;

        for site in &mut sites {
            site.source_name = self.base_url().to_string();
            // The description is the human name; fall back to the slug.
            site.site_name = if site.desc.is_empty() {
                site.name.clone()
            } else {
                format!("{} ({})", site.desc, site.name)
            };
        }

        debug!(count = sites.len(), "fetched sites");

        Ok(sites)
    }

    /// Fetch the per-application/per-category DPI rollup for each site.
    ///
    /// `POST /api/s/{site}/stat/sitedpi`
    pub async fn get_site_dpi(&self, sites: &[Site]) -> Result<Vec<DpiTable>, Error> {
        let mut tables = Vec::new();

        for site in sites {
            let url = self.site_url(&site.name, "stat/sitedpi")?;
            let body = serde_json::json!({ "type": "by_app" });
            let mut fetched: Vec<DpiTable> = self.post(url, &body).await?;

            for table in &mut fetched {
                table.site_name = site.site_name.clone();
                table.source_name = site.source_name.clone();
            }

            tables.append(&mut fetched);
        }

        Ok(tables)
    }
}
