// Client (station) endpoints

use tracing::debug;

use crate::client::UnifiClient;
use crate::error::Error;
use crate::models::{ClientStation, DpiTable, Site};

impl UnifiClient {
    /// List the connected clients for each of the given sites.
    ///
    /// `GET /api/s/{site}/stat/sta`
    pub async fn get_clients(&self, sites: &[Site]) -> Result<Vec<ClientStation>, Error> {
        let mut clients = Vec::new();

        for site in sites {
            let url = self.site_url(&site.name, "stat/sta")?;
            let mut fetched: Vec<ClientStation> = self.get(url).await?;

            for client in &mut fetched {
                client.site_name = site.site_name.clone();
                client.source_name = site.source_name.clone();
                // Some firmwares report a client name only in `hostname`.
                if client.name.is_empty() {
                    client.name = client.hostname.clone();
                }
            }

            debug!(site = %site.name, count = fetched.len(), "fetched clients");
            clients.append(&mut fetched);
        }

        Ok(clients)
    }

    /// Fetch per-client DPI tables for each of the given sites.
    ///
    /// `POST /api/s/{site}/stat/stadpi`
    pub async fn get_clients_dpi(&self, sites: &[Site]) -> Result<Vec<DpiTable>, Error> {
        let mut tables = Vec::new();

        for site in sites {
            let url = self.site_url(&site.name, "stat/stadpi")?;
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
