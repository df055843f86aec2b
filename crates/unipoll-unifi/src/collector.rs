// ── Controller pool: sessions, site filters, and snapshot assembly ──
//
// One poll is a single pass: fetch sites, filter them, then fetch the
// per-flag payloads. A transport/auth failure mid-poll clears the
// session and retries exactly once; a second failure surfaces.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use unipoll_api::models::Site;
use unipoll_api::{TlsMode, TransportConfig, UnifiClient};
use unipoll_core::{Filter, PollerError, Snapshot};

use crate::pii::{redact_mac, redact_name};
use crate::webview;
use crate::{Controller, InputUnifi, PLUGIN_NAME};

impl InputUnifi {
    /// (Re-)authenticate to a controller, replacing any prior session,
    /// then verify the configured site filter against reality.
    pub(crate) async fn authenticate(&self, c: &Controller) -> Result<(), PollerError> {
        // Drop the old session before building the new one.
        *c.session.write().await = None;

        let tls = if !c.config.cert_paths.is_empty() {
            TlsMode::Pinned(c.config.cert_paths.clone())
        } else if c.config.verify_ssl {
            TlsMode::System
        } else {
            TlsMode::DangerAcceptInvalid
        };

        let transport = TransportConfig {
            tls,
            ..TransportConfig::default()
        };

        let client =
            UnifiClient::connect(c.config.url.clone(), c.config.auth.clone(), &transport)
                .await?;

        debug!(url = %c.config.url, "authenticated with controller");

        let client = Arc::new(client);
        *c.session.write().await = Some(Arc::clone(&client));

        self.verify_sites(c, &client).await
    }

    /// Check the configured site list against the controller's real one.
    /// Unknown names are logged and dropped; an empty result (and the
    /// "all" sentinel) collapses the filter to "all".
    async fn verify_sites(&self, c: &Controller, client: &UnifiClient) -> Result<(), PollerError> {
        let sites = client.get_sites().await?;

        let found: Vec<String> = sites
            .iter()
            .map(|s| format!("{} ({})", s.name, s.desc))
            .collect();
        info!(
            url = %c.config.url,
            "found {} site(s) on controller: {}",
            sites.len(),
            found.join(", ")
        );

        if c.config.sites.iter().any(|s| s.eq_ignore_ascii_case("all")) {
            *c.site_filter.write().await = vec!["all".to_owned()];
            return Ok(());
        }

        let mut keep = Vec::new();
        for wanted in &c.config.sites {
            if sites.iter().any(|s| &s.name == wanted) {
                keep.push(wanted.clone());
            } else {
                warn!(url = %c.config.url, site = wanted, "configured site not found on controller");
            }
        }

        if keep.is_empty() {
            keep = vec!["all".to_owned()];
        }

        *c.site_filter.write().await = keep;

        Ok(())
    }

    /// The site list a poll should iterate: everything the controller
    /// has, minus sites outside the verified filter.
    async fn filtered_sites(
        &self,
        c: &Controller,
        client: &UnifiClient,
    ) -> Result<Vec<Site>, PollerError> {
        let sites = client.get_sites().await?;
        let filter = c.site_filter.read().await;

        if filter.is_empty() || filter.iter().any(|s| s.eq_ignore_ascii_case("all")) {
            return Ok(sites);
        }

        Ok(sites
            .into_iter()
            .filter(|s| filter.iter().any(|f| f == &s.name))
            .collect())
    }

    /// Grab a session handle, authenticating first when there is none.
    pub(crate) async fn session(&self, c: &Controller) -> Result<Arc<UnifiClient>, PollerError> {
        if let Some(client) = c.session.read().await.clone() {
            return Ok(client);
        }

        info!(url = %c.config.url, "re-authenticating to UniFi controller");
        self.authenticate(c).await?;

        c.session
            .read()
            .await
            .clone()
            .ok_or_else(|| PollerError::Internal("session vanished after authenticate".into()))
    }

    /// Collect one controller's snapshot, retrying once through a fresh
    /// session when the poll fails.
    pub(crate) async fn collect_controller(
        &self,
        c: &Controller,
    ) -> Result<Snapshot, PollerError> {
        debug!(controller = c.config.id, "collecting controller data");

        let client = self.session(c).await?;

        match self.poll_controller(c, &client).await {
            Ok(snapshot) => Ok(snapshot),
            Err(first) => {
                info!(
                    url = %c.config.url,
                    error = %first,
                    "poll failed; re-authenticating to UniFi controller"
                );
                *c.session.write().await = None;

                let client = self.session(c).await?;
                self.poll_controller(c, &client).await
            }
        }
    }

    /// One pass over a controller: filtered sites, then the per-flag
    /// payloads, then augmentation.
    async fn poll_controller(
        &self,
        c: &Controller,
        client: &UnifiClient,
    ) -> Result<Snapshot, PollerError> {
        debug!(controller = c.config.id, "polling controller");

        let sites = self.filtered_sites(c, client).await?;

        let mut snapshot = Snapshot {
            ts: Utc::now(),
            sites,
            ..Snapshot::default()
        };

        if c.config.save_rogue {
            snapshot.rogue_aps = client.get_rogue_aps(&snapshot.sites).await?;
            debug!(count = snapshot.rogue_aps.len(), "found rogue AP entries");
        }

        if c.config.save_dpi {
            snapshot.sites_dpi = client.get_site_dpi(&snapshot.sites).await?;
            snapshot.clients_dpi = client.get_clients_dpi(&snapshot.sites).await?;
            debug!(
                sites = snapshot.sites_dpi.len(),
                clients = snapshot.clients_dpi.len(),
                "found DPI tables"
            );
        }

        snapshot.clients = client.get_clients(&snapshot.sites).await?;
        debug!(count = snapshot.clients.len(), "found client entries");

        let devices = client.get_devices(&snapshot.sites).await?;
        debug!(
            uap = devices.uaps.len(),
            usw = devices.usws.len(),
            usg = devices.usgs.len(),
            udm = devices.udms.len(),
            "found devices"
        );
        snapshot.devices = Some(devices);

        self.augment(c, &mut snapshot);
        webview::update_web(c, &snapshot);

        Ok(snapshot)
    }

    /// The middleware layer between collecting and writing: fill in
    /// parent-device names on clients, mask PII, and honor save_sites.
    /// Applying this twice yields the same result.
    pub(crate) fn augment(&self, c: &Controller, snapshot: &mut Snapshot) {
        let (device_names, bssid_radios) = extract_devices(snapshot);

        let mut client_names: HashMap<String, String> = HashMap::new();
        for client in &snapshot.clients {
            let label = if client.name.is_empty() {
                client.hostname.clone()
            } else {
                client.name.clone()
            };
            client_names.insert(client.mac.clone(), label);
        }

        for client in &mut snapshot.clients {
            // These come blank from the controller; set them here.
            client.sw_name = device_names.get(&client.sw_mac).cloned().unwrap_or_default();
            client.ap_name = device_names.get(&client.ap_mac).cloned().unwrap_or_default();
            client.gw_name = device_names.get(&client.gw_mac).cloned().unwrap_or_default();
            client.radio_description = match bssid_radios.get(&client.bssid) {
                Some(desc) => format!("{desc}{}", client.radio_proto),
                None => client.radio_proto.clone(),
            };

            client.mac = redact_mac(&client.mac, c.config.hash_pii, c.config.drop_pii);
            client.name = redact_name(&client.name, c.config.hash_pii, c.config.drop_pii);
            client.hostname = redact_name(&client.hostname, c.config.hash_pii, c.config.drop_pii);
        }

        for table in &mut snapshot.clients_dpi {
            // DPI names also come blank; find them by MAC address.
            if table.name.is_empty() {
                table.name = client_names
                    .get(&table.mac)
                    .filter(|n| !n.is_empty())
                    .cloned()
                    .unwrap_or_else(|| table.mac.clone());
            }

            table.name = redact_name(&table.name, c.config.hash_pii, c.config.drop_pii);
            table.mac = redact_mac(&table.mac, c.config.hash_pii, c.config.drop_pii);
        }

        if !c.config.save_sites {
            snapshot.sites.clear();
            snapshot.sites_dpi.clear();
        }
    }

    /// Raw JSON passthrough for `--dumpjson`.
    pub(crate) async fn dump_json(
        &self,
        c: &Controller,
        filter: &Filter,
    ) -> Result<Vec<u8>, PollerError> {
        let client = self.session(c).await?;
        let sites = self.filtered_sites(c, &client).await?;

        match filter.kind.as_str() {
            "d" | "device" | "devices" => {
                let devices = client.get_devices(&sites).await?;
                serde_json::to_vec_pretty(&serde_json::json!({
                    "uaps": devices.uaps,
                    "usws": devices.usws,
                    "usgs": devices.usgs,
                    "udms": devices.udms,
                    "uxgs": devices.uxgs,
                    "udbs": devices.udbs,
                    "ucis": devices.ucis,
                    "ubbs": devices.ubbs,
                    "pdus": devices.pdus,
                }))
                .map_err(|e| PollerError::Internal(e.to_string()))
            }
            "c" | "client" | "clients" => {
                let clients = client.get_clients(&sites).await?;
                serde_json::to_vec_pretty(&clients)
                    .map_err(|e| PollerError::Internal(e.to_string()))
            }
            "o" | "other" => {
                eprintln!("[INFO] dumping path '{}':", filter.path);
                Ok(client.get_json(&filter.path).await?)
            }
            other => Err(PollerError::Input {
                input: PLUGIN_NAME.into(),
                message: format!("unknown dump kind {other:?}: use devices, clients, other"),
            }),
        }
    }
}

/// Build the mac→name and bssid→radio-description maps from every
/// device family that can parent a client.
fn extract_devices(
    snapshot: &Snapshot,
) -> (HashMap<String, String>, HashMap<String, String>) {
    let mut names = HashMap::new();
    let mut bssids = HashMap::new();

    let Some(devices) = snapshot.devices.as_ref() else {
        return (names, bssids);
    };

    for ap in &devices.uaps {
        names.insert(ap.mac.clone(), ap.name.clone());

        for vap in &ap.vap_table {
            bssids.insert(
                vap.bssid.clone(),
                format!("{} {} {}:", ap.name, vap.radio, vap.radio_name),
            );
        }
    }

    for d in &devices.usgs {
        names.insert(d.mac.clone(), d.name.clone());
    }
    for d in &devices.usws {
        names.insert(d.mac.clone(), d.name.clone());
    }
    for d in &devices.udms {
        names.insert(d.mac.clone(), d.name.clone());

        for vap in d.vap_table.iter().flatten() {
            bssids.insert(
                vap.bssid.clone(),
                format!("{} {} {}:", d.name, vap.radio, vap.radio_name),
            );
        }
    }
    for d in &devices.uxgs {
        names.insert(d.mac.clone(), d.name.clone());
    }
    for d in &devices.ubbs {
        names.insert(d.mac.clone(), d.name.clone());
    }
    for d in &devices.ucis {
        names.insert(d.mac.clone(), d.name.clone());
    }
    for d in &devices.pdus {
        names.insert(d.mac.clone(), d.name.clone());
    }

    (names, bssids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{resolve_controller, ControllerConfig};
    use unipoll_api::models::{ClientStation, DeviceList, Usw, Uap, Vap};

    fn test_controller(hash_pii: bool) -> Arc<Controller> {
        let config = ControllerConfig {
            url: "https://127.0.0.1:8443".into(),
            hash_pii: Some(hash_pii),
            ..ControllerConfig::default()
        };

        let resolved =
            resolve_controller(&config, &ControllerConfig::default()).expect("resolve");
        Controller::new(resolved)
    }

    fn snapshot_with_switch_client() -> Snapshot {
        let mut devices = DeviceList::default();
        devices.usws.push(Usw {
            mac: "aa:bb".into(),
            name: "core-sw".into(),
            ..Usw::default()
        });
        devices.uaps.push(Uap {
            mac: "cc:dd".into(),
            name: "attic-ap".into(),
            vap_table: vec![Vap {
                bssid: "cc:de".into(),
                radio: "na".into(),
                radio_name: "wifi1".into(),
                ..Vap::default()
            }],
            ..Uap::default()
        });

        Snapshot {
            clients: vec![ClientStation {
                mac: "11:22".into(),
                name: "laptop".into(),
                sw_mac: "aa:bb".into(),
                ap_mac: "cc:dd".into(),
                bssid: "cc:de".into(),
                radio_proto: "ax".into(),
                ..ClientStation::default()
            }],
            devices: Some(devices),
            ..Snapshot::default()
        }
    }

    #[test]
    fn augment_sets_parent_device_names() {
        let input = InputUnifi::default();
        let controller = test_controller(false);
        let mut snapshot = snapshot_with_switch_client();

        input.augment(&controller, &mut snapshot);

        let client = &snapshot.clients[0];
        assert_eq!(client.sw_name, "core-sw");
        assert_eq!(client.ap_name, "attic-ap");
        assert_eq!(client.radio_description, "attic-ap na wifi1:ax");
    }

    #[test]
    fn augment_is_idempotent() {
        let input = InputUnifi::default();
        let controller = test_controller(false);
        let mut snapshot = snapshot_with_switch_client();

        input.augment(&controller, &mut snapshot);
        let once = snapshot.clients[0].clone();

        input.augment(&controller, &mut snapshot);
        let twice = &snapshot.clients[0];

        assert_eq!(once.sw_name, twice.sw_name);
        assert_eq!(once.radio_description, twice.radio_description);
        assert_eq!(once.mac, twice.mac);
    }
}
