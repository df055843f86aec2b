// Reformat polled data for the status web surface.
//
// Runs after every successful poll; all hooks are no-ops when the web
// surface is disabled.

use chrono::{TimeZone, Utc};

use unipoll_core::webserver::{self, InputUpdate, WebClient, WebDevice, WebSite};
use unipoll_core::Snapshot;

use crate::{Controller, InputUnifi, PLUGIN_NAME};

/// Publish a scrubbed view of the plugin config (no secrets).
pub(crate) fn publish_config(input: &InputUnifi) {
    let controllers: Vec<serde_json::Value> = input
        .controllers()
        .iter()
        .map(|c| {
            serde_json::json!({
                "id": c.config.id,
                "url": c.config.url.as_str(),
                "verify_ssl": c.config.verify_ssl,
                "sites": c.config.sites,
                "save_ids": c.config.save_ids,
                "save_events": c.config.save_events,
                "save_alarms": c.config.save_alarms,
                "save_anomalies": c.config.save_anomalies,
                "save_dpi": c.config.save_dpi,
                "save_rogue": c.config.save_rogue,
                "save_sites": c.config.save_sites,
            })
        })
        .collect();

    webserver::update_input(
        PLUGIN_NAME,
        InputUpdate {
            config: Some(serde_json::json!({ "controllers": controllers })),
            ..InputUpdate::default()
        },
    );
}

/// Refresh the site/device/client summaries for one controller's poll.
pub(crate) fn update_web(c: &Controller, snapshot: &Snapshot) {
    webserver::update_input(
        PLUGIN_NAME,
        InputUpdate {
            sites: Some(format_sites(c, snapshot)),
            devices: Some(format_devices(c, snapshot)),
            clients: Some(format_clients(c, snapshot)),
            ..InputUpdate::default()
        },
    );
}

fn format_sites(c: &Controller, snapshot: &Snapshot) -> Vec<WebSite> {
    snapshot
        .sites
        .iter()
        .map(|s| WebSite {
            id: s.id.clone(),
            name: s.name.clone(),
            desc: s.desc.clone(),
            source: s.source_name.clone(),
            controller: c.config.id.clone(),
        })
        .collect()
}

fn format_devices(c: &Controller, snapshot: &Snapshot) -> Vec<WebDevice> {
    let mut out = Vec::new();

    let Some(devices) = snapshot.devices.as_ref() else {
        return out;
    };

    macro_rules! push_family {
        ($out:expr, $controller:expr, $list:expr) => {
            for d in &$list {
                $out.push(WebDevice {
                    name: d.name.clone(),
                    site_id: d.site_id.clone(),
                    source: d.source_name.clone(),
                    controller: $controller.config.id.clone(),
                    mac: d.mac.clone(),
                    ip: d.ip.clone(),
                    kind: d.kind.clone(),
                    model: d.model.clone(),
                    version: d.version.clone(),
                    clients: d.num_sta.as_i64(),
                    uptime: d.uptime.as_i64(),
                });
            }
        };
    }

    push_family!(out, c, devices.uaps);
    push_family!(out, c, devices.usws);
    push_family!(out, c, devices.usgs);
    push_family!(out, c, devices.udms);
    push_family!(out, c, devices.uxgs);
    push_family!(out, c, devices.udbs);
    push_family!(out, c, devices.ubbs);
    push_family!(out, c, devices.pdus);

    for d in &devices.ucis {
        out.push(WebDevice {
            name: d.name.clone(),
            site_id: d.site_id.clone(),
            source: d.source_name.clone(),
            controller: c.config.id.clone(),
            mac: d.mac.clone(),
            ip: d.ip.clone(),
            kind: d.kind.clone(),
            model: d.model.clone(),
            version: d.version.clone(),
            clients: 0,
            uptime: d.uptime.as_i64(),
        });
    }

    out
}

fn format_clients(c: &Controller, snapshot: &Snapshot) -> Vec<WebClient> {
    snapshot
        .clients
        .iter()
        .map(|cl| {
            let device_mac = if cl.is_wired {
                cl.sw_mac.clone()
            } else {
                cl.ap_mac.clone()
            };

            WebClient {
                name: cl.name.clone(),
                site_id: cl.site_id.clone(),
                source: cl.source_name.clone(),
                controller: c.config.id.clone(),
                mac: cl.mac.clone(),
                ip: cl.ip.clone(),
                kind: if cl.is_wired { "wired" } else { "wireless" }.to_owned(),
                device_mac,
                rx_bytes: cl.rx_bytes.as_i64(),
                tx_bytes: cl.tx_bytes.as_i64(),
                since: Utc.timestamp_opt(cl.first_seen.as_i64(), 0).single(),
                last: Utc.timestamp_opt(cl.last_seen.as_i64(), 0).single(),
            }
        })
        .collect()
}
