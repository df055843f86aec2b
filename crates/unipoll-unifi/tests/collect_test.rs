// End-to-end input plugin tests against a mock controller: config
// binding, authentication, site filtering, and client augmentation.

use std::io::Write;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unipoll_core::{ConfigLoader, Filter, Input};
use unipoll_unifi::InputUnifi;

fn ok_envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "meta": { "rc": "ok" }, "data": data })
}

/// Mock a standalone controller with two sites; only site "alpha"
/// carries clients and devices.
async fn mock_controller() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/stat/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            { "_id": "s1", "name": "alpha", "desc": "Alpha Site" },
            { "_id": "s2", "name": "beta", "desc": "Beta Site" },
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/s/alpha/stat/sta"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            { "_id": "c1", "mac": "11:22:33:44:55:66", "hostname": "laptop",
              "sw_mac": "aa:bb:cc:dd:ee:ff", "is_wired": true },
        ]))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/s/alpha/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            { "type": "usw", "mac": "aa:bb:cc:dd:ee:ff", "name": "core-sw",
              "adopted": true },
        ]))))
        .mount(&server)
        .await;

    server
}

fn configure_plugin(server: &MockServer) -> std::sync::Arc<InputUnifi> {
    let mut conf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(
        conf,
        r#"
[unifi]
  [[unifi.controller]]
  url   = "{}"
  user  = "tester"
  pass  = "secret"
  sites = ["alpha", "zulu"]
"#,
        server.uri()
    )
    .expect("write config");

    let loader = ConfigLoader::from_file(conf.path());
    let plugin = InputUnifi::new();
    plugin.configure(&loader).expect("configure");

    plugin
}

#[tokio::test]
async fn unknown_sites_are_dropped_and_polls_stay_filtered() {
    let server = mock_controller().await;
    let plugin = configure_plugin(&server);

    // Initialization authenticates and verifies the site list; the
    // unknown "zulu" site is logged and dropped.
    plugin.initialize().await.expect("initialize");

    let snapshot = plugin.metrics(&Filter::default()).await.expect("metrics");

    assert_eq!(snapshot.sites.len(), 1);
    assert_eq!(snapshot.sites[0].name, "alpha");
    assert_eq!(snapshot.sites[0].site_name, "Alpha Site (alpha)");

    // The second poll still works with the same filter.
    let again = plugin.metrics(&Filter::default()).await.expect("metrics");
    assert_eq!(again.sites.len(), 1);
}

#[tokio::test]
async fn clients_are_augmented_with_parent_device_names() {
    let server = mock_controller().await;
    let plugin = configure_plugin(&server);
    plugin.initialize().await.expect("initialize");

    let snapshot = plugin.metrics(&Filter::default()).await.expect("metrics");

    assert_eq!(snapshot.clients.len(), 1);
    let client = &snapshot.clients[0];
    assert_eq!(client.name, "laptop"); // hostname promoted to name
    assert_eq!(client.sw_name, "core-sw"); // filled by augmentation

    let devices = snapshot.devices.expect("devices");
    assert_eq!(devices.usws.len(), 1);
}

#[tokio::test]
async fn events_are_empty_when_every_save_flag_is_off() {
    let server = mock_controller().await;
    let plugin = configure_plugin(&server);
    plugin.initialize().await.expect("initialize");

    // No save_* flag is set, so no event endpoint is even queried.
    let events = plugin.events(&Filter::default()).await.expect("events");
    assert!(events.logs.is_empty());
}
