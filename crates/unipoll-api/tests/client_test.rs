// Integration tests for `UnifiClient` using wiremock.

use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use unipoll_api::models::Site;
use unipoll_api::{Auth, Error, TransportConfig, UnifiClient};

// ── Helpers ─────────────────────────────────────────────────────────

fn ok_envelope(data: serde_json::Value) -> serde_json::Value {
    json!({ "meta": { "rc": "ok" }, "data": data })
}

async fn mock_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([]))))
        .mount(server)
        .await;
}

async fn connect(server: &MockServer) -> UnifiClient {
    let auth = Auth::Credentials {
        username: "unipoll".into(),
        password: SecretString::from("secret".to_string()),
    };

    UnifiClient::connect(
        server.uri().parse().unwrap(),
        auth,
        &TransportConfig::default(),
    )
    .await
    .unwrap()
}

fn test_site() -> Site {
    Site {
        name: "default".into(),
        site_name: "Default (default)".into(),
        source_name: "https://controller.example/".into(),
        ..Site::default()
    }
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_rejection_is_an_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let auth = Auth::Credentials {
        username: "unipoll".into(),
        password: SecretString::from("wrong".to_string()),
    };

    let err = UnifiClient::connect(
        server.uri().parse().unwrap(),
        auth,
        &TransportConfig::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::Authentication { .. }));
    assert!(err.is_auth_expired());
}

// ── Envelope handling ───────────────────────────────────────────────

#[tokio::test]
async fn sites_are_unwrapped_and_stamped() {
    let server = MockServer::start().await;
    mock_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/stat/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            { "_id": "abc", "name": "default", "desc": "Home" },
            { "_id": "def", "name": "branch", "desc": "" },
        ]))))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let sites = client.get_sites().await.unwrap();

    assert_eq!(sites.len(), 2);
    assert_eq!(sites[0].site_name, "Home (default)");
    assert_eq!(sites[1].site_name, "branch"); // empty desc falls back to slug
    assert!(sites[0].source_name.starts_with("http://127.0.0.1"));
}

#[tokio::test]
async fn non_ok_rc_is_an_api_error() {
    let server = MockServer::start().await;
    mock_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/stat/sites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.NoSiteContext" },
            "data": [],
        })))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client.get_sites().await.unwrap_err();

    match err {
        Error::Api { message } => assert_eq!(message, "api.err.NoSiteContext"),
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn mid_session_401_is_auth_expired() {
    let server = MockServer::start().await;
    mock_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/stat/sites"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let err = client.get_sites().await.unwrap_err();
    assert!(err.is_auth_expired());
}

// ── Device decoding ─────────────────────────────────────────────────

#[tokio::test]
async fn mixed_device_array_splits_by_family() {
    let server = MockServer::start().await;
    mock_login(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            { "type": "uap", "mac": "aa:aa", "name": "attic-ap", "adopted": true,
              "vap_table": [{ "bssid": "aa:ab", "radio": "ng", "radio_name": "wifi0" }] },
            { "type": "usw", "mac": "bb:bb", "name": "core-sw", "adopted": true,
              "port_table": [{ "port_idx": 1, "up": true, "enable": true, "rx_bytes": "123" }] },
            { "type": "ugw", "mac": "cc:cc", "name": "gw", "adopted": true },
            { "type": "udm", "mac": "dd:dd", "name": "dm", "adopted": true },
            { "type": "hologram", "mac": "ee:ee" },
        ]))))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let devices = client.get_devices(&[test_site()]).await.unwrap();

    // The unknown "hologram" device is skipped, not fatal.
    assert_eq!(devices.len(), 4);
    assert_eq!(devices.uaps.len(), 1);
    assert_eq!(devices.usws.len(), 1);
    assert_eq!(devices.usgs.len(), 1);
    assert_eq!(devices.udms.len(), 1);

    assert_eq!(devices.uaps[0].site_name, "Default (default)");
    assert_eq!(devices.usws[0].port_table[0].rx_bytes.val, 123.0);
    assert_eq!(devices.uaps[0].vap_table[0].radio_name, "wifi0");
}

// ── Events ──────────────────────────────────────────────────────────

#[tokio::test]
async fn events_request_carries_window_and_limit() {
    let server = MockServer::start().await;
    mock_login(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/s/default/stat/event"))
        .and(body_partial_json(json!({ "within": 1 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_envelope(json!([
            { "key": "EVT_AP_Connected", "msg": "AP connected",
              "datetime": "2026-01-02T03:04:05Z", "time": 1_767_323_045_000_i64 },
        ]))))
        .mount(&server)
        .await;

    let client = connect(&server).await;
    let events = client.get_site_events(&test_site(), 1).await.unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].key, "EVT_AP_Connected");
    assert_eq!(events[0].datetime().to_rfc3339(), "2026-01-02T03:04:05+00:00");
}
