// Event-log batchers: one table per record variant, dispatched by
// exhaustive match. Records older than the report's cutoff are ignored,
// and zero-valued fields are dropped from the event taxonomy to keep
// downstream cardinality bounded.

use std::collections::BTreeMap;

use unipoll_api::models::{Alarm, Anomaly, EventRecord, IdsRecord, IpGeo};
use unipoll_core::point::{fields, tags};
use unipoll_core::{FieldValue, ItemKind, LogRecord, Point};

use crate::report::Report;

/// Route one log record to its batcher.
pub(crate) async fn log_record(r: &Report, record: &LogRecord) {
    match record {
        LogRecord::Event(e) => event(r, e).await,
        LogRecord::Ids(e) => ids(r, e).await,
        LogRecord::Alarm(e) => alarm(r, e).await,
        LogRecord::Anomaly(e) => anomaly(r, e).await,
        // Protect logs are log-stream material; the metrics sink has no
        // table for them.
        LogRecord::Protect(_) => {}
    }
}

/// Drop zero-valued scalars; the event tables otherwise explode with
/// empty strings and zeroes for fields that rarely apply.
fn clean_fields(map: BTreeMap<String, FieldValue>) -> BTreeMap<String, FieldValue> {
    map.into_iter().filter(|(_, v)| !v.is_zero()).collect()
}

fn geo_fields(prefix: &str, geo: &IpGeo) -> BTreeMap<String, FieldValue> {
    let mut map = BTreeMap::new();
    map.insert(format!("{prefix}_asn"), geo.asn.into());
    map.insert(format!("{prefix}_latitude"), geo.latitude.into());
    map.insert(format!("{prefix}_longitude"), geo.longitude.into());
    map.insert(format!("{prefix}_city"), geo.city.as_str().into());
    map.insert(
        format!("{prefix}_continent_code"),
        geo.continent_code.as_str().into(),
    );
    map.insert(
        format!("{prefix}_country_code"),
        geo.country_code.as_str().into(),
    );
    map.insert(
        format!("{prefix}_country_name"),
        geo.country_name.as_str().into(),
    );
    map.insert(
        format!("{prefix}_organization"),
        geo.organization.as_str().into(),
    );

    map
}

async fn event(r: &Report, e: &EventRecord) {
    if e.datetime() < r.oldest {
        return; // The event is older than our interval, ignore it.
    }

    let mut point = Point::new("unifi_events");
    point.ts = Some(e.datetime());
    point.tags = tags([
        ("admin", e.admin.clone()),
        ("site_name", e.site_name.clone()),
        ("source", e.source_name.clone()),
        ("ap", e.ap.clone()),
        ("gw", e.gw.clone()),
        ("sw", e.sw.clone()),
        ("catname", e.catname.clone()),
        ("radio", e.radio.clone()),
        ("radio_from", e.radio_from.clone()),
        ("radio_to", e.radio_to.clone()),
        ("key", e.key.clone()),
        ("subsystem", e.subsystem.clone()),
        ("ssid", e.ssid.clone()),
        ("event_type", e.event_type.clone()),
    ]);
    point.fields = clean_fields(
        [
            fields([
                ("msg", e.msg.as_str().into()),
                ("duration", e.duration.into()),
                ("guest", e.guest.as_str().into()),
                ("user", e.user.as_str().into()),
                ("host", e.host.as_str().into()),
                ("hostname", e.hostname.as_str().into()),
                ("dest_port", e.dest_port.into()),
                ("src_port", e.src_port.into()),
                ("bytes", e.bytes.into()),
                ("dest_ip", e.dest_ip.as_str().into()),
                ("dst_mac", e.dst_mac.as_str().into()),
                ("ip", e.ip.as_str().into()),
                ("src_ip", e.src_ip.as_str().into()),
                ("src_mac", e.src_mac.as_str().into()),
                ("channel", e.channel.into()),
                ("channel_from", e.channel_from.into()),
                ("channel_to", e.channel_to.into()),
            ]),
            geo_fields("dstip", &e.dest_ip_geo),
            geo_fields("srcip", &e.source_ip_geo),
        ]
        .into_iter()
        .flatten()
        .collect(),
    );

    r.count(ItemKind::Event);
    r.send(point).await;
}

async fn ids(r: &Report, e: &IdsRecord) {
    if e.datetime() < r.oldest {
        return;
    }

    let mut point = Point::new("unifi_ids");
    point.ts = Some(e.datetime());
    point.tags = tags([
        ("site_name", e.site_name.clone()),
        ("source", e.source_name.clone()),
        ("in_iface", e.in_iface.clone()),
        ("event_type", e.event_type.clone()),
        ("subsystem", e.subsystem.clone()),
        ("archived", e.archived.to_string()),
        ("usgip", e.usgip.clone()),
        ("proto", e.proto.clone()),
        ("key", e.key.clone()),
        ("catname", e.catname.clone()),
        ("app_proto", e.app_proto.clone()),
        ("action", e.inner_alert_action.clone()),
    ]);
    point.fields = clean_fields(
        [
            fields([
                ("msg", e.msg.as_str().into()),
                ("dest_port", e.dest_port.into()),
                ("src_port", e.src_port.into()),
                ("dest_ip", e.dest_ip.as_str().into()),
                ("dst_mac", e.dst_mac.as_str().into()),
                ("src_ip", e.src_ip.as_str().into()),
                ("src_mac", e.src_mac.as_str().into()),
                ("inner_alert_category", e.inner_alert_category.as_str().into()),
                ("inner_alert_signature", e.inner_alert_signature.as_str().into()),
                ("inner_alert_gid", e.inner_alert_gid.into()),
                ("inner_alert_rev", e.inner_alert_rev.into()),
                ("inner_alert_severity", e.inner_alert_severity.into()),
                ("inner_alert_signature_id", e.inner_alert_signature_id.into()),
            ]),
            geo_fields("dstip", &e.dest_ip_geo),
            geo_fields("srcip", &e.source_ip_geo),
        ]
        .into_iter()
        .flatten()
        .collect(),
    );

    r.count(ItemKind::Ids);
    r.send(point).await;
}

async fn alarm(r: &Report, e: &Alarm) {
    if e.datetime() < r.oldest {
        return;
    }

    let mut point = Point::new("unifi_alarm");
    point.ts = Some(e.datetime());
    point.tags = tags([
        ("site_name", e.site_name.clone()),
        ("source", e.source_name.clone()),
        ("in_iface", e.in_iface.clone()),
        ("event_type", e.event_type.clone()),
        ("subsystem", e.subsystem.clone()),
        ("archived", e.archived.to_string()),
        ("proto", e.proto.clone()),
        ("key", e.key.clone()),
        ("catname", e.catname.clone()),
        ("app_proto", e.app_proto.clone()),
    ]);
    point.fields = clean_fields(
        [
            fields([
                ("msg", e.msg.as_str().into()),
                ("device_name", e.device_name.as_str().into()),
                ("dest_port", e.dest_port.into()),
                ("src_port", e.src_port.into()),
                ("dest_ip", e.dest_ip.as_str().into()),
                ("dst_mac", e.dst_mac.as_str().into()),
                ("src_ip", e.src_ip.as_str().into()),
                ("src_mac", e.src_mac.as_str().into()),
            ]),
            geo_fields("dstip", &e.dest_ip_geo),
            geo_fields("srcip", &e.source_ip_geo),
        ]
        .into_iter()
        .flatten()
        .collect(),
    );

    r.count(ItemKind::Alarm);
    r.send(point).await;
}

async fn anomaly(r: &Report, e: &Anomaly) {
    if e.datetime() < r.oldest {
        return;
    }

    let mut point = Point::new("unifi_anomaly");
    point.ts = Some(e.datetime());
    point.tags = tags([
        ("site_name", e.site_name.clone()),
        ("source", e.source_name.clone()),
        ("device_mac", e.device_mac.clone()),
    ]);
    point.fields = fields([("anomaly", e.anomaly.as_str().into())]);

    r.count(ItemKind::Anomaly);
    r.send(point).await;
}
