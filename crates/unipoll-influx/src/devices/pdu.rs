use unipoll_api::models::Pdu;
use unipoll_core::point::{combine, fields, tags};
use unipoll_core::{ItemKind, Point};

use super::{identity_tags, port_points, sw_stat_fields, sys_stats_fields};
use crate::report::Report;

/// Batch one smart PDU: the device point, one point per outlet, and the
/// switch port table it also carries.
pub(crate) async fn pdu(r: &Report, d: &Pdu) {
    if !d.adopted || d.locating {
        return;
    }

    let device_tags = identity_tags(
        &d.mac,
        &d.site_name,
        &d.source_name,
        &d.name,
        &d.version,
        &d.model,
        &d.serial,
        &d.kind,
    );

    let mut point = Point::new("pdu");
    point.tags = device_tags.clone();
    point.fields = combine([
        sw_stat_fields(d.stat.sw.as_ref()),
        sys_stats_fields(&d.sys_stats, &d.system_stats),
        fields([
            ("ip", d.ip.as_str().into()),
            ("bytes", d.bytes.into()),
            ("last_seen", d.last_seen.into()),
            ("rx_bytes", d.rx_bytes.into()),
            ("tx_bytes", d.tx_bytes.into()),
            ("uptime", d.uptime.into()),
            ("state", d.state.into()),
            ("user-num_sta", d.user_num_sta.into()),
            ("guest-num_sta", d.guest_num_sta.into()),
            ("upgradeable", d.upgradable.into()),
            ("total_max_power", d.total_max_power.into()),
            ("outlet_ac_power_budget", d.outlet_ac_power_budget.into()),
            ("outlet_ac_power_consumption", d.outlet_ac_power_consumption.into()),
            ("outlet_enabled", d.outlet_enabled.into()),
        ]),
    ]);

    r.count(ItemKind::Pdu);
    r.send(point).await;

    for outlet in &d.outlet_table {
        let mut point = Point::new("pdu.outlet_table");
        point.tags = tags([
            ("device_name", d.name.clone()),
            ("site_name", d.site_name.clone()),
            ("source", d.source_name.clone()),
            ("name", outlet.name.clone()),
            ("index", outlet.index.txt()),
            ("relay_state", outlet.relay_state.to_string()),
            ("cycle_enabled", outlet.cycle_enabled.to_string()),
        ]);
        point.fields = fields([
            ("outlet_caps", outlet.outlet_caps.into()),
            ("outlet_current", outlet.outlet_current.into()),
            ("outlet_power", outlet.outlet_power.into()),
            ("outlet_power_factor", outlet.outlet_power_factor.into()),
            ("outlet_voltage", outlet.outlet_voltage.into()),
        ]);

        r.send(point).await;
    }

    port_points(r, &device_tags, &d.port_table).await;
}
