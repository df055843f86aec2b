use unipoll_api::models::Udb;
use unipoll_core::point::{combine, fields};
use unipoll_core::{ItemKind, Point};

use super::{identity_tags, sys_stats_fields};
use crate::report::Report;

/// Batch one device bridge.
pub(crate) async fn udb(r: &Report, d: &Udb) {
    if !d.adopted || d.locating {
        return;
    }

    let mut point = Point::new("udb");
    point.tags = identity_tags(
        &d.mac,
        &d.site_name,
        &d.source_name,
        &d.name,
        &d.version,
        &d.model,
        &d.serial,
        &d.kind,
    );
    point.fields = combine([
        sys_stats_fields(&d.sys_stats, &d.system_stats),
        fields([
            ("ip", d.ip.as_str().into()),
            ("bytes", d.bytes.into()),
            ("last_seen", d.last_seen.into()),
            ("rx_bytes", d.rx_bytes.into()),
            ("tx_bytes", d.tx_bytes.into()),
            ("uptime", d.uptime.into()),
            ("state", d.state.into()),
            ("num_sta", d.num_sta.into()),
        ]),
    ]);

    r.count(ItemKind::Udb);
    r.send(point).await;
}
