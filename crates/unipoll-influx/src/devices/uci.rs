use unipoll_api::models::Uci;
use unipoll_core::point::{combine, fields};
use unipoll_core::{ItemKind, Point};

use super::{identity_tags, sys_stats_fields};
use crate::report::Report;

/// Batch one console-integration device.
pub(crate) async fn uci(r: &Report, d: &Uci) {
    if !d.adopted || d.locating {
        return;
    }

    let mut point = Point::new("uci");
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
            ("last_seen", d.last_seen.into()),
            ("uptime", d.uptime.into()),
            ("state", d.state.into()),
        ]),
    ]);

    r.count(ItemKind::Uci);
    r.send(point).await;
}
