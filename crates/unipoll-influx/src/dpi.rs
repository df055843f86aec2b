// Deep-packet-inspection batchers.
//
// Per-client DPI rows are folded in a second pass into per-application
// and per-category totals keyed controller → site → name, so downstream
// queries get pre-aggregated transfer data. Application-level totals
// are emitted only when configured: one row per app per site is a
// cardinality explosion on busy networks.

use std::collections::HashMap;

use unipoll_api::models::{DpiEntry, DpiTable};
use unipoll_core::point::{fields, tags};
use unipoll_core::{ItemKind, Point};

use crate::report::Report;

/// Running totals: controller → site → app/cat name → counters.
pub(crate) type TotalsMap = HashMap<String, HashMap<String, HashMap<String, DpiTotals>>>;

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub(crate) struct DpiTotals {
    pub tx_packets: f64,
    pub rx_packets: f64,
    pub tx_bytes: f64,
    pub rx_bytes: f64,
}

impl DpiTotals {
    fn absorb(&mut self, dpi: &DpiEntry) {
        self.tx_packets += dpi.tx_packets.val;
        self.rx_packets += dpi.rx_packets.val;
        self.tx_bytes += dpi.tx_bytes.val;
        self.rx_bytes += dpi.rx_bytes.val;
    }
}

/// The controller reports DPI rows by numeric category/application id.
/// The well-known category names are mapped; everything else keeps its
/// numeric id so the tag stays stable across firmware updates.
fn category_label(cat: i64) -> String {
    let known = match cat {
        0 => "Instant Messaging",
        1 => "P2P",
        3 => "File Transfer",
        4 => "Streaming Media",
        5 => "Mail and Collaboration",
        6 => "Voice over IP",
        7 => "Database",
        8 => "Games",
        9 => "Network Management",
        10 => "Remote Access",
        11 => "Bypass Proxies and Tunnels",
        12 => "Stock Market",
        13 => "Web",
        14 => "Security Update",
        15 => "Web IM",
        17 => "Business",
        18 => "Network Protocols",
        19 => "Network Protocols",
        20 => "Network Protocols",
        23 => "Private Protocol",
        24 => "Social Network",
        255 => "Unknown",
        _ => return format!("Category {cat}"),
    };

    known.to_owned()
}

fn application_label(cat: i64, app: i64) -> String {
    format!("{}:{app}", category_label(cat))
}

/// Batch one site DPI table: one point per application row.
pub(crate) async fn site_dpi(r: &Report, table: &DpiTable) {
    r.count(ItemKind::SiteDpi);

    for dpi in &table.by_app {
        let mut point = Point::new("sitedpi");
        point.tags = tags([
            ("category", category_label(dpi.cat.as_i64())),
            ("application", application_label(dpi.cat.as_i64(), dpi.app.as_i64())),
            ("site_name", table.site_name.clone()),
            ("source", table.source_name.clone()),
        ]);
        point.fields = transfer_fields(dpi);

        r.send(point).await;
    }
}

/// Batch one client DPI table and fold its rows into the running
/// app/category totals.
pub(crate) async fn client_dpi(
    r: &Report,
    table: &DpiTable,
    app_totals: &mut TotalsMap,
    cat_totals: &mut TotalsMap,
) {
    r.count(ItemKind::ClientDpi);

    for dpi in &table.by_app {
        let category = category_label(dpi.cat.as_i64());
        let application = application_label(dpi.cat.as_i64(), dpi.app.as_i64());

        fill_totals(app_totals, &application, table, dpi);
        fill_totals(cat_totals, &category, table, dpi);

        let mut point = Point::new("clientdpi");
        point.tags = tags([
            ("category", category),
            ("application", application),
            ("name", table.name.clone()),
            ("mac", table.mac.clone()),
            ("site_name", table.site_name.clone()),
            ("source", table.source_name.clone()),
        ]);
        point.fields = transfer_fields(dpi);

        r.send(point).await;
    }
}

fn fill_totals(totals: &mut TotalsMap, name: &str, table: &DpiTable, dpi: &DpiEntry) {
    totals
        .entry(table.source_name.clone())
        .or_default()
        .entry(table.site_name.clone())
        .or_default()
        .entry(name.to_owned())
        .or_default()
        .absorb(dpi);
}

/// Emit the folded totals. Category totals always go out; application
/// totals only when the output opts in.
pub(crate) async fn report_totals(r: &Report, app_totals: TotalsMap, cat_totals: TotalsMap) {
    let mut sets = vec![("category", cat_totals)];

    if r.opts.app_totals {
        sets.push(("application", app_totals));
    }

    for (kind, totals) in sets {
        for (controller, sites) in totals {
            for (site, names) in sites {
                for (name, total) in names {
                    let mut point = Point::new("clientdpi");
                    point.tags = tags([
                        ("category", "TOTAL".to_owned()),
                        ("application", "TOTAL".to_owned()),
                        ("name", "TOTAL".to_owned()),
                        ("mac", "TOTAL".to_owned()),
                        ("site_name", site.clone()),
                        ("source", controller.clone()),
                    ]);
                    point.tags.insert(kind.to_owned(), name);
                    point.fields = fields([
                        ("tx_packets", total.tx_packets.into()),
                        ("rx_packets", total.rx_packets.into()),
                        ("tx_bytes", total.tx_bytes.into()),
                        ("rx_bytes", total.rx_bytes.into()),
                    ]);

                    r.send(point).await;
                }
            }
        }
    }
}

fn transfer_fields(dpi: &DpiEntry) -> std::collections::BTreeMap<String, unipoll_core::FieldValue> {
    fields([
        ("tx_packets", dpi.tx_packets.into()),
        ("rx_packets", dpi.rx_packets.into()),
        ("tx_bytes", dpi.tx_bytes.into()),
        ("rx_bytes", dpi.rx_bytes.into()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use unipoll_api::models::Flex;

    fn entry(cat: i64, app: i64, tx: f64) -> DpiEntry {
        DpiEntry {
            cat: Flex::from(cat),
            app: Flex::from(app),
            tx_bytes: Flex::new(tx),
            ..DpiEntry::default()
        }
    }

    fn table(site: &str, entries: Vec<DpiEntry>) -> DpiTable {
        DpiTable {
            site_name: site.into(),
            source_name: "https://ctl/".into(),
            by_app: entries,
            ..DpiTable::default()
        }
    }

    #[test]
    fn totals_fold_is_deterministic() {
        let t = table("home", vec![entry(13, 7, 100.0), entry(13, 9, 50.0)]);

        let fold = |tables: &[DpiTable]| {
            let mut cats = TotalsMap::new();
            for table in tables {
                for dpi in &table.by_app {
                    fill_totals(&mut cats, &category_label(dpi.cat.as_i64()), table, dpi);
                }
            }
            cats
        };

        let once = fold(std::slice::from_ref(&t));
        let twice = fold(std::slice::from_ref(&t));
        assert_eq!(once["https://ctl/"]["home"]["Web"], twice["https://ctl/"]["home"]["Web"]);
        assert_eq!(once["https://ctl/"]["home"]["Web"].tx_bytes, 150.0);
    }

    #[test]
    fn unknown_categories_keep_their_id() {
        assert_eq!(category_label(13), "Web");
        assert_eq!(category_label(99), "Category 99");
        assert_eq!(application_label(13, 42), "Web:42");
    }
}
