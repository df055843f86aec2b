// ── Per-report counters ──
//
// The token set is closed, so the counter is a fixed-size array indexed
// by the enum instead of a string-keyed map. Writes take the lock
// exclusively; the end-of-cycle summary reads take it shared.

use std::sync::RwLock;

use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

/// Everything a report counts. `Point` and `Fields` track channel
/// throughput; the rest are per-record-type tallies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumCount, EnumIter)]
pub enum ItemKind {
    Point,
    Fields,
    Event,
    #[strum(serialize = "IDs")]
    Ids,
    Alarm,
    Anomaly,
    #[strum(serialize = "UAP")]
    Uap,
    #[strum(serialize = "USW")]
    Usw,
    #[strum(serialize = "USG")]
    Usg,
    #[strum(serialize = "UDM")]
    Udm,
    #[strum(serialize = "UXG")]
    Uxg,
    #[strum(serialize = "PDU")]
    Pdu,
    #[strum(serialize = "UBB")]
    Ubb,
    #[strum(serialize = "UCI")]
    Uci,
    #[strum(serialize = "UDB")]
    Udb,
    RogueAp,
    Site,
    Client,
    SiteDpi,
    ClientDpi,
}

/// Lock-guarded counter array shared between producers and the drain.
#[derive(Debug, Default)]
pub struct Counts {
    vals: RwLock<[u64; ItemKind::COUNT]>,
}

impl Counts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `n` to one counter.
    pub fn add(&self, kind: ItemKind, n: u64) {
        let mut vals = self.vals.write().expect("lock poisoned");
        vals[kind as usize] += n;
    }

    /// Increment one counter.
    pub fn bump(&self, kind: ItemKind) {
        self.add(kind, 1);
    }

    pub fn get(&self, kind: ItemKind) -> u64 {
        let vals = self.vals.read().expect("lock poisoned");
        vals[kind as usize]
    }

    /// Every non-zero counter, for the status UI.
    pub fn non_zero(&self) -> Vec<(String, u64)> {
        let vals = self.vals.read().expect("lock poisoned");

        ItemKind::iter()
            .filter(|k| vals[*k as usize] > 0)
            .map(|k| (k.to_string(), vals[k as usize]))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_bump_accumulate() {
        let counts = Counts::new();
        counts.bump(ItemKind::Uap);
        counts.bump(ItemKind::Uap);
        counts.add(ItemKind::Fields, 17);

        assert_eq!(counts.get(ItemKind::Uap), 2);
        assert_eq!(counts.get(ItemKind::Fields), 17);
        assert_eq!(counts.get(ItemKind::Usw), 0);
    }

    #[test]
    fn display_matches_summary_tokens() {
        assert_eq!(ItemKind::Uap.to_string(), "UAP");
        assert_eq!(ItemKind::Ids.to_string(), "IDs");
        assert_eq!(ItemKind::Point.to_string(), "Point");
    }
}
