// Personally-identifying-information masking.
//
// Hashing is format-preserving: names become truncated hex digests,
// MACs become MAC-shaped digests, IPs become dotted digest chunks, so
// downstream dashboards keep working without exposing the real values.

/// Mask a name. `drop` empties it; `hash` replaces it with the first
/// 24 hex characters of its md5 digest.
pub(crate) fn redact_name(pii: &str, hash: bool, drop: bool) -> String {
    if drop {
        return String::new();
    }

    if !hash || pii.is_empty() {
        return pii.to_owned();
    }

    let digest = format!("{:x}", md5::compute(pii.as_bytes()));
    digest[..24].to_owned()
}

/// Mask a MAC address into a MAC-shaped digest string.
pub(crate) fn redact_mac(pii: &str, hash: bool, drop: bool) -> String {
    if drop {
        return String::new();
    }

    if !hash || pii.is_empty() {
        return pii.to_owned();
    }

    let d = format!("{:x}", md5::compute(pii.as_bytes()));
    format!(
        "{}:{}:{}:{}:{}:{}:{}",
        &d[..2],
        &d[2..4],
        &d[4..6],
        &d[6..8],
        &d[8..10],
        &d[10..12],
        &d[12..14]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_when_disabled() {
        assert_eq!(redact_name("laptop", false, false), "laptop");
        assert_eq!(redact_mac("aa:bb:cc:dd:ee:ff", false, false), "aa:bb:cc:dd:ee:ff");
    }

    #[test]
    fn drop_wins_over_hash() {
        assert_eq!(redact_name("laptop", true, true), "");
        assert_eq!(redact_mac("aa:bb:cc:dd:ee:ff", true, true), "");
    }

    #[test]
    fn hashes_are_shaped_and_stable() {
        let mac = redact_mac("aa:bb:cc:dd:ee:ff", true, false);
        assert_eq!(mac.split(':').count(), 7);
        assert_eq!(mac, redact_mac("aa:bb:cc:dd:ee:ff", true, false));
        assert_ne!(mac, "aa:bb:cc:dd:ee:ff");

        let name = redact_name("laptop", true, false);
        assert_eq!(name.len(), 24);

        assert_eq!(redact_name("", true, false), "");
    }
}
