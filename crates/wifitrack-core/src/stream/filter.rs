// ── Filter predicates for entry streams ──
//
// Applied to snapshots on the reader side; the store never filters.

use crate::model::{SecurityClass, WifiEntry};

/// Filter predicate for entry snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryFilter {
    BySecurity(SecurityClass),
    /// Case-insensitive substring match on the SSID.
    SsidContains(String),
    /// Networks that need a credential to join.
    Secured,
    /// Entries last seen no earlier than `now - max_age_millis`.
    SeenWithin { now_millis: i64, max_age_millis: u64 },
}

impl EntryFilter {
    pub fn matches(&self, entry: &WifiEntry) -> bool {
        match self {
            Self::BySecurity(sec) => entry.security() == *sec,
            Self::SsidContains(needle) => entry
                .ssid()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Self::Secured => entry.security().requires_credentials(),
            Self::SeenWithin {
                now_millis,
                max_age_millis,
            } => entry.age_millis(*now_millis) <= *max_age_millis,
        }
    }

    /// `true` when every filter accepts the entry. An empty list accepts
    /// everything.
    pub fn all_match(filters: &[Self], entry: &WifiEntry) -> bool {
        filters.iter().all(|f| f.matches(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NativeScanRecord, SecurityClass};

    fn entry(ssid: &str, caps: &str, seen: i64) -> WifiEntry {
        let record = crate::decode::decode(
            NativeScanRecord::new(Some(ssid), "bssid", seen).with_capabilities(caps),
        );
        let Some(record) = record else {
            panic!("record should decode");
        };
        WifiEntry::from_record(record.key(), record)
    }

    #[test]
    fn security_and_ssid_filters() {
        let home = entry("Home Net", "[WPA2-PSK-CCMP][ESS]", 0);
        let cafe = entry("Cafe", "[ESS]", 0);

        assert!(EntryFilter::BySecurity(SecurityClass::Psk).matches(&home));
        assert!(!EntryFilter::BySecurity(SecurityClass::Psk).matches(&cafe));
        assert!(EntryFilter::SsidContains("home".into()).matches(&home));
        assert!(EntryFilter::Secured.matches(&home));
        assert!(!EntryFilter::Secured.matches(&cafe));
    }

    #[test]
    fn seen_within_uses_entry_age() {
        let e = entry("x", "", 1_000);
        let recent = EntryFilter::SeenWithin {
            now_millis: 6_000,
            max_age_millis: 5_000,
        };
        let strict = EntryFilter::SeenWithin {
            now_millis: 6_001,
            max_age_millis: 5_000,
        };
        assert!(recent.matches(&e));
        assert!(!strict.matches(&e));
    }

    #[test]
    fn filters_combine_conjunctively() {
        let home = entry("Home Net", "[WPA2-PSK-CCMP][ESS]", 0);
        let guest = entry("Home Guest", "[ESS]", 0);
        let filters = [
            EntryFilter::SsidContains("home".into()),
            EntryFilter::Secured,
        ];

        assert!(EntryFilter::all_match(&filters, &home));
        assert!(!EntryFilter::all_match(&filters, &guest));
        assert!(EntryFilter::all_match(&[], &guest));
    }
}
