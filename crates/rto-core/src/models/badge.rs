use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single badge-in record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeEntry {
    pub entry_date: NaiveDate,
    #[serde(
        default,
        with = "flex_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub office: String,
    #[serde(default)]
    pub is_badged_in: bool,
    #[serde(default)]
    pub is_flex_credit: bool,
}

impl BadgeEntry {
    /// An in-office badge-in at midnight of `date`.
    pub fn office(date: NaiveDate, office: impl Into<String>) -> Self {
        Self {
            entry_date: date,
            date_time: date.and_hms_opt(0, 0, 0),
            office: office.into(),
            is_badged_in: true,
            is_flex_credit: false,
        }
    }

    /// A flex-credit badge-in, counted as attendance but reported separately.
    pub fn flex(date: NaiveDate, label: impl Into<String>) -> Self {
        Self {
            is_flex_credit: true,
            ..Self::office(date, label)
        }
    }
}

/// Lenient datetime parsing for badge files.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS`, the same with a trailing
/// `Z`, or a bare date. Always writes the naive form.
mod flex_time {
    use super::*;
    use serde::{Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

    pub fn parse(s: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(dt.naive_local());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, NAIVE_FORMAT) {
            return Some(dt);
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%SZ") {
            return Some(dt);
        }
        NaiveDate::parse_from_str(s, crate::models::DATE_FORMAT)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(dt) => serializer.serialize_str(&dt.format(NAIVE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => parse(s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("cannot parse datetime {s:?}"))),
        }
    }
}

/// All badge entries. At most one entry per date is kept by `add`; if a
/// loaded file holds duplicates, the later one wins in `badge_map`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeEntryData {
    #[serde(rename = "badge_data", default)]
    entries: Vec<BadgeEntry>,
}

impl BadgeEntryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn all(&self) -> &[BadgeEntry] {
        &self.entries
    }

    pub fn has(&self, date: NaiveDate) -> bool {
        self.get(date).is_some()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&BadgeEntry> {
        self.entries.iter().rev().find(|e| e.entry_date == date)
    }

    /// Insert `entry`, replacing anything already recorded for its date.
    pub fn add(&mut self, entry: BadgeEntry) {
        self.remove(entry.entry_date);
        self.entries.push(entry);
    }

    /// Remove every entry for `date`. Returns true if anything was removed.
    pub fn remove(&mut self, date: NaiveDate) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.entry_date != date);
        self.entries.len() != before
    }

    /// Entries dated within `[start, end]`, keyed by date.
    pub fn badge_map(&self, start: NaiveDate, end: NaiveDate) -> HashMap<NaiveDate, &BadgeEntry> {
        self.entries
            .iter()
            .filter(|e| e.entry_date >= start && e.entry_date <= end)
            .map(|e| (e.entry_date, e))
            .collect()
    }

    /// Toggle an office badge on `date`. A flex-credit entry is left alone.
    /// Returns true if the date is badged afterwards.
    pub fn toggle_badge(&mut self, date: NaiveDate, office: &str) -> bool {
        match self.get(date).map(|e| e.is_flex_credit) {
            Some(true) => true,
            Some(false) => {
                self.remove(date);
                false
            }
            None => {
                self.add(BadgeEntry::office(date, office));
                true
            }
        }
    }

    /// Toggle a flex-credit entry on `date`. An office badge is left alone.
    /// Returns true if the date is badged afterwards.
    pub fn toggle_flex(&mut self, date: NaiveDate, label: &str) -> bool {
        match self.get(date).map(|e| e.is_flex_credit) {
            Some(false) => true,
            Some(true) => {
                self.remove(date);
                false
            }
            None => {
                self.add(BadgeEntry::flex(date, label));
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DATE_FORMAT;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    #[test]
    fn test_add_replaces_same_date() {
        let mut data = BadgeEntryData::new();
        data.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        data.add(BadgeEntry::flex(date("2025-01-02"), "Flex"));
        assert_eq!(data.len(), 1);
        assert!(data.get(date("2025-01-02")).unwrap().is_flex_credit);
    }

    #[test]
    fn test_remove() {
        let mut data = BadgeEntryData::new();
        data.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        assert!(data.remove(date("2025-01-02")));
        assert!(!data.remove(date("2025-01-02")));
        assert!(data.is_empty());
    }

    #[test]
    fn test_badge_map_filters_range() {
        let mut data = BadgeEntryData::new();
        data.add(BadgeEntry::office(date("2024-12-31"), "HQ"));
        data.add(BadgeEntry::office(date("2025-01-01"), "HQ"));
        data.add(BadgeEntry::office(date("2025-03-31"), "HQ"));
        data.add(BadgeEntry::office(date("2025-04-01"), "HQ"));

        let map = data.badge_map(date("2025-01-01"), date("2025-03-31"));
        assert_eq!(map.len(), 2);
        assert!(map.contains_key(&date("2025-01-01")));
        assert!(map.contains_key(&date("2025-03-31")));
    }

    #[test]
    fn test_duplicate_entries_in_file_last_wins() {
        let json = r#"{"badge_data": [
            {"entry_date": "2025-01-02", "is_badged_in": false},
            {"entry_date": "2025-01-02", "is_badged_in": true, "is_flex_credit": true}
        ]}"#;
        let data: BadgeEntryData = serde_json::from_str(json).unwrap();
        let map = data.badge_map(date("2025-01-01"), date("2025-01-31"));
        assert!(map[&date("2025-01-02")].is_badged_in);
        assert!(data.get(date("2025-01-02")).unwrap().is_flex_credit);
    }

    #[test]
    fn test_toggle_badge() {
        let mut data = BadgeEntryData::new();
        assert!(data.toggle_badge(date("2025-01-02"), "HQ"));
        assert_eq!(data.get(date("2025-01-02")).unwrap().office, "HQ");
        assert!(!data.toggle_badge(date("2025-01-02"), "HQ"));
        assert!(!data.has(date("2025-01-02")));
    }

    #[test]
    fn test_toggle_badge_leaves_flex_alone() {
        let mut data = BadgeEntryData::new();
        data.add(BadgeEntry::flex(date("2025-01-02"), "Flex"));
        assert!(data.toggle_badge(date("2025-01-02"), "HQ"));
        assert!(data.get(date("2025-01-02")).unwrap().is_flex_credit);
    }

    #[test]
    fn test_toggle_flex() {
        let mut data = BadgeEntryData::new();
        assert!(data.toggle_flex(date("2025-01-03"), "Flex Credit"));
        assert!(data.get(date("2025-01-03")).unwrap().is_flex_credit);
        assert!(!data.toggle_flex(date("2025-01-03"), "Flex Credit"));
        assert!(data.is_empty());

        data.add(BadgeEntry::office(date("2025-01-03"), "HQ"));
        assert!(data.toggle_flex(date("2025-01-03"), "Flex Credit"));
        assert!(!data.get(date("2025-01-03")).unwrap().is_flex_credit);
    }

    #[test]
    fn test_flex_time_formats() {
        for raw in [
            "2025-01-02T08:30:00-05:00",
            "2025-01-02T08:30:00",
            "2025-01-02T08:30:00Z",
        ] {
            let dt = flex_time::parse(raw).unwrap();
            assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2025-01-02 08:30");
        }
        let midnight = flex_time::parse("2025-01-02").unwrap();
        assert_eq!(midnight.format("%H:%M:%S").to_string(), "00:00:00");
        assert!(flex_time::parse("yesterday").is_none());
    }

    #[test]
    fn test_json_writes_naive_datetime() {
        let mut data = BadgeEntryData::new();
        data.add(BadgeEntry::office(date("2025-01-02"), "HQ"));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["badge_data"][0]["entry_date"], "2025-01-02");
        assert_eq!(json["badge_data"][0]["date_time"], "2025-01-02T00:00:00");
    }

    #[test]
    fn test_json_rejects_bad_entry_date() {
        let json = r#"{"badge_data": [{"entry_date": "01/02/2025", "is_badged_in": true}]}"#;
        assert!(serde_json::from_str::<BadgeEntryData>(json).is_err());
    }
}
