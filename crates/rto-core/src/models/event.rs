use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::DATE_FORMAT;

/// A free-text note attached to a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub date: NaiveDate,
    pub description: String,
}

impl Event {
    pub fn new(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            date,
            description: description.into(),
        }
    }
}

/// Events kept sorted by date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventData {
    #[serde(default)]
    events: Vec<Event>,
}

impl EventData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: Event) {
        self.events.push(event);
        self.events.sort_by_key(|e| e.date);
    }

    /// Remove events matching both date and description.
    pub fn remove(&mut self, date: NaiveDate, description: &str) -> bool {
        let before = self.events.len();
        self.events
            .retain(|e| !(e.date == date && e.description == description));
        self.events.len() != before
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn event_map(&self) -> BTreeMap<NaiveDate, Vec<&Event>> {
        let mut map: BTreeMap<NaiveDate, Vec<&Event>> = BTreeMap::new();
        for event in &self.events {
            map.entry(event.date).or_default().push(event);
        }
        map
    }

    /// Case-insensitive match on description, or substring match on the
    /// `YYYY-MM-DD` date. An empty query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&Event> {
        if query.is_empty() {
            return Vec::new();
        }
        let lower = query.to_lowercase();
        self.events
            .iter()
            .filter(|e| {
                e.description.to_lowercase().contains(&lower)
                    || e.date.format(DATE_FORMAT).to_string().contains(query)
            })
            .collect()
    }
}
