//! Append-by-day weather history

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::weather::state::WeatherState;

/// One day's recorded weather
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: CalendarDate,
    pub state: WeatherState,
    /// True when a GM set this day's weather instead of generation
    pub overridden: bool,
}

/// Daily weather records keyed by date, one per calendar day.
///
/// Rewriting a day overwrites its record. Retention is bounded; the oldest
/// records are pruned lazily on write. Persisted as a flat record list
/// (JSON object keys must be strings).
#[derive(Debug, Clone, Default)]
pub struct WeatherHistoryStore {
    records: BTreeMap<(i32, u32, u32), DayRecord>,
    retention: usize,
}

impl WeatherHistoryStore {
    pub fn new(retention: usize) -> Self {
        Self {
            records: BTreeMap::new(),
            retention: retention.max(1),
        }
    }

    /// Rebuild from persisted records
    pub fn from_records(records: Vec<DayRecord>, retention: usize) -> Self {
        let mut store = Self::new(retention);
        for record in records {
            store.record(record.date, record.state, record.overridden);
        }
        store
    }

    /// Snapshot for persistence, in date order
    pub fn to_records(&self) -> Vec<DayRecord> {
        self.records.values().cloned().collect()
    }

    pub fn record(&mut self, date: CalendarDate, state: WeatherState, overridden: bool) {
        self.records.insert(
            (date.year, date.month, date.day),
            DayRecord {
                date,
                state,
                overridden,
            },
        );
        while self.records.len() > self.retention {
            match self.records.keys().next().copied() {
                Some(oldest) => self.records.remove(&oldest),
                None => break,
            };
        }
    }

    pub fn get_for_date(&self, year: i32, month: u32, day: u32) -> Option<&DayRecord> {
        self.records.get(&(year, month, day))
    }

    /// All records for one year, in date order
    pub fn query_year(&self, year: i32) -> Vec<&DayRecord> {
        self.records
            .range((year, 0, 0)..(year + 1, 0, 0))
            .map(|(_, r)| r)
            .collect()
    }

    /// Every record in date order
    pub fn all(&self) -> Vec<&DayRecord> {
        self.records.values().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
