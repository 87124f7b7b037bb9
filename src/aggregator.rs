//! Event aggregation
//!
//! A single sequential fold over parsed events. Counts are order independent,
//! but `credential_attempts` keeps input order: renderers show the most recent
//! attempts first by reading it back to front.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::event::Event;

/// One captured login attempt
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialAttempt {
    pub timestamp: String,
    pub source_ip: String,
    pub username: String,
    pub password: String,
}

/// Outcome of one pipeline run, immutable once built
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AggregationResult {
    pub events_by_date: BTreeMap<NaiveDate, u64>,
    pub events_by_ip: HashMap<String, u64>,
    pub events_by_type: HashMap<String, u64>,
    pub credential_attempts: Vec<CredentialAttempt>,
    pub total_events: u64,
}

impl AggregationResult {
    /// Per-day counts in chronological order
    pub fn dates_sorted(&self) -> Vec<(NaiveDate, u64)> {
        self.events_by_date.iter().map(|(d, c)| (*d, *c)).collect()
    }

    pub fn top_ips(&self, n: usize) -> Vec<(&str, u64)> {
        top_n(&self.events_by_ip, n)
    }

    pub fn top_event_types(&self, n: usize) -> Vec<(&str, u64)> {
        top_n(&self.events_by_type, n)
    }

    /// Latest `n` credential attempts, newest first
    pub fn recent_credentials(&self, n: usize) -> Vec<&CredentialAttempt> {
        self.credential_attempts.iter().rev().take(n).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.total_events == 0
    }
}

// Highest count first, ties broken by key so output is stable
fn top_n(counts: &HashMap<String, u64>, n: usize) -> Vec<(&str, u64)> {
    let mut entries: Vec<(&str, u64)> = counts.iter().map(|(k, c)| (k.as_str(), *c)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries.truncate(n);
    entries
}

/// Running tallies for one run
#[derive(Debug, Default)]
pub struct Aggregator {
    result: AggregationResult,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        let tallies = &mut self.result;

        if let Some(date) = event.date {
            *tallies.events_by_date.entry(date).or_insert(0) += 1;
        }
        if !event.source_ip.is_empty() {
            *tallies.events_by_ip.entry(event.source_ip.clone()).or_insert(0) += 1;
        }

        // Presence of the pair triggers a record, empty values included
        if let Some(credential) = event.credential {
            tallies.credential_attempts.push(CredentialAttempt {
                timestamp: event.timestamp,
                source_ip: event.source_ip,
                username: credential.username,
                password: credential.password,
            });
        }

        *tallies.events_by_type.entry(event.event_type).or_insert(0) += 1;
        tallies.total_events += 1;
    }

    pub fn total_events(&self) -> u64 {
        self.result.total_events
    }

    pub fn finish(self) -> AggregationResult {
        self.result
    }
}

impl Extend<Event> for Aggregator {
    fn extend<T: IntoIterator<Item = Event>>(&mut self, iter: T) {
        for event in iter {
            self.push(event);
        }
    }
}

/// Fold `events` into a fresh result
pub fn aggregate<I>(events: I) -> AggregationResult
where
    I: IntoIterator<Item = Event>,
{
    let mut aggregator = Aggregator::new();
    aggregator.extend(events);
    aggregator.finish()
}
