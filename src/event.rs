//! Event Struct Definition
//!
//! An `Event` is the structured form of exactly one raw honeypot log line.
//! It is created by a grammar, consumed once by the aggregator and never
//! persisted.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Event type assigned to credential capture lines
pub const LOGIN_EVENT: &str = "LOGIN";

/// Event type for lines whose message is empty after normalization
pub const OTHER_EVENT: &str = "other";

/// Username/password pair captured by a fake login prompt
///
/// Empty strings are meaningful here: an attacker submitting an empty
/// password is recorded as such, which is why the pair itself is optional on
/// [`Event`] rather than its fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: String,
}

impl Credential {
    pub fn new<U: Into<String>, P: Into<String>>(username: U, password: P) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Event {
    /// Timestamp text exactly as it appeared in the line
    pub timestamp: String,

    /// Calendar date taken from the timestamp prefix
    pub date: Option<NaiveDate>,

    /// Originating address, empty when the grammar has no IP field
    pub source_ip: String,

    /// Normalized category label
    pub event_type: String,

    pub credential: Option<Credential>,
}

impl Event {
    pub fn new<T: Into<String>, I: Into<String>, E: Into<String>>(
        timestamp: T,
        source_ip: I,
        event_type: E,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            date: None,
            source_ip: source_ip.into(),
            event_type: event_type.into(),
            credential: None,
        }
    }

    pub fn with_date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn with_credential(mut self, credential: Option<Credential>) -> Self {
        self.credential = credential;
        self
    }

    pub fn is_login(&self) -> bool {
        self.event_type == LOGIN_EVENT
    }
}
