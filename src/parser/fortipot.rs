//! Fortipot grammar
//!
//! Wire format: `<timestamp>|<level>|<ip>|<message...>`. The message may itself
//! contain `|`, so everything from the fourth field on is rejoined.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::event::{Credential, Event, LOGIN_EVENT, OTHER_EVENT};
use crate::parser::{Grammar, FORTIPOT};

const MIN_FIELDS: usize = 4;
const LOGIN_MARKER: &str = "LOGIN username=";
const GET_PREFIX: &str = "GET ";

static DATE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})").expect("valid date prefix regex"));

// `(1.2.3.4, 80)`, `('1.2.3.4', 80)` or `("1.2.3.4", 80)` left by the upstream formatter
static ADDRESS_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\(\s*(?:'[^']*'|"[^"]*"|[^,()'"]+?)\s*,\s*\d+\s*\)"#)
        .expect("valid address prefix regex")
});

static LOGIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"LOGIN username=(.*?) password=(.*)$").expect("valid login regex")
});

static CVE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"CVE-\d{4}-\d+").expect("valid CVE regex"));

#[derive(Debug, Clone, Default)]
pub struct FortipotGrammar;

impl FortipotGrammar {
    pub fn new() -> Self {
        Self
    }
}

impl Grammar for FortipotGrammar {
    fn parse(&self, line: &str) -> Option<Event> {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < MIN_FIELDS {
            return None;
        }

        let timestamp = fields[0].trim();
        let source_ip = fields[2].trim();
        let message = fields[3..].join("|");
        let message = strip_address_prefix(&message);

        let (event_type, credential) = classify(message);

        Some(
            Event::new(timestamp, source_ip, event_type)
                .with_date(extract_date(timestamp))
                .with_credential(credential),
        )
    }

    fn name(&self) -> &str {
        FORTIPOT
    }
}

/// Leading `YYYY-MM-DD` of a timestamp, if it is a real calendar date
fn extract_date(timestamp: &str) -> Option<NaiveDate> {
    let prefix = DATE_PREFIX.captures(timestamp)?.get(1)?.as_str();
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

fn strip_address_prefix(message: &str) -> &str {
    let message = message.trim();
    match ADDRESS_PREFIX.find(message) {
        Some(prefix) => message[prefix.end()..].trim(),
        None => message,
    }
}

/// First match wins: LOGIN, then GET, then CVE, then the message itself
fn classify(message: &str) -> (String, Option<Credential>) {
    if message.contains(LOGIN_MARKER) {
        let credential = LOGIN_PATTERN.captures(message).map(|caps| {
            Credential::new(
                caps.get(1).map_or("", |m| m.as_str()),
                caps.get(2).map_or("", |m| m.as_str().trim()),
            )
        });
        return (LOGIN_EVENT.to_string(), credential);
    }

    if let Some(rest) = message.strip_prefix(GET_PREFIX) {
        let path = rest.split_whitespace().next().unwrap_or("/");
        return (format!("{GET_PREFIX}{path}"), None);
    }

    if let Some(cve) = CVE_PATTERN.find(message) {
        return (cve.as_str().to_string(), None);
    }

    if message.is_empty() {
        (OTHER_EVENT.to_string(), None)
    } else {
        (message.to_string(), None)
    }
}
