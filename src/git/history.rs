use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};

const CHECKOUT_PREFIX: &str = "checkout: moving from ";

/// One "checkout: moving from X to Y" entry of the HEAD reflog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRecord {
    pub timestamp: DateTime<Utc>,
    pub from: String,
    pub to: String,
}

/// Parse `selector|subject` records where the selector is `HEAD@{<unix>}`.
/// Records that are not checkouts, or whose time cannot be read, are skipped.
pub fn parse_checkout_history(output: &str) -> Vec<CheckoutRecord> {
    output.lines().filter_map(parse_record).collect()
}

fn parse_record(line: &str) -> Option<CheckoutRecord> {
    let (selector, subject) = line.split_once('|')?;
    let movement = subject.trim().strip_prefix(CHECKOUT_PREFIX)?;
    let (from, to) = movement.split_once(" to ")?;
    let to = to.trim();
    if to.is_empty() {
        return None;
    }

    Some(CheckoutRecord {
        timestamp: selector_time(selector)?,
        from: from.trim().to_string(),
        to: to.to_string(),
    })
}

fn selector_time(selector: &str) -> Option<DateTime<Utc>> {
    let start = selector.rfind("@{")? + 2;
    let secs = selector.get(start..)?.strip_suffix('}')?.trim();
    Utc.timestamp_opt(secs.parse().ok()?, 0).single()
}

/// Latest checkout time per destination branch.
pub fn latest_checkouts(records: &[CheckoutRecord]) -> HashMap<String, DateTime<Utc>> {
    let mut latest: HashMap<String, DateTime<Utc>> = HashMap::new();
    for record in records {
        latest
            .entry(record.to.clone())
            .and_modify(|t| {
                if record.timestamp > *t {
                    *t = record.timestamp;
                }
            })
            .or_insert(record.timestamp);
    }
    latest
}
