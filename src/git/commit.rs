use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub short_id: String,
    pub time: DateTime<Utc>,
    pub author: String,
    pub subject: String,
}

impl CommitInfo {
    pub fn relative_time(&self) -> String {
        relative_time(self.time, Utc::now())
    }
}

/// Author identity of one commit, as listed by `%ae|%an`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub email: String,
    pub name: String,
}

/// The invoking user's configured identity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl Identity {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none()
    }

    /// Exact match against either configured field.
    pub fn matches(&self, author: &Author) -> bool {
        self.email.as_deref() == Some(author.email.as_str())
            || self.name.as_deref() == Some(author.name.as_str())
    }
}

pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (now - then).num_seconds();

    if diff < 60 {
        "just now".to_string()
    } else if diff < 3600 {
        plural(diff / 60, "minute")
    } else if diff < 86400 {
        plural(diff / 3600, "hour")
    } else if diff < 2592000 {
        plural(diff / 86400, "day")
    } else if diff < 31536000 {
        plural(diff / 2592000, "month")
    } else {
        plural(diff / 31536000, "year")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", n, unit)
    }
}
