use chrono::{DateTime, Utc};

/// Display suffix that marks a remote-only branch in a listing.
pub const REMOTE_SUFFIX: &str = " (remote)";

/// Which ref namespace to enumerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefScope {
    Local,
    Remote,
}

impl RefScope {
    pub fn prefix(&self) -> &'static str {
        match self {
            RefScope::Local => "refs/heads/",
            RefScope::Remote => "refs/remotes/",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Display name. Remote-only branches carry `REMOTE_SUFFIX`.
    pub name: String,
    pub commit_time: DateTime<Utc>,
    pub subject: String,
    /// Filled in by the resolver from checkout history or the commit time.
    pub last_used: DateTime<Utc>,
    pub relative_time: String,
    pub is_remote: bool,
    /// Remote the branch was listed from (e.g. "origin").
    pub remote: Option<String>,
}

impl Branch {
    pub fn local(name: impl Into<String>, commit_time: DateTime<Utc>, subject: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit_time,
            subject: subject.into(),
            last_used: commit_time,
            relative_time: String::new(),
            is_remote: false,
            remote: None,
        }
    }

    pub fn remote(
        remote: impl Into<String>,
        name: &str,
        commit_time: DateTime<Utc>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            name: format!("{}{}", name, REMOTE_SUFFIX),
            commit_time,
            subject: subject.into(),
            last_used: commit_time,
            relative_time: String::new(),
            is_remote: true,
            remote: Some(remote.into()),
        }
    }

    /// Real ref name with the display suffix removed.
    pub fn ref_name(&self) -> &str {
        strip_remote_suffix(&self.name)
    }

    /// Revision usable in git commands: `origin/feat` for remote branches.
    pub fn rev(&self) -> String {
        match (&self.remote, self.is_remote) {
            (Some(remote), true) => format!("{}/{}", remote, self.ref_name()),
            _ => self.ref_name().to_string(),
        }
    }
}

pub fn strip_remote_suffix(name: &str) -> &str {
    name.strip_suffix(REMOTE_SUFFIX).unwrap_or(name)
}

/// What the switch workflow is asked to check out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchTarget {
    pub name: String,
    pub display: String,
    /// `<remote>/<name>` when the target was listed as remote-only.
    pub upstream: Option<String>,
}

impl SwitchTarget {
    pub fn local(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display: name.clone(),
            name,
            upstream: None,
        }
    }
}

impl From<&Branch> for SwitchTarget {
    fn from(branch: &Branch) -> Self {
        Self {
            name: branch.ref_name().to_string(),
            display: branch.name.clone(),
            upstream: branch.is_remote.then(|| branch.rev()),
        }
    }
}
