use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("not in a git repository")]
    RepositoryNotFound,

    #[error("failed to read checkout history: {0}")]
    HistoryUnavailable(String),

    #[error("`{command}` failed ({}): {stderr}", exit_label(.code))]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("`{command}` timed out after {}s", whole_secs(.timeout))]
    TimedOut { command: String, timeout: Duration },

    #[error("already on branch '{0}'")]
    AlreadyOnBranch(String),

    #[error("commit failed: {0}")]
    CommitFailed(#[source] Box<Error>),

    #[error("stash failed: {0}")]
    StashFailed(#[source] Box<Error>),

    #[error("switch to '{branch}' failed: {source}")]
    SwitchFailed {
        branch: String,
        #[source]
        source: Box<Error>,
    },

    #[error("committed changes but switch to '{branch}' failed: {source}")]
    CommittedButSwitchFailed {
        branch: String,
        #[source]
        source: Box<Error>,
    },

    #[error("stashed changes but switch to '{branch}' failed (stash kept): {source}")]
    StashedButSwitchFailed {
        branch: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Terminal error: {0}")]
    Terminal(String),
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit {}", code),
        None => "killed".to_string(),
    }
}

fn whole_secs(timeout: &Duration) -> u64 {
    timeout.as_secs()
}

impl Error {
    /// Errors that make the branch list impossible to compute at all.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::RepositoryNotFound | Error::HistoryUnavailable(_))
    }

    /// Partial failures leave the repository changed but on the original branch.
    pub fn is_partial(&self) -> bool {
        matches!(
            self,
            Error::CommittedButSwitchFailed { .. } | Error::StashedButSwitchFailed { .. }
        )
    }

    /// Single-line text for the status bar. Command stderr can span lines.
    pub fn user_message(&self) -> String {
        self.to_string()
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub type Result<T> = std::result::Result<T, Error>;
