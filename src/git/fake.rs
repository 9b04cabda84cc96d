//! In-memory `Vcs` for exercising resolver and switch logic without a
//! repository on disk.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use chrono::{DateTime, TimeZone, Utc};

use super::branch::{Branch, RefScope};
use super::commit::{Author, CommitInfo, Identity};
use super::history::CheckoutRecord;
use super::status::{ChangeEntry, LineStats};
use super::vcs::Vcs;
use crate::error::{Error, Result};

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

#[derive(Default)]
pub(crate) struct FakeVcs {
    pub outside_repository: bool,
    pub history: Vec<CheckoutRecord>,
    pub current: RefCell<Option<String>>,
    pub identity: Identity,
    pub local: RefCell<Vec<Branch>>,
    pub remote: Vec<Branch>,
    /// (base, rev) -> merge-base oid
    pub merge_bases: HashMap<(String, String), String>,
    /// rev -> authors of its unique commits; a missing rev fails the lookup
    pub authors: HashMap<String, Vec<Author>>,
    pub commits: HashMap<String, Vec<CommitInfo>>,
    pub staged_dirty: Cell<bool>,
    pub unstaged_dirty: Cell<bool>,
    pub entries: Vec<ChangeEntry>,
    pub numstat: HashMap<(String, bool), LineStats>,
    pub diffs: HashMap<(String, bool), String>,
    /// Operation names that fail with `CommandFailed`.
    pub failing: HashSet<&'static str>,
    pub calls: RefCell<Vec<String>>,
    pub committed: RefCell<Vec<String>>,
    pub stashed: RefCell<Vec<String>>,
}

impl FakeVcs {
    pub fn new() -> Self {
        Self {
            identity: Identity {
                email: Some("alice@example.com".to_string()),
                name: Some("Alice".to_string()),
            },
            ..Default::default()
        }
    }

    pub fn on(self, branch: &str) -> Self {
        *self.current.borrow_mut() = Some(branch.to_string());
        self
    }

    pub fn with_local(self, name: &str, commit_secs: i64) -> Self {
        self.local
            .borrow_mut()
            .push(Branch::local(name, at(commit_secs), format!("tip of {}", name)));
        self
    }

    pub fn with_remote(mut self, remote: &str, name: &str, commit_secs: i64) -> Self {
        self.remote
            .push(Branch::remote(remote, name, at(commit_secs), format!("tip of {}", name)));
        self
    }

    pub fn checked_out(mut self, to: &str, secs: i64) -> Self {
        self.history.push(CheckoutRecord {
            timestamp: at(secs),
            from: "somewhere".to_string(),
            to: to.to_string(),
        });
        self
    }

    pub fn authored(mut self, rev: &str, authors: &[(&str, &str)]) -> Self {
        self.authors.insert(
            rev.to_string(),
            authors
                .iter()
                .map(|(email, name)| Author {
                    email: email.to_string(),
                    name: name.to_string(),
                })
                .collect(),
        );
        self
    }

    pub fn merge_base(mut self, base: &str, rev: &str, oid: &str) -> Self {
        self.merge_bases
            .insert((base.to_string(), rev.to_string()), oid.to_string());
        self
    }

    pub fn dirty(self) -> Self {
        self.unstaged_dirty.set(true);
        self
    }

    pub fn failing(mut self, op: &'static str) -> Self {
        self.failing.insert(op);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn current(&self) -> Option<String> {
        self.current.borrow().clone()
    }

    fn record(&self, op: &'static str, detail: &str) -> Result<()> {
        self.calls.borrow_mut().push(if detail.is_empty() {
            op.to_string()
        } else {
            format!("{} {}", op, detail)
        });
        if self.failing.contains(op) {
            return Err(Error::CommandFailed {
                command: format!("git {}", op),
                code: Some(1),
                stderr: format!("{} refused", op),
            });
        }
        Ok(())
    }

    fn clean(&self) {
        self.staged_dirty.set(false);
        self.unstaged_dirty.set(false);
    }
}

impl Vcs for FakeVcs {
    fn ensure_repository(&self) -> Result<()> {
        if self.outside_repository {
            Err(Error::RepositoryNotFound)
        } else {
            Ok(())
        }
    }

    fn current_branch(&self) -> Result<Option<String>> {
        self.record("current_branch", "")?;
        Ok(self.current())
    }

    fn identity(&self) -> Result<Identity> {
        self.record("identity", "")?;
        Ok(self.identity.clone())
    }

    fn checkout_history(&self) -> Result<Vec<CheckoutRecord>> {
        self.record("checkout_history", "")
            .map_err(|e| Error::HistoryUnavailable(e.user_message()))?;
        Ok(self.history.clone())
    }

    fn branches(&self, scope: RefScope) -> Result<Vec<Branch>> {
        match scope {
            RefScope::Local => {
                self.record("branches_local", "")?;
                Ok(self.local.borrow().clone())
            }
            RefScope::Remote => {
                self.record("branches_remote", "")?;
                Ok(self.remote.clone())
            }
        }
    }

    fn merge_base(&self, base: &str, rev: &str) -> Result<Option<String>> {
        self.record("merge_base", &format!("{} {}", base, rev))?;
        Ok(self
            .merge_bases
            .get(&(base.to_string(), rev.to_string()))
            .cloned())
    }

    fn root_commit(&self) -> Result<String> {
        self.record("root_commit", "")?;
        Ok("root".to_string())
    }

    fn unique_authors(&self, base: &str, rev: &str) -> Result<Vec<Author>> {
        self.record("unique_authors", &format!("{}..{}", base, rev))?;
        self.authors.get(rev).cloned().ok_or_else(|| Error::CommandFailed {
            command: format!("git log {}..{}", base, rev),
            code: Some(128),
            stderr: "bad revision".to_string(),
        })
    }

    fn recent_commits(&self, rev: &str, limit: usize) -> Result<Vec<CommitInfo>> {
        self.record("recent_commits", rev)?;
        let mut commits = self.commits.get(rev).cloned().unwrap_or_default();
        commits.truncate(limit);
        Ok(commits)
    }

    fn has_staged_changes(&self) -> Result<bool> {
        self.record("has_staged_changes", "")?;
        Ok(self.staged_dirty.get())
    }

    fn has_unstaged_changes(&self) -> Result<bool> {
        self.record("has_unstaged_changes", "")?;
        Ok(self.unstaged_dirty.get())
    }

    fn status_entries(&self) -> Result<Vec<ChangeEntry>> {
        self.record("status_entries", "")?;
        Ok(self.entries.clone())
    }

    fn line_stats(&self, path: &str, staged: bool) -> Result<LineStats> {
        self.record("line_stats", path)?;
        Ok(self
            .numstat
            .get(&(path.to_string(), staged))
            .copied()
            .unwrap_or_default())
    }

    fn diff(&self, path: &str, staged: bool) -> Result<String> {
        self.record("diff", path)?;
        Ok(self
            .diffs
            .get(&(path.to_string(), staged))
            .cloned()
            .unwrap_or_default())
    }

    fn stage_all(&self) -> Result<()> {
        self.record("stage_all", "")
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.record("commit", "")?;
        self.committed.borrow_mut().push(message.to_string());
        self.clean();
        Ok(())
    }

    fn stash_push(&self, message: &str) -> Result<()> {
        self.record("stash_push", "")?;
        self.stashed.borrow_mut().push(message.to_string());
        self.clean();
        Ok(())
    }

    fn local_branch_exists(&self, name: &str) -> Result<bool> {
        self.record("local_branch_exists", name)?;
        Ok(self.local.borrow().iter().any(|b| b.name == name))
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.record("checkout", name)?;
        *self.current.borrow_mut() = Some(name.to_string());
        Ok(())
    }

    fn checkout_tracking(&self, name: &str, upstream: &str) -> Result<()> {
        self.record("checkout_tracking", &format!("{} {}", name, upstream))?;
        self.local
            .borrow_mut()
            .push(Branch::local(name, at(0), format!("tracking {}", upstream)));
        *self.current.borrow_mut() = Some(name.to_string());
        Ok(())
    }
}
