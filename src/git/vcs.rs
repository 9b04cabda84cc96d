use crate::error::Result;

use super::branch::{Branch, RefScope};
use super::commit::{Author, CommitInfo, Identity};
use super::history::CheckoutRecord;
use super::status::{ChangeEntry, LineStats};

/// Every repository read and write the resolver, guard and switch workflow
/// need. `Repository` implements it over the git CLI; tests substitute fakes.
pub trait Vcs {
    /// Fails with `RepositoryNotFound` outside a working tree.
    fn ensure_repository(&self) -> Result<()>;

    /// `None` on a detached HEAD.
    fn current_branch(&self) -> Result<Option<String>>;

    fn identity(&self) -> Result<Identity>;

    fn checkout_history(&self) -> Result<Vec<CheckoutRecord>>;

    fn branches(&self, scope: RefScope) -> Result<Vec<Branch>>;

    /// `None` when the two revisions share no history (or `base` is missing).
    fn merge_base(&self, base: &str, rev: &str) -> Result<Option<String>>;

    fn root_commit(&self) -> Result<String>;

    /// Authors of commits reachable from `rev` but not from `base`.
    fn unique_authors(&self, base: &str, rev: &str) -> Result<Vec<Author>>;

    fn recent_commits(&self, rev: &str, limit: usize) -> Result<Vec<CommitInfo>>;

    fn has_staged_changes(&self) -> Result<bool>;

    fn has_unstaged_changes(&self) -> Result<bool>;

    /// Porcelain entries without line counts.
    fn status_entries(&self) -> Result<Vec<ChangeEntry>>;

    fn line_stats(&self, path: &str, staged: bool) -> Result<LineStats>;

    fn diff(&self, path: &str, staged: bool) -> Result<String>;

    fn stage_all(&self) -> Result<()>;

    fn commit(&self, message: &str) -> Result<()>;

    fn stash_push(&self, message: &str) -> Result<()>;

    fn local_branch_exists(&self, name: &str) -> Result<bool>;

    fn checkout(&self, name: &str) -> Result<()>;

    /// Create `name` tracking `upstream` and check it out.
    fn checkout_tracking(&self, name: &str, upstream: &str) -> Result<()>;
}
