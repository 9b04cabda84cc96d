use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::git::{ChangeEntry, SwitchTarget, Vcs};
use crate::guard::ChangeGuard;
use crate::workflow::SwitchDecision;

/// What happened when a switch was requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Began {
    /// The tree was clean and the switch is done.
    Switched,
    /// Uncommitted work must be committed, stashed or the switch cancelled.
    NeedsDecision(Vec<ChangeEntry>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    Committed,
    Stashed,
    Cancelled,
}

pub fn stash_message(branch: &str) -> String {
    format!("WIP: changes before switching to {}", branch)
}

/// Performs switches and the commit or stash that precedes them.
pub struct Switcher<'a, V: Vcs> {
    vcs: &'a V,
}

impl<'a, V: Vcs> Switcher<'a, V> {
    pub fn new(vcs: &'a V) -> Self {
        Self { vcs }
    }

    /// Switch straight away on a clean tree, otherwise report what is dirty.
    pub fn begin(&self, target: &SwitchTarget) -> Result<Began> {
        if self.vcs.current_branch()?.as_deref() == Some(target.name.as_str()) {
            return Err(Error::AlreadyOnBranch(target.name.clone()));
        }

        let guard = ChangeGuard::new(self.vcs);
        if !guard.has_uncommitted_changes()? {
            self.switch_to(target)?;
            return Ok(Began::Switched);
        }

        Ok(Began::NeedsDecision(guard.status()?))
    }

    pub fn apply(&self, target: &SwitchTarget, decision: &SwitchDecision) -> Result<Option<Applied>> {
        match decision {
            SwitchDecision::None => Ok(None),
            SwitchDecision::Cancel => {
                info!(target = %target.name, "Switch cancelled");
                Ok(Some(Applied::Cancelled))
            }
            SwitchDecision::Commit { subject, body } => {
                let message = SwitchDecision::commit_message(subject, body);
                self.vcs
                    .stage_all()
                    .and_then(|_| self.vcs.commit(&message))
                    .map_err(|e| Error::CommitFailed(Box::new(e)))?;
                info!(success = true, subject = %subject.trim(), "Committed changes");

                self.switch_to(target).map_err(|e| {
                    warn!(target = %target.name, "Switch failed after commit");
                    Error::CommittedButSwitchFailed {
                        branch: target.name.clone(),
                        source: Box::new(unwrap_switch(e)),
                    }
                })?;
                Ok(Some(Applied::Committed))
            }
            SwitchDecision::Stash => {
                self.vcs
                    .stash_push(&stash_message(&target.name))
                    .map_err(|e| Error::StashFailed(Box::new(e)))?;
                info!(success = true, target = %target.name, "Stashed changes");

                self.switch_to(target).map_err(|e| {
                    warn!(target = %target.name, "Switch failed after stash, stash kept");
                    Error::StashedButSwitchFailed {
                        branch: target.name.clone(),
                        source: Box::new(unwrap_switch(e)),
                    }
                })?;
                Ok(Some(Applied::Stashed))
            }
        }
    }

    /// Check out the target, creating a tracking branch for a remote-only one.
    pub fn switch_to(&self, target: &SwitchTarget) -> Result<()> {
        let result = match &target.upstream {
            Some(upstream) if !self.vcs.local_branch_exists(&target.name)? => {
                self.vcs.checkout_tracking(&target.name, upstream)
            }
            _ => self.vcs.checkout(&target.name),
        };

        result.map_err(|e| Error::SwitchFailed {
            branch: target.name.clone(),
            source: Box::new(e),
        })?;
        info!(success = true, branch = %target.name, "Switched branch");
        Ok(())
    }
}

/// Partial-failure variants carry the underlying cause, not a nested
/// `SwitchFailed` naming the same branch twice.
fn unwrap_switch(err: Error) -> Error {
    match err {
        Error::SwitchFailed { source, .. } => *source,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::fake::{at, FakeVcs};
    use crate::git::Branch;
    use pretty_assertions::assert_eq;

    fn dirty_repo() -> FakeVcs {
        let mut vcs = FakeVcs::new()
            .with_local("main", 0)
            .with_local("feature-x", 0)
            .on("main")
            .dirty();
        vcs.entries = vec![ChangeEntry::new("src/lib.rs", ' ', 'M')];
        vcs
    }

    #[test]
    fn already_on_branch_is_rejected_before_mutation() {
        let vcs = dirty_repo();
        let err = Switcher::new(&vcs).begin(&SwitchTarget::local("main")).unwrap_err();
        assert!(matches!(err, Error::AlreadyOnBranch(ref b) if b == "main"));
        assert_eq!(vcs.calls(), vec!["current_branch".to_string()]);
    }

    #[test]
    fn clean_tree_switches_directly() {
        let vcs = FakeVcs::new().with_local("main", 0).with_local("feature-x", 0).on("main");
        let began = Switcher::new(&vcs)
            .begin(&SwitchTarget::local("feature-x"))
            .unwrap();
        assert_eq!(began, Began::Switched);
        assert_eq!(vcs.current().as_deref(), Some("feature-x"));
        assert!(!vcs.calls().iter().any(|c| c == "status_entries"));
    }

    #[test]
    fn dirty_tree_needs_decision() {
        let vcs = dirty_repo();
        let began = Switcher::new(&vcs)
            .begin(&SwitchTarget::local("feature-x"))
            .unwrap();
        match began {
            Began::NeedsDecision(changes) => assert_eq!(changes[0].path, "src/lib.rs"),
            other => panic!("expected decision, got {:?}", other),
        }
        assert_eq!(vcs.current().as_deref(), Some("main"));
    }

    #[test]
    fn commit_then_switch() {
        let vcs = dirty_repo();
        let decision = SwitchDecision::Commit {
            subject: "x".to_string(),
            body: String::new(),
        };
        let applied = Switcher::new(&vcs)
            .apply(&SwitchTarget::local("feature-x"), &decision)
            .unwrap();
        assert_eq!(applied, Some(Applied::Committed));
        assert_eq!(*vcs.committed.borrow(), vec!["x".to_string()]);
        assert_eq!(vcs.current().as_deref(), Some("feature-x"));

        let calls = vcs.calls();
        let staged = calls.iter().position(|c| c == "stage_all").unwrap();
        let committed = calls.iter().position(|c| c == "commit").unwrap();
        assert!(staged < committed);
    }

    #[test]
    fn commit_with_body_joins_with_blank_line() {
        let vcs = dirty_repo();
        let decision = SwitchDecision::Commit {
            subject: "Subject".to_string(),
            body: "Body text".to_string(),
        };
        Switcher::new(&vcs)
            .apply(&SwitchTarget::local("feature-x"), &decision)
            .unwrap();
        assert_eq!(vcs.committed.borrow()[0], "Subject\n\nBody text");
    }

    #[test]
    fn failed_commit_does_not_switch() {
        let vcs = dirty_repo().failing("commit");
        let decision = SwitchDecision::Commit {
            subject: "x".to_string(),
            body: String::new(),
        };
        let err = Switcher::new(&vcs)
            .apply(&SwitchTarget::local("feature-x"), &decision)
            .unwrap_err();
        assert!(matches!(err, Error::CommitFailed(_)));
        assert!(!vcs.calls().iter().any(|c| c.starts_with("checkout")));
    }

    #[test]
    fn switch_failure_after_commit_is_partial() {
        let vcs = dirty_repo().failing("checkout");
        let decision = SwitchDecision::Commit {
            subject: "x".to_string(),
            body: String::new(),
        };
        let err = Switcher::new(&vcs)
            .apply(&SwitchTarget::local("feature-x"), &decision)
            .unwrap_err();
        assert!(err.is_partial());
        assert!(err.to_string().starts_with("committed changes but switch to 'feature-x' failed"));
        assert_eq!(vcs.current().as_deref(), Some("main"));
    }

    #[test]
    fn stash_then_switch_failure_keeps_stash() {
        let vcs = dirty_repo().failing("checkout");
        let err = Switcher::new(&vcs)
            .apply(&SwitchTarget::local("feature-x"), &SwitchDecision::Stash)
            .unwrap_err();

        assert!(matches!(err, Error::StashedButSwitchFailed { .. }));
        assert!(err.to_string().contains("stashed changes but switch to 'feature-x' failed"));
        assert_eq!(vcs.current().as_deref(), Some("main"));
        assert_eq!(
            *vcs.stashed.borrow(),
            vec!["WIP: changes before switching to feature-x".to_string()]
        );
        assert!(!vcs.calls().iter().any(|c| c.contains("pop") || c.contains("drop")));
    }

    #[test]
    fn failed_stash_does_not_switch() {
        let vcs = dirty_repo().failing("stash_push");
        let err = Switcher::new(&vcs)
            .apply(&SwitchTarget::local("feature-x"), &SwitchDecision::Stash)
            .unwrap_err();
        assert!(matches!(err, Error::StashFailed(_)));
        assert_eq!(vcs.current().as_deref(), Some("main"));
    }

    #[test]
    fn cancel_mutates_nothing() {
        let vcs = dirty_repo();
        let applied = Switcher::new(&vcs)
            .apply(&SwitchTarget::local("feature-x"), &SwitchDecision::Cancel)
            .unwrap();
        assert_eq!(applied, Some(Applied::Cancelled));
        assert!(vcs.calls().is_empty());
    }

    #[test]
    fn remote_only_target_creates_tracking_branch() {
        let vcs = FakeVcs::new().with_local("main", 0).on("main");
        let target = SwitchTarget::from(&Branch::remote("origin", "feat", at(0), "s"));
        Switcher::new(&vcs).switch_to(&target).unwrap();
        assert!(vcs
            .calls()
            .contains(&"checkout_tracking feat origin/feat".to_string()));
        assert_eq!(vcs.current().as_deref(), Some("feat"));
    }

    #[test]
    fn remote_target_with_local_counterpart_checks_out() {
        let vcs = FakeVcs::new().with_local("main", 0).with_local("feat", 0).on("main");
        let target = SwitchTarget::from(&Branch::remote("origin", "feat", at(0), "s"));
        Switcher::new(&vcs).switch_to(&target).unwrap();
        assert!(vcs.calls().contains(&"checkout feat".to_string()));
    }

    #[test]
    fn switch_failure_is_surfaced() {
        let vcs = FakeVcs::new().on("main").failing("checkout");
        let err = Switcher::new(&vcs)
            .switch_to(&SwitchTarget::local("feat"))
            .unwrap_err();
        assert!(matches!(err, Error::SwitchFailed { ref branch, .. } if branch == "feat"));
    }
}
