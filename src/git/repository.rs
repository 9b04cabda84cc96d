use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use git2::Repository as Git2Repository;
use tracing::warn;

use super::branch::{Branch, RefScope};
use super::commit::{Author, CommitInfo, Identity};
use super::history::{parse_checkout_history, CheckoutRecord};
use super::runner::{CommandOutput, GitRunner, ProcessRunner};
use super::status::{parse_numstat, parse_porcelain, ChangeEntry, LineStats};
use super::vcs::Vcs;
use crate::error::{Error, Result};

const REF_FORMAT: &str = "--format=%(refname)|%(committerdate:iso8601)|%(contents:subject)";
const HISTORY_FORMAT: &str = "--format=%gd|%gs";
const AUTHOR_FORMAT: &str = "--format=%ae|%an";
const PREVIEW_FORMAT: &str = "--format=%h|%ct|%an|%s";

/// Git working tree accessed through a `ProcessRunner`.
pub struct Repository<R = GitRunner> {
    runner: R,
    path: PathBuf,
}

impl Repository<GitRunner> {
    /// Locate the working tree containing the current directory.
    pub fn discover(timeout: Duration) -> Result<Self> {
        Self::discover_from(".", timeout)
    }

    pub fn discover_from<P: AsRef<Path>>(start: P, timeout: Duration) -> Result<Self> {
        let repo = Git2Repository::discover(start.as_ref()).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => Error::RepositoryNotFound,
            _ => Error::Git(e),
        })?;
        let path = repo
            .workdir()
            .ok_or(Error::RepositoryNotFound)?
            .to_path_buf();
        let runner = GitRunner::new(&path).with_timeout(timeout);
        Ok(Self { runner, path })
    }
}

impl<R: ProcessRunner> Repository<R> {
    pub fn with_runner<P: AsRef<Path>>(path: P, runner: R) -> Self {
        Self {
            runner,
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run and require a zero exit.
    fn git(&self, args: &[&str]) -> Result<String> {
        let output = self.runner.run(args)?;
        if output.success() {
            Ok(output.stdout_text())
        } else {
            Err(failure(args, &output))
        }
    }

    /// `--quiet` diff: exit 1 means differences, 0 means none.
    fn git_differs(&self, args: &[&str]) -> Result<bool> {
        let output = self.runner.run(args)?;
        match output.code {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(failure(args, &output)),
        }
    }

    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let output = self.runner.run(&["config", key])?;
        let value = output.stdout_text().trim().to_string();
        Ok((output.success() && !value.is_empty()).then_some(value))
    }
}

fn failure(args: &[&str], output: &CommandOutput) -> Error {
    Error::CommandFailed {
        command: format!("git {}", args.join(" ")),
        code: output.code,
        stderr: output.stderr_text(),
    }
}

impl<R: ProcessRunner> Vcs for Repository<R> {
    fn ensure_repository(&self) -> Result<()> {
        let output = self.runner.run(&["rev-parse", "--git-dir"])?;
        if output.success() {
            Ok(())
        } else {
            Err(Error::RepositoryNotFound)
        }
    }

    fn current_branch(&self) -> Result<Option<String>> {
        let name = self.git(&["rev-parse", "--abbrev-ref", "HEAD"])?;
        let name = name.trim();
        // Detached HEAD
        if name.is_empty() || name == "HEAD" {
            Ok(None)
        } else {
            Ok(Some(name.to_string()))
        }
    }

    fn identity(&self) -> Result<Identity> {
        Ok(Identity {
            email: self.config_value("user.email")?,
            name: self.config_value("user.name")?,
        })
    }

    fn checkout_history(&self) -> Result<Vec<CheckoutRecord>> {
        let args = [
            "log",
            "--walk-reflogs",
            "--date=unix",
            "--grep-reflog=checkout:",
            HISTORY_FORMAT,
            "HEAD",
        ];
        let output = self
            .git(&args)
            .map_err(|e| Error::HistoryUnavailable(e.user_message()))?;
        Ok(parse_checkout_history(&output))
    }

    fn branches(&self, scope: RefScope) -> Result<Vec<Branch>> {
        let output = self.git(&[
            "for-each-ref",
            "--sort=-committerdate",
            REF_FORMAT,
            scope.prefix(),
        ])?;
        Ok(parse_ref_listing(&output, scope, Utc::now()))
    }

    fn merge_base(&self, base: &str, rev: &str) -> Result<Option<String>> {
        let output = self.runner.run(&["merge-base", base, rev])?;
        let oid = output.stdout_text().trim().to_string();
        Ok((output.success() && !oid.is_empty()).then_some(oid))
    }

    fn root_commit(&self) -> Result<String> {
        let output = self.git(&["rev-list", "--max-parents=0", "HEAD"])?;
        output
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .last()
            .map(str::to_string)
            .ok_or_else(|| Error::CommandFailed {
                command: "git rev-list --max-parents=0 HEAD".to_string(),
                code: Some(0),
                stderr: "no root commit".to_string(),
            })
    }

    fn unique_authors(&self, base: &str, rev: &str) -> Result<Vec<Author>> {
        let range = format!("{}..{}", base, rev);
        let output = self.git(&["log", AUTHOR_FORMAT, &range, "--"])?;
        Ok(output
            .lines()
            .filter_map(|line| {
                let (email, name) = line.split_once('|')?;
                Some(Author {
                    email: email.trim().to_string(),
                    name: name.trim().to_string(),
                })
            })
            .collect())
    }

    fn recent_commits(&self, rev: &str, limit: usize) -> Result<Vec<CommitInfo>> {
        let count = format!("-n{}", limit);
        let output = self.git(&["log", &count, PREVIEW_FORMAT, rev, "--"])?;
        Ok(output.lines().filter_map(parse_preview_line).collect())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        self.git_differs(&["diff", "--cached", "--quiet"])
    }

    fn has_unstaged_changes(&self) -> Result<bool> {
        self.git_differs(&["diff", "--quiet"])
    }

    fn status_entries(&self) -> Result<Vec<ChangeEntry>> {
        let output = self.git(&["status", "--porcelain=v1", "-z"])?;
        Ok(parse_porcelain(&output))
    }

    fn line_stats(&self, path: &str, staged: bool) -> Result<LineStats> {
        let output = if staged {
            self.git(&["diff", "--numstat", "--cached", "--", path])?
        } else {
            self.git(&["diff", "--numstat", "--", path])?
        };
        Ok(parse_numstat(&output))
    }

    fn diff(&self, path: &str, staged: bool) -> Result<String> {
        if staged {
            self.git(&["diff", "--cached", "--", path])
        } else {
            self.git(&["diff", "--", path])
        }
    }

    fn stage_all(&self) -> Result<()> {
        self.git(&["add", "-A"]).map(drop)
    }

    fn commit(&self, message: &str) -> Result<()> {
        self.git(&["commit", "-m", message]).map(drop)
    }

    fn stash_push(&self, message: &str) -> Result<()> {
        self.git(&["stash", "push", "-m", message]).map(drop)
    }

    fn local_branch_exists(&self, name: &str) -> Result<bool> {
        let refname = format!("refs/heads/{}", name);
        let output = self
            .runner
            .run(&["show-ref", "--verify", "--quiet", &refname])?;
        Ok(output.success())
    }

    fn checkout(&self, name: &str) -> Result<()> {
        self.git(&["checkout", name]).map(drop)
    }

    fn checkout_tracking(&self, name: &str, upstream: &str) -> Result<()> {
        self.git(&["checkout", "-b", name, "--track", upstream])
            .map(drop)
    }
}

/// Parse `refname|committer-date|subject` records from `for-each-ref`.
fn parse_ref_listing(output: &str, scope: RefScope, now: DateTime<Utc>) -> Vec<Branch> {
    let mut branches = Vec::new();

    for line in output.lines() {
        let mut parts = line.splitn(3, '|');
        let (Some(refname), Some(date), Some(subject)) = (parts.next(), parts.next(), parts.next())
        else {
            continue;
        };

        let Some(short) = refname.trim().strip_prefix(scope.prefix()) else {
            continue;
        };
        if short.is_empty() {
            continue;
        }

        let commit_time = parse_commit_date(date.trim()).unwrap_or_else(|| {
            warn!(refname, date, "Unreadable commit date, treating as now");
            now
        });
        let subject = subject.trim();

        match scope {
            RefScope::Local => branches.push(Branch::local(short, commit_time, subject)),
            RefScope::Remote => {
                // "origin/feat"; the symbolic "origin/HEAD" is not a branch.
                let Some((remote, name)) = short.split_once('/') else {
                    continue;
                };
                if name.is_empty() || name == "HEAD" {
                    continue;
                }
                branches.push(Branch::remote(remote, name, commit_time, subject));
            }
        }
    }

    branches
}

fn parse_commit_date(date: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S %z")
        .or_else(|_| DateTime::parse_from_rfc3339(date))
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

fn parse_preview_line(line: &str) -> Option<CommitInfo> {
    let mut parts = line.splitn(4, '|');
    let short_id = parts.next()?.trim().to_string();
    let secs: i64 = parts.next()?.trim().parse().ok()?;
    let author = parts.next()?.trim().to_string();
    let subject = parts.next().unwrap_or("").trim().to_string();
    Some(CommitInfo {
        short_id,
        time: Utc.timestamp_opt(secs, 0).single()?,
        author,
        subject,
    })
}
