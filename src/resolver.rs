use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::git::{latest_checkouts, relative_time, Author, Branch, Identity, RefScope, Vcs};

/// Shared integration branches that survive every author filter.
const ALWAYS_LISTED: [&str; 2] = ["main", "master"];

/// Which commit authors make a branch "relevant".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorFilter {
    All,
    /// The configured identity of the invoking user, matched exactly.
    Mine,
    /// Case-insensitive substrings of author name or email.
    Names(Vec<String>),
}

impl AuthorFilter {
    /// `mine`, `all`, or a comma-separated list. Blank input and lists with
    /// no usable entries mean `Mine`.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("mine") {
            return AuthorFilter::Mine;
        }
        if raw.eq_ignore_ascii_case("all") {
            return AuthorFilter::All;
        }

        let names: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if names.is_empty() {
            AuthorFilter::Mine
        } else {
            AuthorFilter::Names(names)
        }
    }

    /// Label for the title line; `None` when nothing is filtered.
    pub fn label(&self) -> Option<String> {
        match self {
            AuthorFilter::All => None,
            AuthorFilter::Mine => Some("my".to_string()),
            AuthorFilter::Names(names) => Some(names.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Merge-base candidates, tried in order.
    pub base_branches: Vec<String>,
    /// Keep branches that have no commits of their own.
    pub include_merged: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            base_branches: ["main", "master", "develop", "dev"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            include_merged: false,
        }
    }
}

enum Matcher {
    Identity(Identity),
    Names(Vec<String>),
}

impl Matcher {
    fn matches(&self, author: &Author) -> bool {
        match self {
            Matcher::Identity(identity) => identity.matches(author),
            Matcher::Names(needles) => {
                let email = author.email.to_lowercase();
                let name = author.name.to_lowercase();
                needles
                    .iter()
                    .any(|n| email.contains(n.as_str()) || name.contains(n.as_str()))
            }
        }
    }
}

/// Builds the ranked, filtered branch list.
pub struct Resolver<'a, V: Vcs> {
    vcs: &'a V,
    options: ResolverOptions,
}

impl<'a, V: Vcs> Resolver<'a, V> {
    pub fn new(vcs: &'a V, options: ResolverOptions) -> Self {
        Self { vcs, options }
    }

    pub fn resolve(
        &self,
        limit: usize,
        include_remote: bool,
        filter: &AuthorFilter,
    ) -> Result<Vec<Branch>> {
        self.resolve_at(limit, include_remote, filter, Utc::now())
    }

    pub fn resolve_at(
        &self,
        limit: usize,
        include_remote: bool,
        filter: &AuthorFilter,
        now: DateTime<Utc>,
    ) -> Result<Vec<Branch>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        self.vcs.ensure_repository()?;

        let history = self.vcs.checkout_history()?;
        let mut last_used = latest_checkouts(&history);

        let current = self.vcs.current_branch().unwrap_or_else(|e| {
            warn!(error = %e, "Could not read current branch");
            None
        });
        if let Some(current) = &current {
            last_used.insert(current.clone(), now);
        }

        let mut branches = self.enumerate(include_remote)?;
        let listed = branches.len();

        if let Some(matcher) = self.matcher(filter) {
            branches.retain(|branch| self.passes(branch, &matcher));
        }
        debug!(listed, kept = branches.len(), ?filter, "Applied author filter");

        for branch in &mut branches {
            let used = last_checkout(&last_used, branch).unwrap_or(branch.commit_time);
            // Future-dated commits must not outrank the current branch.
            branch.last_used = used.min(now);
        }

        branches.sort_by(|a, b| b.last_used.cmp(&a.last_used));

        if let Some(current) = &current {
            if let Some(pos) = branches
                .iter()
                .position(|b| !b.is_remote && &b.name == current)
            {
                let branch = branches.remove(pos);
                branches.insert(0, branch);
            }
        }

        branches.truncate(limit);
        for branch in &mut branches {
            branch.relative_time = relative_time(branch.last_used, now);
        }

        info!(count = branches.len(), include_remote, "Resolved recent branches");
        Ok(branches)
    }

    /// Local branches, plus remote ones no local branch shadows.
    fn enumerate(&self, include_remote: bool) -> Result<Vec<Branch>> {
        let mut branches = self.vcs.branches(RefScope::Local)?;
        if !include_remote {
            return Ok(branches);
        }

        let remotes = match self.vcs.branches(RefScope::Remote) {
            Ok(remotes) => remotes,
            Err(e) => {
                warn!(error = %e, "Skipping remote branches");
                return Ok(branches);
            }
        };

        let mut seen: HashSet<String> = branches.iter().map(|b| b.name.clone()).collect();
        for branch in remotes {
            if seen.insert(branch.ref_name().to_string()) {
                branches.push(branch);
            }
        }
        Ok(branches)
    }

    fn matcher(&self, filter: &AuthorFilter) -> Option<Matcher> {
        match filter {
            AuthorFilter::All => None,
            AuthorFilter::Names(names) if names.is_empty() => None,
            AuthorFilter::Names(names) => Some(Matcher::Names(
                names.iter().map(|n| n.to_lowercase()).collect(),
            )),
            AuthorFilter::Mine => match self.vcs.identity() {
                Ok(identity) if !identity.is_empty() => Some(Matcher::Identity(identity)),
                Ok(_) => {
                    warn!("No user.email or user.name configured, listing all authors");
                    None
                }
                Err(e) => {
                    warn!(error = %e, "Could not read identity, listing all authors");
                    None
                }
            },
        }
    }

    fn passes(&self, branch: &Branch, matcher: &Matcher) -> bool {
        if ALWAYS_LISTED.contains(&branch.ref_name()) {
            return true;
        }

        let rev = branch.rev();
        let authors = match self.unique_authors(&rev) {
            Ok(authors) => authors,
            Err(e) => {
                warn!(branch = %branch.name, error = %e, "Author lookup failed, keeping branch");
                return true;
            }
        };

        if authors.is_empty() {
            debug!(branch = %branch.name, "No unique commits");
            return self.options.include_merged;
        }
        authors.iter().any(|a| matcher.matches(a))
    }

    fn unique_authors(&self, rev: &str) -> Result<Vec<Author>> {
        let base = self.base_for(rev)?;
        self.vcs.unique_authors(&base, rev)
    }

    fn base_for(&self, rev: &str) -> Result<String> {
        for candidate in &self.options.base_branches {
            if candidate == rev {
                continue;
            }
            if let Some(oid) = self.vcs.merge_base(candidate, rev)? {
                return Ok(oid);
            }
        }
        self.vcs.root_commit()
    }
}

/// Checkout history names local branches plainly. A remote-only branch is
/// matched as `<remote>/<name>` first, then by the local name it was last
/// checked out under.
fn last_checkout(last_used: &HashMap<String, DateTime<Utc>>, branch: &Branch) -> Option<DateTime<Utc>> {
    if branch.is_remote {
        last_used
            .get(&branch.rev())
            .or_else(|| last_used.get(branch.ref_name()))
            .copied()
    } else {
        last_used.get(&branch.name).copied()
    }
}
