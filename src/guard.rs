use tracing::{debug, warn};

use crate::error::Result;
use crate::git::{ChangeEntry, Vcs};

pub const STAGED_HEADER: &str = "=== Staged Changes ===";
pub const UNSTAGED_HEADER: &str = "=== Unstaged Changes ===";
pub const NO_CHANGES: &str = "No changes to display";

/// Inspects the working tree before a switch.
pub struct ChangeGuard<'a, V: Vcs> {
    vcs: &'a V,
}

impl<'a, V: Vcs> ChangeGuard<'a, V> {
    pub fn new(vcs: &'a V) -> Self {
        Self { vcs }
    }

    /// Staged or unstaged edits to tracked files. Untracked files do not count.
    pub fn has_uncommitted_changes(&self) -> Result<bool> {
        Ok(self.vcs.has_staged_changes()? || self.vcs.has_unstaged_changes()?)
    }

    /// Per-file breakdown with line counts. A failed count leaves zeros.
    pub fn status(&self) -> Result<Vec<ChangeEntry>> {
        let mut entries = self.vcs.status_entries()?;

        for entry in &mut entries {
            let mut sides = Vec::with_capacity(2);
            if entry.is_staged() {
                sides.push(true);
            }
            if entry.is_unstaged() {
                sides.push(false);
            }

            for staged in sides {
                match self.vcs.line_stats(&entry.path, staged) {
                    Ok(stats) => {
                        entry.lines_added += stats.added;
                        entry.lines_deleted += stats.deleted;
                    }
                    Err(e) => {
                        warn!(path = %entry.path, staged, error = %e, "Line count unavailable");
                    }
                }
            }
        }

        debug!(files = entries.len(), "Collected working tree status");
        Ok(entries)
    }

    /// Staged and unstaged diff of one path, each under its own header.
    /// A side whose diff cannot be read is left out; fails only when
    /// neither side can be read.
    pub fn diff(&self, path: &str) -> Result<String> {
        let mut blocks = Vec::new();
        let mut failure = None;
        let mut read_any = false;

        for (staged, header) in [(true, STAGED_HEADER), (false, UNSTAGED_HEADER)] {
            match self.vcs.diff(path, staged) {
                Ok(text) => {
                    read_any = true;
                    if !text.trim().is_empty() {
                        blocks.push(format!("{}\n{}", header, text.trim_end()));
                    }
                }
                Err(e) => {
                    debug!(path, staged, error = %e, "Diff unavailable");
                    failure = Some(e);
                }
            }
        }

        if let (false, Some(e)) = (read_any, failure) {
            return Err(e);
        }
        if blocks.is_empty() {
            Ok(NO_CHANGES.to_string())
        } else {
            Ok(blocks.join("\n\n"))
        }
    }
}
