/// Overall status of a changed file, derived from the two porcelain codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Unmerged,
    Unknown,
}

impl FileStatus {
    /// Precedence: Added > Deleted > Renamed > Copied > Unmerged > Modified.
    pub fn derive(staged: char, worktree: char) -> Self {
        let either = |c: char| staged == c || worktree == c;

        if either('A') {
            FileStatus::Added
        } else if either('D') {
            FileStatus::Deleted
        } else if either('R') {
            FileStatus::Renamed
        } else if either('C') {
            FileStatus::Copied
        } else if either('U') {
            FileStatus::Unmerged
        } else if is_marker(staged) && is_marker(worktree) {
            FileStatus::Unknown
        } else {
            FileStatus::Modified
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            FileStatus::Added => '+',
            FileStatus::Modified => '~',
            FileStatus::Deleted => '-',
            FileStatus::Renamed => '→',
            FileStatus::Copied => 'c',
            FileStatus::Unmerged => '!',
            FileStatus::Unknown => '?',
        }
    }
}

// Untracked/ignored markers carry no change information of their own.
fn is_marker(code: char) -> bool {
    matches!(code, '?' | '!')
}

/// Whether a porcelain code means the file has changes on that side.
pub fn has_changes(code: char) -> bool {
    code != ' ' && code != '?'
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub path: String,
    pub staged: char,
    pub worktree: char,
    pub status: FileStatus,
    pub lines_added: usize,
    pub lines_deleted: usize,
}

impl ChangeEntry {
    pub fn new(path: impl Into<String>, staged: char, worktree: char) -> Self {
        Self {
            path: path.into(),
            staged,
            worktree,
            status: FileStatus::derive(staged, worktree),
            lines_added: 0,
            lines_deleted: 0,
        }
    }

    pub fn is_staged(&self) -> bool {
        has_changes(self.staged)
    }

    pub fn is_unstaged(&self) -> bool {
        has_changes(self.worktree)
    }

    /// "S", "W", "SW" or " " for the file list.
    pub fn sides(&self) -> String {
        let mut sides = String::new();
        if self.is_staged() {
            sides.push('S');
        }
        if self.is_unstaged() {
            sides.push('W');
        }
        if sides.is_empty() {
            sides.push(' ');
        }
        sides
    }
}

/// Parse `git status --porcelain=v1 -z` output. Paths arrive verbatim, one
/// NUL-terminated record each; a rename or copy is followed by an extra
/// record holding the source path.
pub fn parse_porcelain(output: &str) -> Vec<ChangeEntry> {
    let mut entries = Vec::new();
    let mut records = output.split('\0');

    while let Some(record) = records.next() {
        let mut chars = record.chars();
        let (Some(staged), Some(worktree)) = (chars.next(), chars.next()) else {
            continue;
        };
        if matches!(staged, 'R' | 'C') || matches!(worktree, 'R' | 'C') {
            records.next();
        }
        let Some(path) = record.get(3..).filter(|p| !p.is_empty()) else {
            continue;
        };
        entries.push(ChangeEntry::new(path, staged, worktree));
    }

    entries
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineStats {
    pub added: usize,
    pub deleted: usize,
}

impl std::ops::AddAssign for LineStats {
    fn add_assign(&mut self, other: Self) {
        self.added += other.added;
        self.deleted += other.deleted;
    }
}

/// Sum `added\tdeleted\tpath` records. Binary files (`-`) count as zero.
pub fn parse_numstat(output: &str) -> LineStats {
    let mut stats = LineStats::default();
    for line in output.lines() {
        let mut fields = line.split('\t');
        let (Some(added), Some(deleted), Some(_path)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        stats.added += added.trim().parse::<usize>().unwrap_or(0);
        stats.deleted += deleted.trim().parse::<usize>().unwrap_or(0);
    }
    stats
}
