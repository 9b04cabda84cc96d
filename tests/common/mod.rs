#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use git2::{Repository as Git2Repository, RepositoryInitOptions};
use tempfile::TempDir;

use recent_branches::git::Repository;

/// Fixed clock for fixture commits and checkouts (2023-11-14).
pub const T0: i64 = 1_700_000_000;
pub const HOUR: i64 = 3_600;

/// Throwaway repository on `main` with one commit by Alice.
pub struct TestRepo {
    pub dir: TempDir,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("main");
        Git2Repository::init_opts(dir.path(), &opts).unwrap();

        let repo = Self { dir };
        repo.git(&["config", "user.name", "Alice"]);
        repo.git(&["config", "user.email", "alice@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.commit_file("README.md", "# fixture\n", "Initial commit", T0);
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn repository(&self) -> Repository {
        Repository::discover_from(self.path(), Duration::from_secs(30)).unwrap()
    }

    fn command(&self, args: &[&str], secs: i64) -> Command {
        let date = format!("@{} +0000", secs);
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(self.path())
            .env("GIT_CONFIG_NOSYSTEM", "1")
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date);
        cmd
    }

    fn run(&self, mut cmd: Command, args: &[&str]) -> String {
        let output = cmd.output().unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    pub fn git(&self, args: &[&str]) -> String {
        self.git_at(T0, args)
    }

    /// Run git with author, committer and reflog times pinned to `secs`.
    pub fn git_at(&self, secs: i64, args: &[&str]) -> String {
        self.run(self.command(args, secs), args)
    }

    pub fn write(&self, file: &str, content: &str) {
        fs::write(self.path().join(file), content).unwrap();
    }

    pub fn commit_file(&self, file: &str, content: &str, message: &str, secs: i64) {
        self.write(file, content);
        self.git_at(secs, &["add", file]);
        self.git_at(secs, &["commit", "-q", "-m", message]);
    }

    pub fn commit_as(&self, name: &str, email: &str, file: &str, message: &str, secs: i64) {
        self.write(file, message);
        self.git_at(secs, &["add", file]);
        let author = format!("{} <{}>", name, email);
        self.git_at(secs, &["commit", "-q", "--author", &author, "-m", message]);
    }

    pub fn checkout(&self, branch: &str, secs: i64) {
        self.git_at(secs, &["checkout", "-q", branch]);
    }

    pub fn current(&self) -> String {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"]).trim().to_string()
    }
}
