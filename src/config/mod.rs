mod theme;

pub use theme::{Theme, ThemeName};

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::resolver::ResolverOptions;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default for `-n`.
    pub count: usize,
    /// Default for `-remote`.
    pub include_remote: bool,
    /// Default for `-author`.
    pub author: String,
    pub base_branches: Vec<String>,
    /// Keep branches without commits of their own when filtering by author.
    pub include_merged_branches: bool,
    /// Per git invocation. 0 disables the timeout.
    pub command_timeout_secs: u64,
    pub preview_commits: usize,
    pub diff_preview_lines: usize,
    pub theme: ThemeName,
    pub log_file: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            count: 10,
            include_remote: false,
            author: "mine".to_string(),
            base_branches: ResolverOptions::default().base_branches,
            include_merged_branches: false,
            command_timeout_secs: 30,
            preview_commits: 5,
            diff_preview_lines: 5,
            theme: ThemeName::Dark,
            log_file: None,
            log_level: "debug".to_string(),
        }
    }
}

impl Config {
    /// Read `path`, or the default location when `None`. A missing file
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e.to_string().trim())))
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("recent-branches")
            .join("config.toml")
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string().trim().to_string()))
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            base_branches: self.base_branches.clone(),
            include_merged: self.include_merged_branches,
        }
    }

    pub fn current_theme(&self) -> Theme {
        match self.theme {
            ThemeName::Dark => Theme::dark(),
            ThemeName::Light => Theme::light(),
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = match self.theme {
            ThemeName::Dark => ThemeName::Light,
            ThemeName::Light => ThemeName::Dark,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn parses_known_keys() {
        let config = Config::parse(
            r#"
count = 20
include_remote = true
author = "alice,bob"
base_branches = ["trunk"]
include_merged_branches = true
command_timeout_secs = 0
theme = "light"
log_level = "info"
"#,
        )
        .unwrap();

        assert_eq!(config.count, 20);
        assert!(config.include_remote);
        assert_eq!(config.author, "alice,bob");
        assert_eq!(config.theme, ThemeName::Light);
        assert_eq!(config.command_timeout(), Duration::ZERO);
        assert_eq!(config.preview_commits, 5);

        let options = config.resolver_options();
        assert_eq!(options.base_branches, vec!["trunk".to_string()]);
        assert!(options.include_merged);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(Config::parse("count = \"ten\""), Err(Error::Config(_))));
        assert!(matches!(Config::parse("theme = \"neon\""), Err(Error::Config(_))));
        assert!(matches!(Config::parse("colour = 1"), Err(Error::Config(_))));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "count = 3\n").unwrap();
        assert_eq!(Config::load(Some(&path)).unwrap().count, 3);
    }

    #[test]
    fn toggle_theme_flips() {
        let mut config = Config::default();
        config.toggle_theme();
        assert_eq!(config.theme, ThemeName::Light);
        config.toggle_theme();
        assert_eq!(config.theme, ThemeName::Dark);
    }
}
