use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;
use crate::resolver::AuthorFilter;

/// Long options also accepted with a single dash (`-remote`, `-author mine`).
const SINGLE_DASH_LONGS: [&str; 3] = ["remote", "author", "config"];

#[derive(Debug, Parser)]
#[command(name = "rb", version)]
#[command(about = "Pick a recently used git branch and switch to it safely", long_about = None)]
pub struct Args {
    /// Number of branches to list
    #[arg(short = 'n', value_name = "COUNT")]
    pub count: Option<usize>,

    /// Include remote-tracking branches with no local counterpart
    #[arg(long, num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub remote: Option<bool>,

    /// `mine`, `all`, or a comma-separated list of author names/emails
    #[arg(long, value_name = "AUTHORS")]
    pub author: Option<String>,

    /// Alternate config file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// What to list, after applying CLI overrides on top of the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: usize,
    pub include_remote: bool,
    pub filter: AuthorFilter,
}

impl Args {
    pub fn parse_env() -> Self {
        Self::parse_from(normalize(std::env::args_os()))
    }

    pub fn try_parse_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        Self::try_parse_from(normalize(args))
    }

    pub fn list_options(&self, config: &Config) -> ListOptions {
        let author = match self.author.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw,
            _ => config.author.as_str(),
        };
        ListOptions {
            limit: self.count.unwrap_or(config.count),
            include_remote: self.remote.unwrap_or(config.include_remote),
            filter: AuthorFilter::parse(author),
        }
    }
}

/// Rewrite `-remote` style arguments to `--remote` so clap sees long options.
fn normalize<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            let Some(rest) = text.strip_prefix('-') else {
                return arg;
            };
            if rest.starts_with('-') {
                return arg;
            }
            let name = rest.split('=').next().unwrap_or(rest);
            if SINGLE_DASH_LONGS.contains(&name) {
                OsString::from(format!("-{}", text))
            } else {
                arg
            }
        })
        .collect()
}
