mod branch;
mod commit;
mod history;
mod repository;
mod runner;
mod status;
mod vcs;

pub use branch::{strip_remote_suffix, Branch, RefScope, SwitchTarget, REMOTE_SUFFIX};
pub use commit::{relative_time, Author, CommitInfo, Identity};
pub use history::{latest_checkouts, parse_checkout_history, CheckoutRecord};
pub use repository::Repository;
pub use runner::{CommandOutput, GitRunner, ProcessRunner};
pub use status::{has_changes, parse_numstat, parse_porcelain, ChangeEntry, FileStatus, LineStats};
pub use vcs::Vcs;

#[cfg(test)]
pub(crate) mod fake;
