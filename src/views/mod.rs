mod branches;
pub mod logs;
mod preview;
pub mod switch_modal;

pub use branches::BranchesView;
pub use preview::PreviewView;

/// Cut `text` to at most `max` characters, ending in "..." when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}
