mod terminal;

pub use terminal::{install_panic_hook, Terminal};
