pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod guard;
pub mod input;
pub mod logger;
pub mod resolver;
pub mod switch;
pub mod tui;
pub mod views;
pub mod workflow;

pub use error::{Error, Result};
