pub mod cli;
pub mod load_config;

pub use cli::{exit_code_for, run, Cli};
