pub mod cli;
pub mod load_config;
pub mod narrative;

pub use cli::{run, Cli, Commands};
