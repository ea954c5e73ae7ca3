pub mod app;
pub mod cli;
pub mod config;
pub mod csv_loader;
pub mod logging;
pub mod utils;

pub use app::{App, run};
pub use cli::{Cli, Command};
