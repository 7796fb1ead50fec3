//! CLI command implementations
//!
//! One module per subcommand, each exposing its clap `Args` struct and a
//! `cmd_*` entry point.

mod analyze;
mod config;
mod daemon;
mod run;

pub use analyze::{AnalyzeArgs, cmd_analyze};
pub use config::{ConfigArgs, cmd_config};
pub use daemon::{DaemonArgs, cmd_daemon};
pub use run::{RunArgs, cmd_run};
