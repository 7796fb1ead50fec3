//! Output utilities for CLI commands
//!
//! This module provides terminal output helpers including a spinner for
//! long-running sessions and actionable error formatting for GitHub
//! failures.

pub mod errors;
pub mod spinner;

pub use errors::format_github_error;
pub use spinner::CommandSpinner;
