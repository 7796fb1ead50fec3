//! claudeforge CLI - Autonomous development tool using Claude Code
//!
//! This is the entry point for the claudeforge binary.

use anyhow::Result;

fn main() -> Result<()> {
    claudeforge::run()
}
