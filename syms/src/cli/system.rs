//! Contains the logic for the `system` command.
use std::path::PathBuf;

use syms_common::config::Config;
use syms_common::error::Result;

use super::Context;
use crate::report_outcome;

#[derive(clap::Args, Debug)]
pub struct System {
    /// Symbols directory to refresh (defaults to SYMBOLS_DIR)
    #[arg(long)]
    pub symbols_dir: Option<PathBuf>,
}

impl System {
    pub fn run(&self, config: &Config, ctx: &Context) -> Result<()> {
        let symbols_dir = self
            .symbols_dir
            .clone()
            .unwrap_or_else(|| config.symbols_dir.clone());
        tracing::debug!("Refreshing system symbols in {}", symbols_dir.display());
        let outcome = ctx.manager.refresh_system_symbols(&symbols_dir)?;
        report_outcome("system symbols", &outcome);
        Ok(())
    }
}
