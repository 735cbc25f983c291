//! Contains the logic for the `kernel` command.
use std::path::PathBuf;

use syms_common::config::Config;
use syms_common::error::Result;

use super::Context;
use crate::report_outcome;

#[derive(clap::Args, Debug)]
pub struct Kernel {
    /// Directory for the kernel repo.prop cache (defaults to SYMBOLS_DIR/kernel)
    #[arg(long)]
    pub symbols_dir: Option<PathBuf>,
}

impl Kernel {
    pub fn run(&self, config: &Config, ctx: &Context) -> Result<()> {
        let symbols_dir = self
            .symbols_dir
            .clone()
            .unwrap_or_else(|| config.kernel_symbols_dir().to_path_buf());
        let outcome = ctx.manager.refresh_kernel_repo_properties(&symbols_dir)?;
        report_outcome("kernel repo.prop", &outcome);
        Ok(())
    }
}
