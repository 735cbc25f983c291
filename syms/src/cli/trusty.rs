//! Contains the logic for the `trusty` command.
use std::path::PathBuf;

use syms_common::config::Config;
use syms_common::error::Result;

use super::Context;
use crate::report_outcome;

#[derive(clap::Args, Debug)]
pub struct Trusty {
    /// Trusted application name, e.g. `keymaster`
    #[arg(long)]
    pub app: String,

    /// Build id to fetch; defaults to the latest build on the Trusty branch
    #[arg(long)]
    pub build_id: Option<String>,

    /// Output directory (defaults to SYMBOLS_DIR/trusty)
    #[arg(long)]
    pub symbols_dir: Option<PathBuf>,
}

impl Trusty {
    pub fn run(&self, config: &Config, ctx: &Context) -> Result<()> {
        let symbols_dir = self
            .symbols_dir
            .clone()
            .unwrap_or_else(|| config.trusty_symbols_dir().to_path_buf());
        let outcome = ctx.manager.refresh_trusty_symbols(
            &symbols_dir,
            &self.app,
            self.build_id.as_deref(),
        )?;
        report_outcome("trusty symbols", &outcome);
        Ok(())
    }
}
