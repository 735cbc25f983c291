//! Contains the logic for the `resolve` command.
use syms_common::config::Config;
use syms_common::error::{Result, SymsError};

use super::Context;

#[derive(clap::Args, Debug)]
pub struct Resolve {
    /// Binary path as seen on the device, e.g. /system/lib64/libc.so
    pub binary_path: String,
}

impl Resolve {
    pub fn run(&self, config: &Config, ctx: &Context) -> Result<()> {
        match ctx.locator(config).resolve(&self.binary_path) {
            Some(local) => {
                println!("{}", local.display());
                Ok(())
            }
            None => Err(SymsError::Generic(format!(
                "No local copy of {} found",
                self.binary_path
            ))),
        }
    }
}
