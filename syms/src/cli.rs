// syms/src/cli.rs
//! Defines the command-line argument structure using clap.
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand};
use syms_common::error::Result;
use syms_common::{Config, DownloadPolicy};
use syms_core::{Adb, BinaryLocator, DeviceSettings, SymbolCacheManager, ZipCodec};
use syms_net::HttpArtifactStore;

pub mod kernel;
pub mod resolve;
pub mod system;
pub mod trusty;

use crate::cli::kernel::Kernel;
use crate::cli::resolve::Resolve;
use crate::cli::system::System;
use crate::cli::trusty::Trusty;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, name = "syms", bin_name = "syms")]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Refresh the system symbols cache for the attached device
    System(System),
    /// Refresh the kernel repo.prop cache for the attached device
    Kernel(Kernel),
    /// Download Trusty application symbols
    Trusty(Trusty),
    /// Resolve an on-device binary path to a local file
    Resolve(Resolve),
}

/// Collaborators shared by every command.
pub struct Context {
    pub manager: Arc<SymbolCacheManager>,
    pub adb: Arc<Adb>,
}

impl Context {
    pub fn build(config: &Config) -> Result<Self> {
        let adb = Arc::new(Adb::from_config(config));
        let store = Arc::new(HttpArtifactStore::from_config(config)?);
        let first_party = !config.local_development && adb.is_first_party_device();
        let policy = DownloadPolicy::evaluate(config.local_development, first_party);
        tracing::debug!("Download policy: {:?}", policy);

        let manager = SymbolCacheManager::from_config(
            config,
            policy,
            store,
            adb.clone(),
            Arc::new(ZipCodec),
        );
        Ok(Self {
            manager: Arc::new(manager),
            adb,
        })
    }

    pub fn locator(&self, config: &Config) -> BinaryLocator {
        BinaryLocator::from_config(config, Arc::clone(&self.manager), self.adb.clone())
    }
}

impl Command {
    pub fn run(&self, config: &Config, ctx: &Context) -> Result<()> {
        match self {
            Self::System(command) => command.run(config, ctx),
            Self::Kernel(command) => command.run(config, ctx),
            Self::Trusty(command) => command.run(config, ctx),
            Self::Resolve(command) => command.run(config, ctx),
        }
    }
}
