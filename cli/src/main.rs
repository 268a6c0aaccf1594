#![deny(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::path::Path;

use crate::app_config::AppConfig;
use args::{CliArgs, Command};
use clap::{CommandFactory, Parser};
use commands::{
    config::config_cmd,
    download::{download_all_cmd, download_incremental_cmd},
};
use logging::setup_tracing;
use profile::{get_profile_path, Profile};

mod app_config;
mod args;
mod commands;
mod logging;
mod profile;

#[cfg(test)]
mod test;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    let Some(command) = args.command else {
        CliArgs::command().print_help()?;
        return Ok(());
    };

    let profile_path = get_profile_path(&args.config.profile_path);
    let profile = Profile::from_path(&profile_path)?;

    match command {
        Command::Config(credentials) => {
            let config =
                AppConfig::from_args(args.config, credentials, &profile_path, profile.as_ref());
            config_cmd(&config)?;
        }
        Command::DownloadAll(download) => {
            let config = AppConfig::from_args(
                args.config,
                download.credentials,
                &profile_path,
                profile.as_ref(),
            );
            setup_tracing(config.verbose, None);
            download_all_cmd(&config, download.all_versions)?;
        }
        Command::DownloadIncremental(download) => {
            let config = AppConfig::from_args(
                args.config,
                download.credentials,
                &profile_path,
                profile.as_ref(),
            );
            setup_tracing(config.verbose, Some(Path::new(&config.log_path)));
            download_incremental_cmd(&config, download.all_versions)?;
        }
    }

    Ok(())
}
