// FILE: crates/cli/src/main.rs

use anyhow::{Context, Result};
use clap::{Arg, ArgMatches, Command};
use geoexport_config::{Config, ConfigManager};
use std::path::PathBuf;

mod commands;
mod notifier;

fn build_cli() -> Command {
    Command::new("geoexport")
        .version(env!("CARGO_PKG_VERSION"))
        .author("geoexport contributors")
        .about("Browse and download dataset exports from a remote export service")
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .value_name("URL")
                .help("Export service URL, overrides the configured one")
                .global(true),
        )
        .arg(
            Arg::new("config-dir")
                .long("config-dir")
                .value_name("DIR")
                .help("Directory holding config.toml")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(Command::new("list").about("List the exports offered by the service"))
        .subcommand(
            Command::new("download")
                .about("Download an export")
                .arg(Arg::new("id").required(true).value_name("ID").help("Export id, as shown by 'list'"))
                .arg(Arg::new("format").required(true).value_name("FORMAT").help("Export format key, e.g. csv"))
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("DIR")
                        .help("Target directory, overrides the configured one")
                        .value_parser(clap::value_parser!(PathBuf)),
                ),
        )
        .subcommand(Command::new("formats").about("List known export formats"))
        .subcommand(
            Command::new("config")
                .about("Manage the configuration file")
                .subcommand(Command::new("init").about("Write a default config file if none exists"))
                .subcommand(Command::new("show").about("Print the effective configuration"))
                .subcommand(Command::new("path").about("Print the config file location")),
        )
}

fn config_manager(matches: &ArgMatches) -> Result<ConfigManager> {
    match matches.get_one::<PathBuf>("config-dir") {
        Some(dir) => ConfigManager::with_directory(dir.clone()),
        None => ConfigManager::new(),
    }
    .context("Failed to locate configuration directory")
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let manager = config_manager(&matches)?;

    // The logger level comes from the config, so load problems are reported after init
    let (mut config, load_error) = match manager.load_with_env_overrides() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.app.log_level.to_string()),
    )
    .init();

    if let Some(e) = load_error {
        log::warn!("Failed to load config: {}, using defaults", e);
    }

    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config.service.base_url = base_url.clone();
    }

    match matches.subcommand() {
        Some(("list", _)) => commands::list_exports(&config).await,
        Some(("download", sub_matches)) => {
            let id = sub_matches
                .get_one::<String>("id")
                .ok_or_else(|| anyhow::anyhow!("Export id is required"))?;
            let format = sub_matches
                .get_one::<String>("format")
                .ok_or_else(|| anyhow::anyhow!("Format is required"))?;
            let output = sub_matches.get_one::<PathBuf>("output").map(PathBuf::as_path);

            commands::download_export(&config, id, format, output)
                .await
                .map(|_| ())
        }
        Some(("formats", _)) => {
            commands::list_formats();
            Ok(())
        }
        Some(("config", sub_matches)) => run_config_command(&manager, &config, sub_matches),
        _ => {
            build_cli().print_help()?;
            Ok(())
        }
    }
}

fn run_config_command(manager: &ConfigManager, config: &Config, matches: &ArgMatches) -> Result<()> {
    match matches.subcommand() {
        Some(("init", _)) => commands::init_config(manager),
        Some(("show", _)) => {
            commands::show_config(config);
            Ok(())
        }
        Some(("path", _)) => {
            println!("{}", manager.config_path().display());
            Ok(())
        }
        _ => {
            let mut cli = build_cli();
            if let Some(config_cli) = cli.find_subcommand_mut("config") {
                config_cli.print_help()?;
            }
            Ok(())
        }
    }
}
