// FILE: crates/cli/src/commands.rs

use crate::notifier::ConsoleNotifier;
use anyhow::{anyhow, bail, Context, Result};
use console::style;
use geoexport_config::{CollisionMode, Config, ConfigManager};
use geoexport_core::{ExportDescriptor, ExportFormat, ExportId};
use geoexport_network::{
    Client, ClientConfig, CollisionPolicy, DownloadOptions, DownloadProgress, ExportService,
    FileSaver, NetworkError,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// List the exports offered by the service
pub async fn list_exports(config: &Config) -> Result<()> {
    let service = build_service(config, None)?;
    service
        .fetch_catalog()
        .await
        .context("Failed to fetch export catalog")?;

    let exports = service.exports();
    if exports.is_empty() {
        println!("No exports offered by {}", service.base_url());
        return Ok(());
    }

    println!("\n{} Exports", style(exports.len()).bold().cyan());
    println!("{}", "=".repeat(80));

    for export in &exports {
        print_export_summary(export);
    }

    Ok(())
}

fn print_progress(progress: DownloadProgress) {
    print!("\r  Progress: {:<12}", progress.to_string());
    std::io::stdout().flush().ok();
}

/// Short error for a failed download; the notifier has already shown the
/// details
fn download_failure(id: ExportId, err: &NetworkError) -> anyhow::Error {
    match err {
        NetworkError::Cancelled => anyhow!("Download of export {} cancelled", id),
        _ => anyhow!("Download of export {} failed", id),
    }
}

/// Download an export into the configured or given directory
pub async fn download_export(
    config: &Config,
    id: &str,
    format: &str,
    output: Option<&Path>,
) -> Result<PathBuf> {
    let id: ExportId = id.parse().context("Invalid export id")?;

    if ExportFormat::from_key(format).is_none() {
        let known: Vec<&str> = ExportFormat::ALL.iter().map(|f| f.key()).collect();
        eprintln!(
            "{} Unknown format '{}' (known: {}), requesting it anyway",
            style("!").yellow().bold(),
            format,
            known.join(", ")
        );
    }

    let service = build_service(config, output)?;
    service
        .fetch_catalog()
        .await
        .context("Failed to fetch export catalog")?;

    let Some(descriptor) = service.find_export(id) else {
        bail!("No export with id {} at {}", id, service.base_url());
    };

    println!(
        "{} {} as {}",
        style("↓").cyan().bold(),
        style(&descriptor.label).bold(),
        format
    );

    let mut progress = service.state().progress.subscribe();
    let monitor = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let current = *progress.borrow_and_update();
            print_progress(current);
        }
    });

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = service
        .download_with(&descriptor, format, DownloadOptions::default().with_cancel(cancel))
        .await;

    monitor.abort();
    interrupt.abort();
    if result.is_ok() {
        // The monitor may not have drawn the last update before the abort
        print_progress(service.state().progress.get());
    }
    println!();

    let path = result.map_err(|e| download_failure(id, &e))?;
    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    println!(
        "{} Saved {} ({})",
        style("✓").green().bold(),
        path.display(),
        format_size(size)
    );

    Ok(path)
}

/// Print the known export formats
pub fn list_formats() {
    println!("\n{}", style("Export Formats").bold().cyan());
    println!("{}", "=".repeat(80));
    for format in ExportFormat::ALL {
        println!("  {:<6} {}", style(format.key()).bold(), format.mime());
    }
}

/// Write a default config file unless one exists
pub fn init_config(manager: &ConfigManager) -> Result<()> {
    let created = manager
        .initialize()
        .context("Failed to write default configuration")?;

    if created {
        println!(
            "{} Config written to {}",
            style("✓").green().bold(),
            manager.config_path().display()
        );
    } else {
        println!("Config already exists at {}", manager.config_path().display());
    }

    Ok(())
}

/// Print the effective configuration
pub fn show_config(config: &Config) {
    println!("\n{}", style("Configuration").bold().cyan());
    println!("{}", "=".repeat(80));
    println!("Version: {}", config.version);

    println!("\n[app]");
    println!("  Log level: {}", config.app.log_level);

    println!("\n[service]");
    println!("  Base URL: {}", config.service.base_url);
    match config.service.timeout() {
        Some(timeout) => println!("  Timeout: {}s", timeout.as_secs()),
        None => println!("  Timeout: none"),
    }
    println!("  User agent: {}", config.service.user_agent);
    println!("  Max redirects: {}", config.service.max_redirects);

    println!("\n[downloads]");
    println!("  Directory: {}", config.downloads.directory.display());
    println!("  Default file name: {}", config.downloads.default_file_name);
    println!("  On collision: {}", config.downloads.on_collision);

    if let Err(errors) = config.validate() {
        println!("\n{}", style("Problems").bold().yellow());
        for error in errors {
            println!("  {}", error);
        }
    }
}

/// Wires a service from configuration
///
/// `output` replaces the configured download directory.
pub fn build_service(config: &Config, output: Option<&Path>) -> Result<ExportService> {
    let client = Client::with_config(ClientConfig {
        timeout: config.service.timeout(),
        user_agent: config.service.user_agent.clone(),
        max_redirects: config.service.max_redirects,
    })
    .context("Failed to create HTTP client")?;

    let directory = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.downloads.directory.clone());
    let saver = FileSaver::new(directory)
        .with_default_file_name(config.downloads.default_file_name.clone())
        .with_collision_policy(collision_policy(config.downloads.on_collision));

    let service = ExportService::new(&config.service.base_url, Arc::new(client))
        .context("Invalid export service URL")?
        .with_notifier(Arc::new(ConsoleNotifier))
        .with_saver(Arc::new(saver));

    Ok(service)
}

fn collision_policy(mode: CollisionMode) -> CollisionPolicy {
    match mode {
        CollisionMode::Rename => CollisionPolicy::Rename,
        CollisionMode::Overwrite => CollisionPolicy::Overwrite,
    }
}

fn print_export_summary(export: &ExportDescriptor) {
    println!("\n{} {}", style(format!("[{}]", export.id)).dim(), style(&export.label).bold());
    print!("  View: {}", export.qualified_view());
    if let (Some(field), Some(srid)) = (&export.geometry_field, export.geometry_srid) {
        print!(" | Geometry: {} (EPSG:{})", field, srid);
    }
    println!();
    if !export.desc.is_empty() {
        println!("  {}", truncate(&export.desc, 72));
    }
}

fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => format!("{}...", &s[..end]),
        None => s.to_string(),
    }
}
