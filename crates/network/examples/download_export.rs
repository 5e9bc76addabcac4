// crates/network/examples/download_export.rs
//! Lists the exports of a service and downloads the first one as CSV
//!
//! Usage: cargo run --example download_export -- [BASE_URL] [OUTPUT_DIR]
//!
//! The export is saved to OUTPUT_DIR, the current directory by default.

use geoexport_network::{Client, ExportService, FileSaver};
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let base_url = args
        .next()
        .unwrap_or_else(|| "http://localhost:8000/api/exports".to_string());
    let target = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    let service = ExportService::new(&base_url, Arc::new(Client::new()?))?
        .with_saver(Arc::new(FileSaver::new(&target)));

    println!("📋 Fetching catalog from {}...\n", base_url);
    service.fetch_catalog().await?;

    let exports = service.exports();
    for export in &exports {
        println!("   {}", export);
    }

    let Some(first) = exports.first() else {
        println!("\nNo exports configured.");
        return Ok(());
    };

    // Print progress while the download runs
    let mut progress = service.state().progress.subscribe();
    let monitor = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let current = *progress.borrow_and_update();
            print!("\r   Progress: {}", current);
            std::io::Write::flush(&mut std::io::stdout()).ok();
        }
    });

    println!("\n📥 Downloading {} as csv...", first.label);
    match service.download(first, "csv").await {
        Ok(path) => println!("\n   ✓ Saved to {}", path.display()),
        Err(e) => println!("\n   ✗ Download failed: {}", e),
    }

    monitor.abort();
    Ok(())
}
