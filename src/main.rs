use anyhow::Result;
use mensadump::{dump_mensa_to_csv, Config, ExportError, OpenMensaClient};
use std::{fs, sync::Arc};
use tokio::time::Instant;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    let config = Config::load()?;
    fs::create_dir_all(&config.output_dir)?;
    info!(
        mensas = ?config.mensa_ids,
        start = %config.start,
        stop = %config.stop,
        output_dir = %config.output_dir.display(),
        "config loaded"
    );
    let api = Arc::new(OpenMensaClient::new(&config.base_url)?);

    // ─── 3) export one mensa after the other ─────────────────────────
    let started = Instant::now();
    let mut csv_files = Vec::with_capacity(config.mensa_ids.len());
    for &mensa_id in &config.mensa_ids {
        match dump_mensa_to_csv(Arc::clone(&api), mensa_id, &config).await {
            Ok(path) => csv_files.push(path.display().to_string()),
            Err(e) if matches!(e.downcast_ref::<ExportError>(), Some(ExportError::NothingToExport)) => {
                warn!(mensa_id, "no meals found, nothing to export");
            }
            Err(e) => return Err(e),
        }
    }

    info!(elapsed = ?started.elapsed(), "dumped {}", csv_files.join(", "));
    Ok(())
}
