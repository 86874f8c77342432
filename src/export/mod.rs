// src/export/mod.rs

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use futures::{stream, StreamExt};
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::dates::date_ranges;
use crate::fetch::MensaApi;
use crate::meal::Meal;

pub mod names;
pub mod write;

pub use names::{resolve_names, strip_mensa_prefix};
pub use write::dump_meals;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("nothing to export")]
    NothingToExport,

    #[error("no name returned for mensa {0}")]
    UnknownMensa(u32),
}

/// Fetch the meals of `mensa_id` for every date in `dates`, one after the
/// other. A failing date is logged and contributes nothing.
pub async fn fetch_date_range<A: MensaApi>(api: &A, dates: &[String], mensa_id: u32) -> Vec<Meal> {
    let mut meals = Vec::new();
    for date in dates {
        match api.fetch_meals(mensa_id, date).await {
            Ok(day) => meals.extend(day),
            Err(e) => warn!(mensa_id, date = %date, error = %e, "fetching meals failed"),
        }
    }
    meals
}

fn chunk_bounds(chunk: &[String]) -> String {
    match (chunk.first(), chunk.last()) {
        (Some(first), Some(last)) => format!("{}..={}", first, last),
        _ => "empty".to_string(),
    }
}

/// Download every meal of `mensa_id` between `config.start` and
/// `config.stop`, name the mensa and write it all to one CSV file.
///
/// Dates are split into chunks of `config.chunk_size`; up to
/// `config.workers` chunks are fetched at once, each on its own task.
/// Returns the path of the written file.
#[instrument(level = "info", skip(api, config))]
pub async fn dump_mensa_to_csv<A: MensaApi + 'static>(
    api: Arc<A>,
    mensa_id: u32,
    config: &Config,
) -> Result<PathBuf> {
    let start = Instant::now();
    let chunks = date_ranges(config.start, config.stop, config.chunk_size);
    info!(chunks = chunks.len(), workers = config.workers, "fetching meals");

    let mut tasks = stream::iter(chunks)
        .map(|chunk| {
            let api = Arc::clone(&api);
            let bounds = chunk_bounds(&chunk);
            let handle =
                tokio::spawn(async move { fetch_date_range(api.as_ref(), &chunk, mensa_id).await });
            async move { (bounds, handle.await) }
        })
        .buffer_unordered(config.workers);

    let mut meals = Vec::new();
    let mut lost = 0usize;
    while let Some((bounds, res)) = tasks.next().await {
        match res {
            Ok(chunk_meals) => meals.extend(chunk_meals),
            Err(e) => {
                lost += 1;
                error!(mensa_id, chunk = %bounds, error = %e, "chunk worker died, its meals are lost");
            }
        }
    }
    info!(meals = meals.len(), lost_chunks = lost, elapsed = ?start.elapsed(), "fetched");

    let named = resolve_names(api.as_ref(), meals, &config.strip_prefix)
        .await
        .with_context(|| format!("resolving name of mensa {}", mensa_id))?;

    let path = config.csv_path(mensa_id);
    let rows = dump_meals(&named, &path).with_context(|| format!("exporting mensa {}", mensa_id))?;
    info!(path = %path.display(), rows, elapsed = ?start.elapsed(), "mensa done");

    Ok(path)
}
