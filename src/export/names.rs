// src/export/names.rs

use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};
use tracing::debug;

use super::ExportError;
use crate::fetch::MensaApi;
use crate::meal::Meal;

/// Drop `prefix` from the front of `name` once, if it is there.
pub fn strip_mensa_prefix<'a>(name: &'a str, prefix: &str) -> &'a str {
    name.strip_prefix(prefix).unwrap_or(name)
}

/// Replace the numeric mensa id of every meal with the mensa's name.
///
/// All names are fetched in a single request. An id the API does not know
/// aborts the whole set.
pub async fn resolve_names<A: MensaApi>(
    api: &A,
    meals: Vec<Meal>,
    strip_prefix: &str,
) -> Result<Vec<Meal<String>>> {
    if meals.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<u32> = meals
        .iter()
        .map(|m| m.mensa_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let names: HashMap<u32, String> = api
        .fetch_mensas(&ids)
        .await
        .with_context(|| format!("fetching names for mensas {:?}", ids))?
        .into_iter()
        .map(|(id, name)| {
            let name = strip_mensa_prefix(&name, strip_prefix).to_string();
            (id, name)
        })
        .collect();
    debug!(?names, "resolved mensa names");

    meals
        .into_iter()
        .map(|m| -> Result<Meal<String>> {
            let name = names
                .get(&m.mensa_id)
                .cloned()
                .ok_or(ExportError::UnknownMensa(m.mensa_id))?;
            Ok(m.with_mensa(name))
        })
        .collect()
}
