// src/export/write.rs

use std::{fmt::Display, path::Path};

use anyhow::{Context, Result};
use tracing::info;

use super::ExportError;
use crate::meal::{Meal, MEAL_FIELDS};

/// Write `meals` as CSV to `path`, replacing any existing file.
///
/// The header always comes from [`MEAL_FIELDS`]. Prices keep their decimal
/// point (`2.0`), unknown prices are left empty and `notes` is written as its list rendering (`["a", "b"]`).
/// Returns the number of data rows.
pub fn dump_meals<M: Display>(meals: &[Meal<M>], path: &Path) -> Result<usize> {
    if meals.is_empty() {
        return Err(ExportError::NothingToExport.into());
    }

    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating csv {}", path.display()))?;
    wtr.write_record(MEAL_FIELDS)?;

    for meal in meals {
        wtr.write_record([
            meal.mensa_id.to_string(),
            meal.date.clone(),
            meal.meal_id.to_string(),
            meal.name.clone(),
            meal.category.clone(),
            meal.price_student.map_or(String::new(), |p| format!("{:?}", p)),
            format!("{:?}", meal.notes),
        ])
        .with_context(|| format!("writing meal {} to {}", meal.meal_id, path.display()))?;
    }

    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    info!(path = %path.display(), rows = meals.len(), "wrote csv");
    Ok(meals.len())
}
