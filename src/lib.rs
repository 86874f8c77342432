pub mod config;
pub mod dates;
pub mod export;
pub mod fetch;
pub mod meal;

pub use config::Config;
pub use export::{dump_mensa_to_csv, ExportError};
pub use fetch::{ApiError, MensaApi, OpenMensaClient};
pub use meal::{Meal, MEAL_FIELDS};
