// src/fetch/mod.rs

use std::collections::HashMap;
use std::future::Future;

use thiserror::Error;

use crate::meal::Meal;

pub mod client;

pub use client::OpenMensaClient;

/// Failures of a single API call.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("http status {status} != 200")]
    BadStatus { status: u16 },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("malformed response body: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}

/// The two OpenMensa endpoints the exporter talks to.
pub trait MensaApi: Send + Sync {
    /// All meals served by `mensa_id` on `date` (`"YYYY-MM-DD"`).
    fn fetch_meals(
        &self,
        mensa_id: u32,
        date: &str,
    ) -> impl Future<Output = Result<Vec<Meal>, ApiError>> + Send;

    /// Map each of `ids` to the mensa's display name.
    fn fetch_mensas(
        &self,
        ids: &[u32],
    ) -> impl Future<Output = Result<HashMap<u32, String>, ApiError>> + Send;
}
