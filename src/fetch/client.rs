// src/fetch/client.rs

use std::collections::HashMap;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use tracing::debug;
use url::Url;

use super::{ApiError, MensaApi};
use crate::meal::Meal;

/// Public OpenMensa instance.
pub const DEFAULT_BASE_URL: &str = "https://openmensa.org/";

#[derive(Deserialize)]
struct RawMeal {
    id: u64,
    name: String,
    #[serde(deserialize_with = "null_as_default")]
    category: String,
    prices: RawPrices,
    #[serde(deserialize_with = "null_as_default")]
    notes: Vec<String>,
}

/// Required field that the API sometimes sends as `null`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
struct RawPrices {
    // must be present, may be null
    #[serde(deserialize_with = "Option::deserialize")]
    students: Option<f64>,
}

#[derive(Deserialize)]
struct RawMensa {
    id: u32,
    name: String,
}

/// HTTP client for the OpenMensa v2 API.
///
/// Idle connections are never kept around, so every request opens its own
/// connection. No timeout is set.
#[derive(Clone)]
pub struct OpenMensaClient {
    client: Client,
    base: Url,
}

impl OpenMensaClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().pool_max_idle_per_host(0).build()?;
        Ok(Self { client, base })
    }

    fn meals_url(&self, mensa_id: u32, date: &str) -> Result<Url, ApiError> {
        Ok(self
            .base
            .join(&format!("api/v2/canteens/{}/days/{}/meals", mensa_id, date))?)
    }

    fn mensas_url(&self, ids: &[u32]) -> Result<Url, ApiError> {
        let ids = ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let mut url = self.base.join("api/v2/canteens/")?;
        // keep the commas literal
        url.set_query(Some(&format!("ids={}", ids)));
        Ok(url)
    }

    async fn get_text(&self, url: Url) -> Result<String, ApiError> {
        debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            return Err(ApiError::BadStatus {
                status: status.as_u16(),
            });
        }
        Ok(resp.text().await?)
    }
}

impl MensaApi for OpenMensaClient {
    async fn fetch_meals(&self, mensa_id: u32, date: &str) -> Result<Vec<Meal>, ApiError> {
        let body = self.get_text(self.meals_url(mensa_id, date)?).await?;
        parse_meals(&body, mensa_id, date)
    }

    async fn fetch_mensas(&self, ids: &[u32]) -> Result<HashMap<u32, String>, ApiError> {
        let body = self.get_text(self.mensas_url(ids)?).await?;
        parse_mensas(&body)
    }
}

fn parse_meals(body: &str, mensa_id: u32, date: &str) -> Result<Vec<Meal>, ApiError> {
    let raw: Vec<RawMeal> = serde_json::from_str(body)?;
    Ok(raw
        .into_iter()
        .map(|m| Meal {
            mensa_id,
            date: date.to_string(),
            meal_id: m.id,
            name: m.name,
            category: m.category,
            price_student: m.prices.students,
            notes: m.notes,
        })
        .collect())
}

fn parse_mensas(body: &str) -> Result<HashMap<u32, String>, ApiError> {
    let raw: Vec<RawMensa> = serde_json::from_str(body)?;
    Ok(raw.into_iter().map(|m| (m.id, m.name)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const MEALS: &str = r#"[
        {"id": 1, "name": "Linsensuppe", "category": "Eintopf",
         "prices": {"students": 1.9, "employees": 3.2, "others": null},
         "notes": ["vegan"]},
        {"id": 2, "name": "Schnitzel", "category": "Hauptgericht",
         "prices": {"students": null}, "notes": []}
    ]"#;

    #[test]
    fn test_parse_meals() {
        let meals = parse_meals(MEALS, 113, "2020-01-01").unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(
            meals[0],
            Meal {
                mensa_id: 113,
                date: "2020-01-01".to_string(),
                meal_id: 1,
                name: "Linsensuppe".to_string(),
                category: "Eintopf".to_string(),
                price_student: Some(1.9),
                notes: vec!["vegan".to_string()],
            }
        );
        assert_eq!(meals[1].price_student, None);
        assert!(meals[1].notes.is_empty());
    }

    #[test]
    fn test_parse_meals_missing_field() {
        let body = r#"[{"id": 1, "name": "x", "category": "y", "notes": []}]"#;
        assert!(matches!(
            parse_meals(body, 113, "2020-01-01"),
            Err(ApiError::Parse(_))
        ));

        // `students` is required even though it may be null
        let body = r#"[{"id": 1, "name": "x", "category": "y", "prices": {}, "notes": []}]"#;
        assert!(matches!(
            parse_meals(body, 113, "2020-01-01"),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn test_null_category_and_notes_keep_the_day() {
        let body = r#"[
            {"id": 1, "name": "Salatbar", "category": null,
             "prices": {"students": 0.8}, "notes": null},
            {"id": 2, "name": "Eintopf", "category": "Suppe",
             "prices": {"students": 1.5}, "notes": ["vegan"]}
        ]"#;
        let meals = parse_meals(body, 113, "2020-01-01").unwrap();
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[0].category, "");
        assert!(meals[0].notes.is_empty());
        assert_eq!(meals[1].category, "Suppe");

        // null is fine, absent is not
        let body = r#"[{"id": 1, "name": "x", "prices": {"students": 1.0}, "notes": []}]"#;
        assert!(matches!(
            parse_meals(body, 113, "2020-01-01"),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_meals_malformed() {
        assert!(matches!(
            parse_meals("<html>", 113, "2020-01-01"),
            Err(ApiError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_mensas() {
        let body = r#"[
            {"id": 113, "name": "Marburg, Mensa Erlenring", "city": "Marburg"},
            {"id": 114, "name": "Marburg, Mensa Lahnberge"}
        ]"#;
        let names = parse_mensas(body).unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names[&113u32], "Marburg, Mensa Erlenring");
        assert_eq!(names[&114u32], "Marburg, Mensa Lahnberge");
    }

    #[test]
    fn test_urls() {
        let api = OpenMensaClient::new("https://openmensa.org").unwrap();
        assert_eq!(
            api.meals_url(113, "2020-01-01").unwrap().as_str(),
            "https://openmensa.org/api/v2/canteens/113/days/2020-01-01/meals"
        );
        assert_eq!(
            api.mensas_url(&[113, 114, 115]).unwrap().as_str(),
            "https://openmensa.org/api/v2/canteens/?ids=113,114,115"
        );
    }

    #[test]
    fn test_base_url_with_path() {
        let api = OpenMensaClient::new("http://localhost:8080/mirror").unwrap();
        assert_eq!(
            api.meals_url(1, "2020-01-01").unwrap().as_str(),
            "http://localhost:8080/mirror/api/v2/canteens/1/days/2020-01-01/meals"
        );
    }
}
