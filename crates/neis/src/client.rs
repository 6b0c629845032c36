//! HTTP access to the NEIS open API.
//!
//! Responses arrive as `{ <root>: [ <header>, { "row": [...] } ] }`; the
//! header element carries result codes we do not need, so navigation goes
//! straight to `[1].row`. A missing `row` is "no data", not a transport
//! error.

use crate::config::NeisConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use geupsik_protocol::SchoolRef;
use serde::Deserialize;
use serde_json::Value;

const MEAL_ENDPOINT: &str = "mealServiceDietInfo";
const SCHOOL_ENDPOINT: &str = "schoolInfo";

/// One raw meal row as returned by `mealServiceDietInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawMealRow {
    #[serde(rename = "DDISH_NM", default)]
    pub dish_name: String,
    #[serde(rename = "CAL_INFO", default)]
    pub calorie_info: String,
    #[serde(rename = "NTR_INFO", default)]
    pub nutrient_info: Option<String>,
}

/// One raw school row as returned by `schoolInfo`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawSchoolRow {
    #[serde(rename = "SCHUL_NM")]
    pub name: String,
    #[serde(rename = "SD_SCHUL_CODE")]
    pub code: String,
    #[serde(rename = "ATPT_OFCDC_SC_CODE")]
    pub office_code: String,
    #[serde(rename = "ORG_RDNMA", default)]
    pub address: String,
}

/// Filters for a school-directory lookup.
#[derive(Debug, Clone, Default)]
pub struct SchoolQuery {
    pub school_name: String,
    pub office_code: Option<String>,
    pub school_kind: Option<String>,
}

impl SchoolQuery {
    #[must_use]
    pub fn by_name(school_name: impl Into<String>) -> Self {
        Self {
            school_name: school_name.into(),
            ..Self::default()
        }
    }
}

/// The upstream seam: everything above the HTTP layer talks through this.
#[async_trait]
pub trait NeisApi: Send + Sync {
    /// The first meal row for `(school, date)`, or `None` when the upstream
    /// has no data for that date.
    async fn meal_row(
        &self,
        school: &SchoolRef,
        date: &str,
    ) -> Result<Option<RawMealRow>, ApiError>;

    async fn school_rows(&self, query: &SchoolQuery) -> Result<Vec<RawSchoolRow>, ApiError>;
}

/// Production [`NeisApi`] over reqwest.
#[derive(Debug, Clone)]
pub struct NeisClient {
    http: reqwest::Client,
    config: NeisConfig,
}

impl NeisClient {
    #[must_use]
    pub fn new(config: NeisConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn get_json(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value, ApiError> {
        let url = format!(
            "{}/{endpoint}",
            self.config.base_url.trim_end_matches('/')
        );
        log::debug!("GET {url}");
        let response = self.http.get(&url).query(params).send().await?;
        let payload = response.json::<Value>().await?;
        Ok(payload)
    }
}

#[async_trait]
impl NeisApi for NeisClient {
    async fn meal_row(
        &self,
        school: &SchoolRef,
        date: &str,
    ) -> Result<Option<RawMealRow>, ApiError> {
        let payload = self
            .get_json(
                MEAL_ENDPOINT,
                &[
                    ("KEY", self.config.api_key.as_str()),
                    ("Type", "json"),
                    ("ATPT_OFCDC_SC_CODE", school.office_code.as_str()),
                    ("SD_SCHUL_CODE", school.code.as_str()),
                    ("MLSV_YMD", date),
                ],
            )
            .await?;

        let Some(row) = first_row(&payload, "mealServiceDietInfo") else {
            return Ok(None);
        };
        serde_json::from_value(row.clone())
            .map(Some)
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    async fn school_rows(&self, query: &SchoolQuery) -> Result<Vec<RawSchoolRow>, ApiError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("KEY", self.config.api_key.as_str()),
            ("Type", "json"),
            ("pIndex", "1"),
            ("pSize", "100"),
            ("SCHUL_NM", query.school_name.as_str()),
        ];
        if let Some(office_code) = query.office_code.as_deref() {
            params.push(("ATPT_OFCDC_SC_CODE", office_code));
        }
        if let Some(school_kind) = query.school_kind.as_deref() {
            params.push(("SCHUL_KND_SC_NM", school_kind));
        }

        let payload = self.get_json(SCHOOL_ENDPOINT, &params).await?;
        let Some(rows) = rows(&payload, "schoolInfo") else {
            return Ok(Vec::new());
        };
        rows.iter()
            .map(|row| {
                serde_json::from_value(row.clone())
                    .map_err(|err| ApiError::Decode(err.to_string()))
            })
            .collect()
    }
}

pub(crate) fn first_row<'v>(payload: &'v Value, root: &str) -> Option<&'v Value> {
    payload.get(root)?.get(1)?.get("row")?.get(0)
}

pub(crate) fn rows<'v>(payload: &'v Value, root: &str) -> Option<&'v Vec<Value>> {
    payload.get(root)?.get(1)?.get("row")?.as_array()
}
