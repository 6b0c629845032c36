//! Per-day meal retrieval with partial-failure range semantics.

use crate::client::NeisApi;
use crate::error::RetrievalError;
use crate::normalize;
use chrono::{Duration, NaiveDate};
use futures::future;
use geupsik_protocol::{MealRecord, SchoolRef};
use std::sync::Arc;

/// Outcome for one calendar day of a range fetch.
#[derive(Debug)]
pub struct DayResult {
    pub date: String,
    pub outcome: Result<MealRecord, RetrievalError>,
}

/// Issues upstream meal lookups and normalizes the rows.
#[derive(Debug)]
pub struct RetrievalGateway<A> {
    api: Arc<A>,
}

impl<A> Clone for RetrievalGateway<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: NeisApi> RetrievalGateway<A> {
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// One school, one canonical date. `NotFound` covers weekends and
    /// holidays; a present-but-unusable row is `MalformedRow`.
    pub async fn fetch_one(
        &self,
        school: &SchoolRef,
        date: &str,
    ) -> Result<MealRecord, RetrievalError> {
        let Some(raw) = self.api.meal_row(school, date).await? else {
            return Err(RetrievalError::NotFound);
        };
        Ok(normalize::normalize(&raw, date, &school.name)?)
    }

    /// Every calendar day in the inclusive range, ascending.
    ///
    /// Days are fetched independently and concurrently; one day failing
    /// never aborts the rest, and results come back in date order
    /// regardless of completion order.
    pub async fn fetch_range(
        &self,
        school: &SchoolRef,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Vec<DayResult> {
        let mut dates = Vec::new();
        let mut cursor = start;
        while cursor <= end {
            dates.push(cursor.format("%Y%m%d").to_string());
            cursor += Duration::days(1);
        }

        let lookups = dates.iter().map(|date| self.fetch_one(school, date));
        let outcomes = future::join_all(lookups).await;

        dates
            .into_iter()
            .zip(outcomes)
            .map(|(date, outcome)| DayResult { date, outcome })
            .collect()
    }
}
