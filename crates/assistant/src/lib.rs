//! Conversation orchestration: free Korean text in, meal answer out.
//!
//! The orchestrator wires the extractors to the retrieval path. It never
//! retries and never re-prompts by itself; a missing school name or an
//! unknown school is a terminal outcome the caller turns into a follow-up
//! question.

use chrono::{Duration, NaiveDate};
use geupsik_neis::{
    DayResult, DirectoryError, NeisApi, RetrievalError, RetrievalGateway, SchoolDirectory,
};
use geupsik_nlq::{extract_school_name, parse_date_expression};
use geupsik_protocol::{DateExpression, Granularity, MealRecord, SchoolRef};
use std::sync::Arc;
use thiserror::Error;

/// Failures the orchestrator cannot resolve into an [`AnswerOutcome`].
#[derive(Error, Debug)]
pub enum AnswerError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

/// Terminal result of one question.
#[derive(Debug)]
pub enum AnswerOutcome {
    /// The question names no school; ask the user which one.
    NeedsSchoolName,
    /// The extracted name matched nothing in the directory.
    SchoolNotFound { name: String },
    Daily {
        school: SchoolRef,
        expression: DateExpression,
        record: MealRecord,
    },
    Weekly {
        school: SchoolRef,
        expression: DateExpression,
        days: Vec<DayResult>,
    },
}

/// Drives a question through extraction, directory lookup and retrieval.
#[derive(Debug)]
pub struct MealAssistant<A> {
    directory: SchoolDirectory<A>,
    gateway: RetrievalGateway<A>,
}

impl<A> Clone for MealAssistant<A> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory.clone(),
            gateway: self.gateway.clone(),
        }
    }
}

impl<A: NeisApi> MealAssistant<A> {
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self {
            directory: SchoolDirectory::new(Arc::clone(&api)),
            gateway: RetrievalGateway::new(api),
        }
    }

    /// Answers one free-text question relative to `today`.
    ///
    /// A day with no meal data surfaces as a [`RetrievalError::NotFound`];
    /// for weekly questions that is a per-day entry, not a failure of the
    /// whole answer.
    pub async fn answer(
        &self,
        question: &str,
        today: NaiveDate,
    ) -> Result<AnswerOutcome, AnswerError> {
        let Some(name) = extract_school_name(question) else {
            return Ok(AnswerOutcome::NeedsSchoolName);
        };

        let Some(school) = self.directory.find_school(name).await? else {
            return Ok(AnswerOutcome::SchoolNotFound {
                name: name.to_string(),
            });
        };
        log::debug!("resolved {name} to code {}", school.code);

        let expression = parse_date_expression(question, today);
        match expression.granularity {
            Granularity::Weekly => {
                let start = today + Duration::days(expression.offset_from_today);
                let days = self.gateway.fetch_range(&school, start, start + Duration::days(4)).await;
                Ok(AnswerOutcome::Weekly {
                    school,
                    expression,
                    days,
                })
            }
            Granularity::Daily => {
                let record = self
                    .gateway
                    .fetch_one(&school, &expression.canonical_date)
                    .await?;
                Ok(AnswerOutcome::Daily {
                    school,
                    expression,
                    record,
                })
            }
        }
    }
}
