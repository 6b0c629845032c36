//! The fixed operation catalog and its handlers.

use crate::dispatch::{Dispatcher, Handler, HandlerFuture};
use anyhow::{anyhow, bail};
use chrono::{Datelike, Duration, NaiveDate};
use geupsik_assistant::{AnswerOutcome, MealAssistant};
use geupsik_neis::{
    office_list, school_kinds, DayResult, NeisApi, RetrievalGateway, SchoolDirectory,
};
use geupsik_protocol::{OperationSchema, ParamShape, SchoolRef};
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// Builds the dispatcher with the six advertised operations.
///
/// `today` supplies the current date; injected so weekly lookups are
/// testable against a fixed calendar.
pub fn build_dispatcher<A, F>(api: Arc<A>, today: F) -> Dispatcher
where
    A: NeisApi + 'static,
    F: Fn() -> NaiveDate + Send + Sync + 'static,
{
    let today: Arc<dyn Fn() -> NaiveDate + Send + Sync> = Arc::new(today);
    let directory = SchoolDirectory::new(Arc::clone(&api));
    let gateway = RetrievalGateway::new(Arc::clone(&api));
    let assistant = MealAssistant::new(api);

    let mut dispatcher = Dispatcher::new();

    let search_directory = directory.clone();
    dispatcher.register(
        OperationSchema::new("searchSchools", "교육청, 학교급, 이름으로 학교를 검색합니다")
            .param("officeName", ParamShape::String, "교육청 이름 (예: 경기도)")
            .param(
                "schoolType",
                ParamShape::Enum(school_kinds().iter().map(|k| (*k).to_string()).collect()),
                "학교급",
            )
            .param("schoolName", ParamShape::String, "학교 이름 (부분 일치)")
            .require("officeName")
            .require("schoolType")
            .require("schoolName"),
        handler(move |params| {
            let directory = search_directory.clone();
            async move {
                let office = str_param(&params, "officeName")?;
                let kind = str_param(&params, "schoolType")?;
                let name = str_param(&params, "schoolName")?;
                let matches = directory.search_schools(office, kind, name).await?;
                Ok(serde_json::to_value(matches)?)
            }
        }),
    );

    dispatcher.register(
        OperationSchema::new("getOfficeList", "교육청 목록을 반환합니다"),
        handler(|_params| async { Ok(json!(office_list())) }),
    );

    dispatcher.register(
        OperationSchema::new("getSchoolTypes", "학교급 목록을 반환합니다"),
        handler(|_params| async { Ok(json!(school_kinds())) }),
    );

    let daily_gateway = gateway.clone();
    dispatcher.register(
        OperationSchema::new("getMealByDate", "특정 날짜의 급식 정보를 조회합니다")
            .param("schoolInfo", ParamShape::Object, "searchSchools가 반환한 학교 정보")
            .param("date", ParamShape::String, "YYYYMMDD 형식의 날짜")
            .require("schoolInfo")
            .require("date"),
        handler(move |params| {
            let gateway = daily_gateway.clone();
            async move {
                let school = school_param(&params)?;
                let date = str_param(&params, "date")?;
                let record = gateway.fetch_one(&school, date).await?;
                Ok(serde_json::to_value(record)?)
            }
        }),
    );

    let weekly_gateway = gateway;
    let weekly_today = Arc::clone(&today);
    dispatcher.register(
        OperationSchema::new("getWeeklyMeals", "이번 주 월요일부터 금요일까지의 급식을 조회합니다")
            .param("schoolInfo", ParamShape::Object, "searchSchools가 반환한 학교 정보")
            .require("schoolInfo"),
        handler(move |params| {
            let gateway = weekly_gateway.clone();
            let today = (weekly_today)();
            async move {
                let school = school_param(&params)?;
                let monday =
                    today - Duration::days(i64::from(today.weekday().number_from_monday()) - 1);
                let days = gateway.fetch_range(&school, monday, monday + Duration::days(4)).await;
                Ok(Value::Array(days.iter().map(day_entry).collect()))
            }
        }),
    );

    dispatcher.register(
        OperationSchema::new("askMeal", "자연어 질문으로 급식 정보를 조회합니다")
            .param("question", ParamShape::String, "한국어 질문 (학교 이름과 날짜 표현 포함)")
            .require("question"),
        handler(move |params| {
            let assistant = assistant.clone();
            let today = (today)();
            async move {
                let question = str_param(&params, "question")?;
                match assistant.answer(question, today).await? {
                    AnswerOutcome::NeedsSchoolName => {
                        bail!("질문에서 학교 이름을 찾지 못했습니다. 학교 이름을 포함해주세요.")
                    }
                    AnswerOutcome::SchoolNotFound { name } => {
                        bail!("{name}에 대한 검색 결과가 없습니다.")
                    }
                    AnswerOutcome::Daily {
                        school,
                        expression,
                        record,
                    } => Ok(json!({
                        "type": "daily",
                        "school": school,
                        "date": expression.canonical_date,
                        "meal": record,
                    })),
                    AnswerOutcome::Weekly { school, days, .. } => Ok(json!({
                        "type": "weekly",
                        "school": school,
                        "days": days.iter().map(day_entry).collect::<Vec<_>>(),
                    })),
                }
            }
        }),
    );

    dispatcher
}

fn handler<F, Fut>(body: F) -> Handler
where
    F: Fn(Map<String, Value>) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    Arc::new(move |params| -> HandlerFuture { Box::pin(body(params)) })
}

fn str_param<'p>(params: &'p Map<String, Value>, name: &str) -> anyhow::Result<&'p str> {
    params
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("필수 파라미터가 없습니다: {name}"))
}

fn school_param(params: &Map<String, Value>) -> anyhow::Result<SchoolRef> {
    let value = params
        .get("schoolInfo")
        .cloned()
        .ok_or_else(|| anyhow!("필수 파라미터가 없습니다: schoolInfo"))?;
    serde_json::from_value(value).map_err(|_| anyhow!("학교 정보 형식이 올바르지 않습니다."))
}

/// Per-day wire entry: a record or that day's failure text, never a fault.
fn day_entry(day: &DayResult) -> Value {
    match &day.outcome {
        Ok(record) => json!({"date": day.date, "ok": true, "meal": record}),
        Err(err) => json!({"date": day.date, "ok": false, "errorMessage": err.to_string()}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use geupsik_neis::{ApiError, RawMealRow, RawSchoolRow, SchoolQuery};
    use geupsik_protocol::OperationRequest;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct StubApi {
        schools: Vec<RawSchoolRow>,
        meals: HashMap<String, RawMealRow>,
    }

    #[async_trait]
    impl NeisApi for StubApi {
        async fn meal_row(
            &self,
            _school: &SchoolRef,
            date: &str,
        ) -> Result<Option<RawMealRow>, ApiError> {
            Ok(self.meals.get(date).cloned())
        }

        async fn school_rows(
            &self,
            _query: &SchoolQuery,
        ) -> Result<Vec<RawSchoolRow>, ApiError> {
            Ok(self.schools.clone())
        }
    }

    // 2024-04-04 is a Thursday; its week runs 04-01 through 04-07.
    fn fixed_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, 4).unwrap()
    }

    fn dispatcher_with(schools: Vec<RawSchoolRow>, meals: &[(&str, &str)]) -> Dispatcher {
        let meals = meals
            .iter()
            .map(|(date, dish)| {
                (
                    (*date).to_string(),
                    RawMealRow {
                        dish_name: (*dish).to_string(),
                        calorie_info: "700 Kcal".to_string(),
                        nutrient_info: None,
                    },
                )
            })
            .collect();
        build_dispatcher(Arc::new(StubApi { schools, meals }), fixed_today)
    }

    fn hyowon() -> RawSchoolRow {
        RawSchoolRow {
            name: "효원고등학교".to_string(),
            code: "7530167".to_string(),
            office_code: "J10".to_string(),
            address: "경기도 수원시".to_string(),
        }
    }

    fn request(tool: &str, parameters: Value) -> OperationRequest {
        serde_json::from_value(json!({"tool": tool, "parameters": parameters})).unwrap()
    }

    #[test]
    fn catalog_advertises_exactly_six_operations() {
        let dispatcher = dispatcher_with(Vec::new(), &[]);
        let names: Vec<&str> = dispatcher
            .catalog()
            .iter()
            .map(|schema| schema.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "searchSchools",
                "getOfficeList",
                "getSchoolTypes",
                "getMealByDate",
                "getWeeklyMeals",
                "askMeal"
            ]
        );
    }

    #[tokio::test]
    async fn office_list_returns_all_sixteen_offices() {
        let dispatcher = dispatcher_with(Vec::new(), &[]);
        let result = dispatcher.invoke(&request("getOfficeList", json!({}))).await;
        assert!(result.ok);
        assert_eq!(result.payload.unwrap().as_array().unwrap().len(), 16);
    }

    #[tokio::test]
    async fn school_types_lists_the_four_kinds() {
        let dispatcher = dispatcher_with(Vec::new(), &[]);
        let result = dispatcher.invoke(&request("getSchoolTypes", json!({}))).await;
        assert_eq!(
            result.payload.unwrap(),
            json!(["초등학교", "중학교", "고등학교", "특수학교"])
        );
    }

    #[tokio::test]
    async fn search_schools_rejects_an_unknown_office() {
        let dispatcher = dispatcher_with(vec![hyowon()], &[]);
        let result = dispatcher
            .invoke(&request(
                "searchSchools",
                json!({"officeName": "화성시", "schoolType": "고등학교", "schoolName": "효원"}),
            ))
            .await;
        assert!(!result.ok);
        assert_eq!(
            result.error_message.as_deref(),
            Some("올바른 교육청 이름을 입력해주세요.")
        );
    }

    #[tokio::test]
    async fn search_schools_rejects_an_undeclared_kind() {
        let dispatcher = dispatcher_with(vec![hyowon()], &[]);
        let result = dispatcher
            .invoke(&request(
                "searchSchools",
                json!({"officeName": "경기도", "schoolType": "대학교", "schoolName": "효원"}),
            ))
            .await;
        assert!(!result.ok);
        assert!(result.error_message.unwrap().contains("schoolType"));
    }

    #[tokio::test]
    async fn meal_by_date_returns_the_normalized_record() {
        let dispatcher = dispatcher_with(vec![hyowon()], &[("20240404", "밥<br/>김치")]);
        let result = dispatcher
            .invoke(&request(
                "getMealByDate",
                json!({
                    "schoolInfo": {"name": "효원고등학교", "code": "7530167", "officeCode": "J10"},
                    "date": "20240404"
                }),
            ))
            .await;
        assert!(result.ok);
        let payload = result.payload.unwrap();
        assert_eq!(payload["menu"], json!(["밥", "김치"]));
    }

    #[tokio::test]
    async fn meal_by_date_miss_reports_the_not_found_message() {
        let dispatcher = dispatcher_with(vec![hyowon()], &[]);
        let result = dispatcher
            .invoke(&request(
                "getMealByDate",
                json!({
                    "schoolInfo": {"name": "효원고등학교", "code": "7530167", "officeCode": "J10"},
                    "date": "20240406"
                }),
            ))
            .await;
        assert!(!result.ok);
        assert_eq!(
            result.error_message.as_deref(),
            Some("해당 날짜의 급식 정보가 없습니다.")
        );
    }

    #[tokio::test]
    async fn weekly_meals_cover_monday_through_friday_of_this_week() {
        let dispatcher = dispatcher_with(
            vec![hyowon()],
            &[("20240401", "밥"), ("20240403", "국수"), ("20240405", "카레")],
        );
        let result = dispatcher
            .invoke(&request(
                "getWeeklyMeals",
                json!({"schoolInfo": {"name": "효원고등학교", "code": "7530167", "officeCode": "J10"}}),
            ))
            .await;
        assert!(result.ok);
        let days = result.payload.unwrap();
        let days = days.as_array().unwrap();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0]["date"], json!("20240401"));
        assert_eq!(days[4]["date"], json!("20240405"));
        assert_eq!(days[0]["ok"], json!(true));
        assert_eq!(days[1]["ok"], json!(false));
        assert_eq!(
            days[1]["errorMessage"],
            json!("해당 날짜의 급식 정보가 없습니다.")
        );
    }

    #[tokio::test]
    async fn ask_meal_answers_a_daily_question() {
        let dispatcher = dispatcher_with(vec![hyowon()], &[("20240404", "밥<br/>김치")]);
        let result = dispatcher
            .invoke(&request(
                "askMeal",
                json!({"question": "오늘 효원고등학교 급식 알려줘"}),
            ))
            .await;
        assert!(result.ok);
        let payload = result.payload.unwrap();
        assert_eq!(payload["type"], json!("daily"));
        assert_eq!(payload["date"], json!("20240404"));
        assert_eq!(payload["meal"]["menu"], json!(["밥", "김치"]));
    }

    #[tokio::test]
    async fn ask_meal_without_a_school_asks_for_one() {
        let dispatcher = dispatcher_with(Vec::new(), &[]);
        let result = dispatcher
            .invoke(&request("askMeal", json!({"question": "오늘 급식 뭐야?"})))
            .await;
        assert!(!result.ok);
        assert!(result.error_message.unwrap().contains("학교 이름"));
    }
}
