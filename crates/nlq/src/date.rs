//! Korean natural-language date expressions.
//!
//! Rule order, earlier wins when several match:
//! 1. explicit `Y년 M월 D일` triple
//! 2. week keywords (`이번주`, `다음주`)
//! 3. relative-day keywords (`오늘`, `어제`, `내일`)
//! 4. weekday names (`월요일`..`일요일`), resolved within the
//!    Monday-start week containing `today`
//! 5. default: today

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use geupsik_protocol::{DateExpression, Granularity};
use once_cell::sync::Lazy;
use regex::Regex;

static YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})년").expect("year pattern"));
static MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})월").expect("month pattern"));
static DAY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})일").expect("day pattern"));

const WEEKDAYS: [&str; 7] = [
    "월요일",
    "화요일",
    "수요일",
    "목요일",
    "금요일",
    "토요일",
    "일요일",
];

/// Parses a free-text Korean date expression against `today`.
///
/// Deterministic and pure given `today`. The canonical date is always 8
/// numeric characters; when no explicit date is present it equals
/// `today + offset` days.
#[must_use]
pub fn parse_date_expression(text: &str, today: NaiveDate) -> DateExpression {
    if let Some(explicit) = parse_explicit(text, today) {
        return explicit;
    }

    let (offset, granularity) = if text.contains("이번주") {
        (0, Granularity::Weekly)
    } else if text.contains("다음주") {
        (7, Granularity::Weekly)
    } else if text.contains("오늘") {
        (0, Granularity::Daily)
    } else if text.contains("어제") {
        (-1, Granularity::Daily)
    } else if text.contains("내일") {
        (1, Granularity::Daily)
    } else if let Some(diff) = weekday_offset(text, today) {
        (diff, Granularity::Daily)
    } else {
        (0, Granularity::Daily)
    };

    DateExpression {
        canonical_date: format_date(today + Duration::days(offset)),
        offset_from_today: offset,
        granularity,
    }
}

/// Explicit `Y년 M월 D일` triples win over every keyword. The day-of-month is
/// taken literally without calendar validation; an impossible date keeps
/// offset 0 and surfaces downstream as "no data for date".
fn parse_explicit(text: &str, today: NaiveDate) -> Option<DateExpression> {
    let year = capture(&YEAR, text)?;
    let month = capture(&MONTH, text)?;
    let day = capture(&DAY, text)?;

    let canonical = format!("{year}{month:0>2}{day:0>2}");
    let offset = NaiveDate::from_ymd_opt(
        year.parse().ok()?,
        month.parse().ok()?,
        day.parse().ok()?,
    )
    .map(|date| (date - today).num_days())
    .unwrap_or(0);

    Some(DateExpression {
        canonical_date: canonical,
        offset_from_today: offset,
        granularity: Granularity::Daily,
    })
}

fn capture<'t>(pattern: &Regex, text: &'t str) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Signed day difference to the first weekday name found in `text`, within
/// the Monday-start week containing `today`.
fn weekday_offset(text: &str, today: NaiveDate) -> Option<i64> {
    let index = WEEKDAYS.iter().position(|name| text.contains(name))?;
    let target = index as i64 + 1; // 월요일 = 1 .. 일요일 = 7
    let current = i64::from(today.weekday().number_from_monday());
    Some(target - current)
}

/// The most recent Mon-Fri date strictly before `today`, looking back at
/// most five days.
#[must_use]
pub fn last_weekday(today: NaiveDate) -> NaiveDate {
    let mut candidate = today;
    for back in 1..=5 {
        candidate = today - Duration::days(back);
        if !matches!(candidate.weekday(), Weekday::Sat | Weekday::Sun) {
            break;
        }
    }
    candidate
}

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}
