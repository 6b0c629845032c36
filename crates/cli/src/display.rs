//! Terminal rendering of meal records and directory results.

use geupsik_neis::DayResult;
use geupsik_protocol::{MealRecord, SchoolMatch};
use std::fmt::Write;

const TABLE_TOP: &str = "┌────────────────────────────────────────────┬────────────┐";
const TABLE_HEAD: &str = "│                   메뉴                     │   칼로리   │";
const TABLE_MID: &str = "├────────────────────────────────────────────┼────────────┤";
const TABLE_BOTTOM: &str = "└────────────────────────────────────────────┴────────────┘";

/// Statutory allergen numbering printed under every menu; menu items carry
/// these numbers in parentheses.
const ALLERGY_LEGEND: &str = "\
1.난류 2.우유 3.메밀 4.땅콩 5.대두 6.밀 7.고등어 8.게 9.새우
10.돼지고기 11.복숭아 12.토마토 13.아황산류 14.호두 15.닭고기
16.쇠고기 17.오징어 18.조개류";

/// One day's menu as a boxed table plus nutrient and allergen sections.
#[must_use]
pub fn render_record(record: &MealRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{} 급식 메뉴]", record.date);
    out.push_str(TABLE_TOP);
    out.push('\n');
    out.push_str(TABLE_HEAD);
    out.push('\n');
    out.push_str(TABLE_MID);
    out.push('\n');

    for (index, item) in record.menu_items.iter().enumerate() {
        let calories = if index == 0 { record.calories.as_str() } else { "" };
        let _ = writeln!(out, "│ {:<42} │ {:<10} │", item, calories);
    }

    out.push_str(TABLE_BOTTOM);
    out.push('\n');

    if !record.nutrients.is_empty() {
        out.push_str("\n[영양 정보]\n");
        for (name, value) in &record.nutrients {
            let _ = writeln!(out, "{name} : {value}");
        }
    }

    out.push_str("\n[알레르기 정보]\n");
    out.push_str(ALLERGY_LEGEND);
    out.push('\n');
    out
}

/// A week of per-day outcomes; failed days print their message inline.
#[must_use]
pub fn render_week(school: &str, days: &[DayResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{school} 주간 급식]");
    for day in days {
        match &day.outcome {
            Ok(record) => {
                let _ = writeln!(out, "\n{}: {}", day.date, record.menu_items.join(", "));
                let _ = writeln!(out, "  칼로리: {}", record.calories);
            }
            Err(err) => {
                let _ = writeln!(out, "\n{}: {err}", day.date);
            }
        }
    }
    out
}

/// Numbered directory search results.
#[must_use]
pub fn render_matches(matches: &[SchoolMatch]) -> String {
    if matches.is_empty() {
        return "검색 결과가 없습니다.\n".to_string();
    }
    let mut out = String::from("검색 결과:\n");
    for (index, school) in matches.iter().enumerate() {
        let _ = writeln!(out, "{}. {} ({})", index + 1, school.name, school.address);
    }
    out
}

#[must_use]
pub fn render_name_list(heading: &str, names: &[&str]) -> String {
    let mut out = format!("{heading}:\n");
    for name in names {
        let _ = writeln!(out, "- {name}");
    }
    out
}
