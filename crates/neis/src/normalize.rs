//! Raw meal rows into structured records.

use crate::client::RawMealRow;
use crate::error::NormalizeError;
use geupsik_protocol::MealRecord;
use std::collections::BTreeMap;

/// Line-break marker the upstream embeds in multi-item text fields.
pub const LINE_BREAK: &str = "<br/>";

const NUTRIENT_SEPARATOR: &str = " : ";

/// Converts one raw API row into a [`MealRecord`].
///
/// The calorie field is opaque formatted text and is copied verbatim. An
/// empty menu is a failure, never an empty success.
pub fn normalize(
    raw: &RawMealRow,
    date: &str,
    school: &str,
) -> Result<MealRecord, NormalizeError> {
    let menu_items: Vec<String> = raw
        .dish_name
        .split(LINE_BREAK)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect();

    if menu_items.is_empty() {
        return Err(NormalizeError::EmptyMenu);
    }

    Ok(MealRecord {
        date: date.to_string(),
        school: school.to_string(),
        menu_items,
        calories: raw.calorie_info.clone(),
        nutrients: parse_nutrients(raw.nutrient_info.as_deref()),
    })
}

/// `NTR_INFO` is `name : value` pairs joined by the line-break marker.
/// Sub-items without the separator are skipped, not an error.
fn parse_nutrients(field: Option<&str>) -> BTreeMap<String, String> {
    let Some(field) = field else {
        return BTreeMap::new();
    };
    field
        .split(LINE_BREAK)
        .filter_map(|item| item.split_once(NUTRIENT_SEPARATOR))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn raw(dish: &str, calories: &str, nutrients: Option<&str>) -> RawMealRow {
        RawMealRow {
            dish_name: dish.to_string(),
            calorie_info: calories.to_string(),
            nutrient_info: nutrients.map(str::to_string),
        }
    }

    #[test]
    fn splits_trims_and_drops_empty_menu_items() {
        let record = normalize(&raw("밥<br/>김치<br/>", "700 Kcal", None), "20240404", "효원고등학교")
            .unwrap();
        assert_eq!(record.menu_items, vec!["밥", "김치"]);
        assert_eq!(record.date, "20240404");
        assert_eq!(record.school, "효원고등학교");
    }

    #[test]
    fn trims_whitespace_around_items() {
        let record =
            normalize(&raw(" 밥 <br/> 김치찌개 ", "", None), "20240404", "학교").unwrap();
        assert_eq!(record.menu_items, vec!["밥", "김치찌개"]);
    }

    #[test]
    fn empty_dish_field_is_a_failure() {
        let err = normalize(&raw("", "700 Kcal", None), "20240404", "학교").unwrap_err();
        assert_eq!(err, NormalizeError::EmptyMenu);
    }

    #[test]
    fn whitespace_only_dish_field_is_a_failure() {
        let err = normalize(&raw("<br/> <br/>", "", None), "20240404", "학교").unwrap_err();
        assert_eq!(err, NormalizeError::EmptyMenu);
    }

    #[test]
    fn calories_are_copied_verbatim() {
        let record = normalize(&raw("밥", "723.9 Kcal ", None), "20240404", "학교").unwrap();
        assert_eq!(record.calories, "723.9 Kcal ");
    }

    #[test]
    fn nutrients_parse_into_name_value_pairs() {
        let record = normalize(
            &raw(
                "밥",
                "700 Kcal",
                Some("탄수화물(g) : 110.5<br/>단백질(g) : 32.1"),
            ),
            "20240404",
            "학교",
        )
        .unwrap();
        assert_eq!(record.nutrients.get("탄수화물(g)").unwrap(), "110.5");
        assert_eq!(record.nutrients.get("단백질(g)").unwrap(), "32.1");
    }

    #[test]
    fn nutrient_items_without_separator_are_skipped() {
        let record = normalize(
            &raw("밥", "", Some("탄수화물(g) : 110.5<br/>비고")),
            "20240404",
            "학교",
        )
        .unwrap();
        assert_eq!(record.nutrients.len(), 1);
        assert!(record.nutrients.contains_key("탄수화물(g)"));
    }

    #[test]
    fn absent_nutrient_field_yields_empty_map() {
        let record = normalize(&raw("밥", "", None), "20240404", "학교").unwrap();
        assert!(record.nutrients.is_empty());
    }
}
