//! Shared wire and data types for the geupsik workspace.
//!
//! Everything here is plain data: no I/O, no upstream knowledge beyond the
//! field names the NEIS API hands back after normalization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod schema;

pub use schema::{OperationSchema, ParamShape, ParamSpec};

/// Identifies one school within an education-office jurisdiction.
///
/// Produced only by the school-directory lookup; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolRef {
    pub name: String,
    pub code: String,
    #[serde(rename = "officeCode")]
    pub office_code: String,
}

/// A directory search hit: a [`SchoolRef`] plus its street address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolMatch {
    pub name: String,
    pub code: String,
    #[serde(rename = "officeCode")]
    pub office_code: String,
    pub address: String,
}

impl SchoolMatch {
    #[must_use]
    pub fn school_ref(&self) -> SchoolRef {
        SchoolRef {
            name: self.name.clone(),
            code: self.code.clone(),
            office_code: self.office_code.clone(),
        }
    }
}

/// Whether a query targets a single day or a five-weekday week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    Weekly,
}

/// Canonical result of parsing a natural-language date expression.
///
/// Invariant: `canonical_date` is always 8 numeric characters, and equals
/// `today + offset_from_today` days whenever no explicit date was stated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateExpression {
    #[serde(rename = "date")]
    pub canonical_date: String,
    #[serde(rename = "dateOffset")]
    pub offset_from_today: i64,
    #[serde(rename = "type")]
    pub granularity: Granularity,
}

/// One normalized meal row.
///
/// Invariant: `menu_items` is never empty — a row whose menu text collapses
/// to nothing is a retrieval failure, not an empty success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealRecord {
    pub date: String,
    pub school: String,
    #[serde(rename = "menu")]
    pub menu_items: Vec<String>,
    pub calories: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub nutrients: BTreeMap<String, String>,
}

/// An inbound operation invocation, as received off the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationRequest {
    pub tool: String,
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
}

/// The uniform invocation envelope: every dispatch resolves to exactly one
/// of these two shapes, never an unhandled fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperationResult {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
    #[serde(rename = "errorMessage", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl OperationResult {
    #[must_use]
    pub fn success(payload: serde_json::Value) -> Self {
        Self {
            ok: true,
            payload: Some(payload),
            error_message: None,
        }
    }

    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            payload: None,
            error_message: Some(message.into()),
        }
    }
}
