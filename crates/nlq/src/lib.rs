//! Natural-language query extraction for Korean meal questions.
//!
//! Two independent, deterministic extractors: a date-expression parser
//! (absolute dates, relative offsets, week references, weekday names) and a
//! school-name extractor. Both are pure given their inputs.

mod date;
mod school;

pub use date::{last_weekday, parse_date_expression};
pub use school::extract_school_name;
