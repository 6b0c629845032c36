//! NEIS open-API access: HTTP client, row normalization, the retrieval
//! gateway, and the school-directory lookup.
//!
//! All expected failure conditions are typed; nothing in this crate raises
//! past its own boundary for an expected condition.

mod client;
mod config;
mod directory;
mod error;
mod gateway;
mod normalize;

pub use client::{NeisApi, NeisClient, RawMealRow, RawSchoolRow, SchoolQuery};
pub use config::{NeisConfig, DEFAULT_BASE_URL};
pub use directory::{office_code, office_list, school_kind_code, school_kinds, SchoolDirectory};
pub use error::{ApiError, ConfigError, DirectoryError, NormalizeError, RetrievalError};
pub use gateway::{DayResult, RetrievalGateway};
pub use normalize::{normalize, LINE_BREAK};
