//! School-directory lookups and the fixed office/kind code tables.
//!
//! The tables are process-wide read-only data, passed to components at
//! construction time through this module rather than reached as globals.

use crate::client::{NeisApi, RawSchoolRow, SchoolQuery};
use crate::error::DirectoryError;
use geupsik_protocol::{SchoolMatch, SchoolRef};
use std::sync::Arc;

/// Education-office display name to jurisdiction code.
pub const OFFICE_CODES: &[(&str, &str)] = &[
    ("경기도", "10"),
    ("서울", "01"),
    ("인천", "02"),
    ("부산", "03"),
    ("대구", "04"),
    ("광주", "05"),
    ("대전", "06"),
    ("울산", "07"),
    ("세종", "08"),
    ("경남", "09"),
    ("강원", "11"),
    ("충북", "12"),
    ("충남", "13"),
    ("전북", "14"),
    ("전남", "15"),
    ("제주", "16"),
];

/// School-kind display name to upstream kind marker.
pub const SCHOOL_KINDS: &[(&str, &str)] = &[
    ("초등학교", "초"),
    ("중학교", "중"),
    ("고등학교", "고"),
    ("특수학교", "특"),
];

#[must_use]
pub fn office_code(office_name: &str) -> Option<&'static str> {
    OFFICE_CODES
        .iter()
        .find(|(name, _)| *name == office_name)
        .map(|(_, code)| *code)
}

#[must_use]
pub fn school_kind_code(kind_name: &str) -> Option<&'static str> {
    SCHOOL_KINDS
        .iter()
        .find(|(name, _)| *name == kind_name)
        .map(|(_, code)| *code)
}

#[must_use]
pub fn office_list() -> Vec<&'static str> {
    OFFICE_CODES.iter().map(|(name, _)| *name).collect()
}

#[must_use]
pub fn school_kinds() -> Vec<&'static str> {
    SCHOOL_KINDS.iter().map(|(name, _)| *name).collect()
}

/// Looks schools up in the upstream directory.
#[derive(Debug)]
pub struct SchoolDirectory<A> {
    api: Arc<A>,
}

impl<A> Clone for SchoolDirectory<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: NeisApi> SchoolDirectory<A> {
    #[must_use]
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    /// First directory hit for a bare school name, or `None`.
    pub async fn find_school(&self, name: &str) -> Result<Option<SchoolRef>, DirectoryError> {
        let rows = self.api.school_rows(&SchoolQuery::by_name(name)).await?;
        Ok(rows
            .into_iter()
            .next()
            .map(|row| school_match(row).school_ref()))
    }

    /// Directory search scoped to an education office and school kind.
    /// Names outside the code tables are caller-fixable, not upstream.
    pub async fn search_schools(
        &self,
        office_name: &str,
        school_kind: &str,
        school_name: &str,
    ) -> Result<Vec<SchoolMatch>, DirectoryError> {
        let office_code = office_code(office_name)
            .ok_or_else(|| DirectoryError::UnknownOffice(office_name.to_string()))?;
        if school_kind_code(school_kind).is_none() {
            return Err(DirectoryError::UnknownKind(school_kind.to_string()));
        }

        let query = SchoolQuery {
            school_name: school_name.to_string(),
            office_code: Some(office_code.to_string()),
            school_kind: Some(school_kind.to_string()),
        };
        let rows = self.api.school_rows(&query).await?;
        Ok(rows.into_iter().map(school_match).collect())
    }
}

fn school_match(row: RawSchoolRow) -> SchoolMatch {
    SchoolMatch {
        name: row.name,
        code: row.code,
        office_code: row.office_code,
        address: row.address,
    }
}
