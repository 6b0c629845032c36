use thiserror::Error;

/// Startup configuration problems. Fatal before any request is accepted.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("NEIS API key not found in environment variables (set NEIS_API_KEY)")]
    MissingApiKey,
}

/// Transport-level failures talking to the NEIS open API.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("NEIS 요청에 실패했습니다: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("NEIS 응답 형식이 올바르지 않습니다: {0}")]
    Decode(String),
}

/// A raw meal row that cannot be normalized into a [`geupsik_protocol::MealRecord`].
#[derive(Error, Debug, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("해당 날짜의 급식 메뉴가 비어 있습니다.")]
    EmptyMenu,
}

/// Per-day retrieval outcomes that are not a record.
///
/// `NotFound` is a legitimate terminal outcome (weekends, holidays), not a
/// system error.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("해당 날짜의 급식 정보가 없습니다.")]
    NotFound,

    #[error("급식 정보를 가져오는 중 오류가 발생했습니다: {0}")]
    UpstreamUnavailable(#[from] ApiError),

    #[error("급식 정보 형식이 올바르지 않습니다: {0}")]
    MalformedRow(#[from] NormalizeError),
}

/// School-directory lookup failures.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("올바른 교육청 이름을 입력해주세요.")]
    UnknownOffice(String),

    #[error("올바른 학교급을 입력해주세요.")]
    UnknownKind(String),

    #[error("학교 검색 중 오류가 발생했습니다: {0}")]
    Upstream(#[from] ApiError),
}
