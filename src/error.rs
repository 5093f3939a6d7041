use sql_middleware::SqlMiddlewareDbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("player already added to league")]
    DuplicatePlayerInLeague,
    #[error("match already recorded in league")]
    DuplicateMatchInLeague,
    #[error("match result for a player outside the league")]
    MatchPlayerNotInLeague,
    #[error("cycle is closed")]
    CycleClosed,
    #[error("tee with this colour and type already exists")]
    TeeAlreadyExists,
    #[error("search string too short")]
    SearchStringTooShort,
    #[error("db error: {0}")]
    Db(#[from] SqlMiddlewareDbError),
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Other(err.to_string())
    }
}

// lets transaction closures use `?` on raw rusqlite calls while still
// returning domain errors
impl From<deadpool_sqlite::InteractError> for ServiceError {
    fn from(err: deadpool_sqlite::InteractError) -> Self {
        Self::Db(err.into())
    }
}

impl From<rusqlite::Error> for ServiceError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Db(err.into())
    }
}

impl ServiceError {
    /// Transactional write paths are only wired up for sqlite.
    pub fn db_not_supported() -> Self {
        Self::Db(SqlMiddlewareDbError::Other(
            "Database type not supported for this operation".to_string(),
        ))
    }

    /// HTTP status the routing layer should translate this error to.
    pub fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::FORBIDDEN,
            Self::DuplicatePlayerInLeague
            | Self::DuplicateMatchInLeague
            | Self::MatchPlayerNotInLeague
            | Self::CycleClosed
            | Self::TeeAlreadyExists => StatusCode::CONFLICT,
            Self::SearchStringTooShort => StatusCode::BAD_REQUEST,
            Self::Db(_) | Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code())
            .json(serde_json::json!({"error": self.to_string()}))
    }
}
