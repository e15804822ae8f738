//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("duplicate table: {0}")]
    DuplicateTable(String),
    #[error("duplicate column: {table}.{column}")]
    DuplicateColumn { table: String, column: String },
    #[error("missing column: {table}.{column}")]
    MissingColumn { table: String, column: String },
    #[error("foreign key {table}.{column} references unknown table {target}")]
    DanglingForeignKey {
        table: String,
        column: String,
        target: String,
    },
    #[error("unknown table: {0}")]
    UnknownTable(String),
    #[error("validation: {0}")]
    Validation(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("validation: {0}")]
    Validation(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    /// Fold constraint violations reported by PostgreSQL into Conflict so callers
    /// can tell a unique/restrict rejection from an infrastructure failure.
    pub fn from_db(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = e {
            // 23505 unique_violation, 23503 foreign_key_violation (covers RESTRICT)
            if let Some(code) = db.code() {
                if code == "23505" || code == "23503" {
                    return AppError::Conflict(db.message().to_string());
                }
            }
        }
        AppError::Db(e)
    }
}

/// Errors from gateway applications. These propagate to the hosting runtime;
/// the HTTP adapter renders them as 500s.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("response already started")]
    AlreadyStarted,
    #[error("response was never started")]
    NotStarted,
    #[error("invalid header: {0}")]
    InvalidHeader(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal errors from the build configurator. A broken build configuration must
/// abort the build step rather than write a bad Makefile.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("template not found: {0}")]
    TemplateMissing(String),
    #[error("build variable not defined: {0}")]
    UndefinedVar(String),
    #[error("unparsable interpreter version: {0}")]
    InvalidVersion(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Schema(_) => (StatusCode::INTERNAL_SERVER_ERROR, "schema_error"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error"),
            AppError::Db(e) => {
                if let sqlx::Error::RowNotFound = e {
                    (StatusCode::NOT_FOUND, "not_found")
                } else {
                    (StatusCode::INTERNAL_SERVER_ERROR, "database_error")
                }
            }
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: "gateway_error".to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
