use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    NotFound,
    BadRequest(String),
    InternalServerError,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Json(json!({"error": "not found"}))).into_response(),
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "bad request", "message": msg})),
            )
                .into_response(),
            AppError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "internal server error"})),
            )
                .into_response(),
        }
    }
}

/// 约束冲突等客户端可修正的错误返回 400，其余一律 500
pub fn map_db_err(err: DieselError) -> AppError {
    match err {
        DieselError::NotFound => AppError::NotFound,
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation
            | DatabaseErrorKind::CheckViolation
            | DatabaseErrorKind::NotNullViolation
            | DatabaseErrorKind::ForeignKeyViolation,
            info,
        ) => AppError::BadRequest(info.message().to_string()),
        other => {
            tracing::error!("database error: {}", other);
            AppError::InternalServerError
        }
    }
}

pub fn multipart_err(err: MultipartError) -> AppError {
    AppError::BadRequest(err.body_text())
}

pub fn pool_err(err: PoolError) -> AppError {
    tracing::error!("failed to get DB connection: {}", err);
    AppError::InternalServerError
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::InternalServerError.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_diesel_not_found_maps_to_404() {
        assert!(matches!(map_db_err(DieselError::NotFound), AppError::NotFound));
        assert!(matches!(
            map_db_err(DieselError::RollbackTransaction),
            AppError::InternalServerError
        ));
    }

    #[test]
    fn test_unique_violation_maps_to_400_with_db_message() {
        let err = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_string()),
        );
        match map_db_err(err) {
            AppError::BadRequest(msg) => {
                assert_eq!(msg, "duplicate key value violates unique constraint")
            }
            other => panic!("expected bad request, got {:?}", other),
        }

        let err = DieselError::DatabaseError(
            DatabaseErrorKind::SerializationFailure,
            Box::new("could not serialize access".to_string()),
        );
        assert!(matches!(map_db_err(err), AppError::InternalServerError));
    }
}
