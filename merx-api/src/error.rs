use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use merx_order::OrderError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    InternalServerError(String),
}

impl From<OrderError> for AppError {
    fn from(e: OrderError) -> Self {
        match e {
            OrderError::NotFound(_) => AppError::NotFound(e.to_string()),
            OrderError::WrongState { .. } | OrderError::Validation(_) => {
                AppError::BadRequest(e.to_string())
            }
            OrderError::Store(_) => AppError::InternalServerError(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn order_errors_map_to_expected_statuses() {
        let id = Uuid::new_v4();

        let not_found: AppError = OrderError::NotFound(id).into();
        assert!(matches!(not_found, AppError::NotFound(_)));

        let wrong_state: AppError = OrderError::WrongState {
            id,
            status: merx_order::OrderStatus::Paid,
        }
        .into();
        assert!(matches!(wrong_state, AppError::BadRequest(_)));

        let validation: AppError =
            OrderError::Validation("invalid skus found: 77".to_string()).into();
        match validation {
            AppError::BadRequest(msg) => assert!(msg.contains("77")),
            other => panic!("expected BadRequest, got {other:?}"),
        }

        let store: AppError = OrderError::Store("down".to_string()).into();
        assert!(matches!(store, AppError::InternalServerError(_)));
    }
}
