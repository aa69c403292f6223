use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use error_stack::Report;
use kernel::KernelError;
use serde::Serialize;
use std::process::{ExitCode, Termination};

#[derive(Debug)]
pub struct StackTrace(Report<KernelError>);

impl From<Report<KernelError>> for StackTrace {
    fn from(e: Report<KernelError>) -> Self {
        StackTrace(e)
    }
}

impl Termination for StackTrace {
    fn report(self) -> ExitCode {
        self.0.report()
    }
}

#[derive(Debug)]
pub struct ErrorStatus(Report<KernelError>);

impl From<Report<KernelError>> for ErrorStatus {
    fn from(e: Report<KernelError>) -> Self {
        ErrorStatus(e)
    }
}

impl From<KernelError> for ErrorStatus {
    fn from(e: KernelError) -> Self {
        ErrorStatus(Report::new(e))
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
}

fn status_of(error: &KernelError) -> StatusCode {
    match error {
        KernelError::NotFound => StatusCode::NOT_FOUND,
        KernelError::InvalidTransition | KernelError::Concurrency => StatusCode::CONFLICT,
        KernelError::Validation => StatusCode::BAD_REQUEST,
        KernelError::Unauthorized => StatusCode::UNAUTHORIZED,
        KernelError::Forbidden => StatusCode::FORBIDDEN,
        KernelError::Timeout => StatusCode::REQUEST_TIMEOUT,
        KernelError::External => StatusCode::BAD_GATEWAY,
        KernelError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ErrorStatus {
    fn into_response(self) -> Response {
        let context = self.0.current_context();
        let status = status_of(context);
        if status.is_server_error() {
            tracing::error!("{:?}", self.0);
        } else {
            tracing::debug!("{:?}", self.0);
        }
        let body = ErrorBody {
            message: context.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
