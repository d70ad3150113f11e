use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Failures raised by the data access layer.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("user {0} not found")]
    UserNotFound(i32),
    #[error("movie {0} not found")]
    MovieNotFound(i32),
    #[error("storage error: {0}")]
    Storage(#[from] sea_orm::DbErr),
}

impl DataError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::MovieNotFound(_))
    }
}

pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(err)
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl From<DataError> for AppError {
    fn from(err: DataError) -> Self {
        Self(anyhow::Error::new(err))
    }
}

impl AppError {
    fn is_not_found(&self) -> bool {
        self.0.downcast_ref::<DataError>().is_some_and(DataError::is_not_found)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_not_found() {
            let body = crate::templates::not_found_page();
            return (StatusCode::NOT_FOUND, Html(body)).into_response();
        }
        tracing::error!(error = %self, "request failed");
        let body =
            crate::templates::error_page("Something went wrong on our side. Please try again.");
        (StatusCode::INTERNAL_SERVER_ERROR, Html(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
