//! HTTP error responses for the web adapter.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::domain::error::TickerdashError;
use crate::domain::theme::Theme;

use super::templates::{render_page, ErrorTemplate};

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

pub fn status_from_error(err: &TickerdashError) -> StatusCode {
    match err {
        TickerdashError::EmptySymbol
        | TickerdashError::InvalidSymbol(_)
        | TickerdashError::UnknownPeriod(_)
        | TickerdashError::UnknownTheme(_) => StatusCode::BAD_REQUEST,
        TickerdashError::InsufficientData { .. } | TickerdashError::UnorderedSeries { .. } => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        TickerdashError::DataFetch { .. } | TickerdashError::NewsFetch { .. } => {
            StatusCode::BAD_GATEWAY
        }
        TickerdashError::ConfigParse { .. }
        | TickerdashError::ConfigMissing { .. }
        | TickerdashError::ConfigInvalid { .. }
        | TickerdashError::Csv { .. }
        | TickerdashError::Trend(_)
        | TickerdashError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<TickerdashError> for WebError {
    fn from(err: TickerdashError) -> Self {
        Self::new(status_from_error(&err), err.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(status = %self.status, message = %self.message, "request failed");
        }
        let template = ErrorTemplate {
            message: &self.message,
            status: self.status.as_u16(),
        };
        let page = askama::Template::render(&template)
            .and_then(|content| render_page("Error", Theme::default(), &content));
        match page {
            Ok(html) => (self.status, Html(html)).into_response(),
            Err(_) => (self.status, self.message).into_response(),
        }
    }
}
