use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::application::{error::ErrorReport, outline::OutlineError};

use super::OUTLINE_PATH;

const SOURCE: &str = "infra::http::outline";

/// JSON body returned for every failed outline request.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutlineErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl OutlineErrorBody {
    fn message(error: &str) -> Self {
        Self {
            error: error.to_string(),
            example: None,
            status: None,
            details: None,
        }
    }
}

impl From<&OutlineError> for OutlineErrorBody {
    fn from(error: &OutlineError) -> Self {
        match error {
            OutlineError::MissingParameter => Self {
                example: Some(format!("{OUTLINE_PATH}?country=Germany")),
                ..Self::message("Country parameter is required")
            },
            OutlineError::InvalidFormat(_) => Self::message("Invalid country name format"),
            OutlineError::UpstreamNotFound { .. } => {
                Self::message("Country page not found on Wikipedia")
            }
            OutlineError::NoHeadings { .. } => Self::message("No headings found for this country"),
            OutlineError::UpstreamUnreachable(_) => Self::message("Failed to connect to Wikipedia"),
            OutlineError::UpstreamError { status, .. } => Self {
                status: *status,
                ..Self::message("Wikipedia returned an error")
            },
            OutlineError::Internal(message) => Self {
                details: Some(message.clone()),
                ..Self::message("Internal server error")
            },
        }
    }
}

impl IntoResponse for OutlineError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = OutlineErrorBody::from(&self);
        let mut response = (status, Json(body)).into_response();
        // The logging middleware reads this to record the failure server-side.
        ErrorReport::from_error(SOURCE, status, &self).attach(&mut response);
        response
    }
}
