use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use htmlgo_convert::{Converter, ErrorKind, builder_to_html};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Which way a `/convert` request goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Html2go,
    Go2html,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertRequest {
    pub html: String,
    pub go_code: String,
    /// Qualifier for generated calls; empty or absent means none.
    pub package_prefix: String,
    pub direction: Direction,
}

#[derive(Debug, Default, Serialize)]
pub struct ConvertResponse {
    pub code: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    RequestError,
    HtmlError,
    GoError,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

/// An error reply: status code plus JSON body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                error: message.into(),
                error_type,
                kind: None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

// ─── Handlers ────────────────────────────────────────────────────────────────

pub async fn convert(
    payload: Result<Json<ConvertRequest>, JsonRejection>,
) -> Result<Json<ConvertResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorType::RequestError,
            format!("Failed to parse request: {}", rejection.body_text()),
        )
    })?;

    match request.direction {
        Direction::Html2go => html_to_go(&request),
        Direction::Go2html => go_to_html(&request),
    }
    .map(Json)
}

fn html_to_go(request: &ConvertRequest) -> Result<ConvertResponse, ApiError> {
    if request.html.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorType::HtmlError,
            "HTML content cannot be empty",
        ));
    }

    let converter = Converter::with_package_prefix(request.package_prefix.as_str());
    match converter.convert(&request.html) {
        Ok(code) => {
            debug!(prefix = %request.package_prefix, bytes = code.len(), "html converted");
            Ok(ConvertResponse {
                code,
                ..Default::default()
            })
        }
        Err(e) => {
            warn!(kind = %e.kind(), error = %e, "html conversion failed");
            let mut err = ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorType::HtmlError,
                e.message(),
            );
            err.body.kind = Some(e.kind());
            Err(err)
        }
    }
}

fn go_to_html(request: &ConvertRequest) -> Result<ConvertResponse, ApiError> {
    if request.go_code.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            ErrorType::GoError,
            "Go code cannot be empty",
        ));
    }

    // Failures still answer 200; the comment takes the place of the markup.
    Ok(match builder_to_html(&request.go_code) {
        Ok(html) => ConvertResponse {
            html,
            ..Default::default()
        },
        Err(e) => {
            warn!(error = %e, "builder code conversion failed");
            ConvertResponse {
                html: e.to_html_comment(),
                error: Some(e.to_string()),
                ..Default::default()
            }
        }
    })
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::new(
        StatusCode::METHOD_NOT_ALLOWED,
        ErrorType::RequestError,
        "Only POST method is supported",
    )
}

pub async fn health() -> &'static str {
    "ok"
}
