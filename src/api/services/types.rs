//! API 响应类型与错误码

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use tracing::error;

use crate::errors::LinkhopError;
use crate::storage::LinkRecord;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 链接错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    InternalServerError = 1005,
    ServiceUnavailable = 1030,

    LinkNotFound = 3000,
    LinkAlreadyExists = 3001,
}

/// 统一响应信封 `{code, message, data}`
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PostNewLink {
    pub original_url: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct PutLink {
    pub original_url: String,
}

/// Link as shown to its owner
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LinkResponse {
    pub id: String,
    pub code: String,
    pub original_url: String,
    pub clicks: u64,
    pub created_at: DateTime<Utc>,
}

impl From<LinkRecord> for LinkResponse {
    fn from(record: LinkRecord) -> Self {
        Self {
            id: record.id,
            code: record.short_code,
            original_url: record.original_url,
            clicks: record.clicks,
            created_at: record.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub links_count: Option<u64>,
    pub storage_type: String,
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub accounting_failures: u64,
    pub response_time_ms: u64,
}

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(status: StatusCode, data: T) -> HttpResponse {
    json_response(status, ErrorCode::Success, "OK", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, code, message, None)
}

/// 从 LinkhopError 构建错误响应；基础设施错误只返回通用信息
pub fn error_from_linkhop(err: &LinkhopError) -> HttpResponse {
    match err {
        LinkhopError::Validation(msg) => {
            error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, msg)
        }
        LinkhopError::NotFound(msg) => {
            error_response(StatusCode::NOT_FOUND, ErrorCode::LinkNotFound, msg)
        }
        LinkhopError::Conflict(msg) => {
            error_response(StatusCode::CONFLICT, ErrorCode::LinkAlreadyExists, msg)
        }
        LinkhopError::Unauthorized(msg) => {
            error_response(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, msg)
        }
        other => {
            error!("API request failed: {}", other);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Internal Server Error",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serializes_as_number() {
        let body = ApiResponse::<()> {
            code: ErrorCode::LinkNotFound as i32,
            message: "missing".to_string(),
            data: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["code"], 3000);
        assert_eq!(serde_json::to_string(&ErrorCode::Unauthorized).unwrap(), "1001");
    }

    #[test]
    fn test_error_mapping() {
        let cases = [
            (LinkhopError::not_found("x"), StatusCode::NOT_FOUND),
            (LinkhopError::conflict("x"), StatusCode::CONFLICT),
            (LinkhopError::validation("bad url"), StatusCode::BAD_REQUEST),
            (
                LinkhopError::database_connection("down"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_from_linkhop(&err).status(), status);
        }
    }
}
