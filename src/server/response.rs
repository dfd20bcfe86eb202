use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::TaskError;

/// 统一响应结构，业务失败也返回 200，由 `success` 区分
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ApiResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
        }
    }

    pub fn ok_with(message: impl Into<String>, data: impl Serialize) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self {
                success: true,
                message: message.into(),
                data: Some(value),
            },
            Err(e) => Self::fail(format!("响应序列化失败: {}", e)),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }

    pub fn bad_params() -> Self {
        Self::fail("参数错误")
    }
}

impl From<TaskError> for ApiResponse {
    fn from(err: TaskError) -> Self {
        warn!("请求失败: {}", err);
        Self::fail(err.to_string())
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}
