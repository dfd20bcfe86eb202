use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),

    #[error("服务暂时不可用，请稍后重试")]
    RetryLater,

    #[error("B站 API 错误({0}): {1}")]
    ApiError(i64, String),

    #[error("短链接没有返回重定向地址: {0}")]
    MissingLocation(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}
