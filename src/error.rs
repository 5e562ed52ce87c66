//! 统一错误处理
//!
//! - `ApiError`：HTTP 边界错误，实现 `IntoResponse`，输出统一的 `{success, message}` 信封
//! - `RuntimeError`：容器运行时调用失败
//! - `DeployError`：compose 首次部署失败

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::domain::envelope::ApiResponse;

/// 统一 API 错误类型
#[derive(Debug)]
pub enum ApiError {
    /// 404 - 资源未找到
    NotFound(String),
    /// 500 - 内部错误（运行时通信失败等）
    Internal(String),
}

impl ApiError {
    /// 创建未找到错误
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::NotFound(m) | ApiError::Internal(m) => m,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ApiResponse::<()>::failure(self.message());
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(m) => write!(f, "Not found: {}", m),
            ApiError::Internal(m) => write!(f, "Internal error: {}", m),
        }
    }
}

impl std::error::Error for ApiError {}

/// 便捷类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 容器运行时错误
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("container runtime API error: {0}")]
    Api(String),

    #[error("container {0} not found")]
    ContainerNotFound(String),
}

impl From<bollard::errors::Error> for RuntimeError {
    fn from(err: bollard::errors::Error) -> Self {
        match err {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404,
                message,
            } => RuntimeError::ContainerNotFound(message),
            other => RuntimeError::Api(other.to_string()),
        }
    }
}

/// compose 部署错误
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("failed to run compose: {0}")]
    Spawn(String),

    /// 子进程非零退出，携带合并后的 stdout/stderr
    #[error("compose exited with {code:?}: {output}")]
    Failed { code: Option<i32>, output: String },
}

impl DeployError {
    /// 返回给调用方的输出文本
    pub fn output(&self) -> &str {
        match self {
            DeployError::Spawn(msg) => msg,
            DeployError::Failed { output, .. } => output,
        }
    }
}
