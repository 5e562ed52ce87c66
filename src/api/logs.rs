//! 服务日志 API
//!
//! GET /logs/:service

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tracing::error;

use crate::domain::ApiResponse;
use crate::error::{ApiError, ApiResult};
use crate::services::StackError;
use crate::state::AppState;

/// 创建日志路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/logs/:service", get(get_service_logs))
}

/// 获取服务最近的日志（stdout+stderr 合并为一个字符串）
async fn get_service_logs(
    State(state): State<Arc<AppState>>,
    Path(service): Path<String>,
) -> ApiResult<Json<ApiResponse<String>>> {
    let logs = state.stack.logs(&service).await.map_err(|e| match e {
        StackError::ServiceNotFound(_) => {
            ApiError::not_found(format!("Service {} not found", service))
        }
        other => {
            error!(service = %service, error = %other, "Failed to get logs");
            ApiError::internal("Failed to get logs")
        }
    })?;

    Ok(Json(ApiResponse::ok(logs)))
}
