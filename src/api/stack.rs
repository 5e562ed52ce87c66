//! 栈生命周期 API
//!
//! 包含 /status, /start, /stop, /restart 端点

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::error;

use crate::domain::{ApiResponse, StackStatus};
use crate::error::{ApiError, ApiResult};
use crate::services::{StackError, StartOutcome};
use crate::state::AppState;

/// 创建栈生命周期路由
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(get_status))
        .route("/start", post(start_stack))
        .route("/stop", post(stop_stack))
        .route("/restart", post(restart_stack))
}

/// 获取栈状态
///
/// GET /status
async fn get_status(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ApiResponse<StackStatus>>> {
    let name = state.stack.display_name();
    let status = state.stack.status().await.map_err(|e| {
        error!(error = %e, "Failed to list containers");
        ApiError::internal(format!("Failed to get {} status", name))
    })?;

    Ok(Json(ApiResponse::ok(status)))
}

/// 启动或首次部署栈
///
/// POST /start
async fn start_stack(State(state): State<Arc<AppState>>) -> ApiResult<Json<ApiResponse<()>>> {
    let name = state.stack.display_name();
    let outcome = state.stack.start().await.map_err(|e| match e {
        StackError::Deploy(deploy) => {
            error!(error = %deploy, "Failed to deploy stack");
            ApiError::internal(format!("Failed to deploy {}: {}", name, deploy.output()))
        }
        other => {
            error!(error = %other, "Failed to start stack");
            ApiError::internal(format!("Failed to start {}", name))
        }
    })?;

    let message = match outcome {
        StartOutcome::Deployed => {
            format!("{} deployed successfully. Services are starting...", name)
        }
        StartOutcome::Started(batch) => {
            format!("Started {} {} service(s)", batch.succeeded, name)
        }
    };

    Ok(Json(ApiResponse::message(message)))
}

/// 停止栈（不含自身容器）
///
/// POST /stop
async fn stop_stack(State(state): State<Arc<AppState>>) -> ApiResult<Json<ApiResponse<()>>> {
    let name = state.stack.display_name();
    let outcome = state.stack.stop().await.map_err(|e| {
        error!(error = %e, "Failed to list containers");
        ApiError::internal(format!("Failed to stop {}", name))
    })?;

    Ok(Json(ApiResponse::message(format!(
        "Stopped {} {} service(s)",
        outcome.succeeded, name
    ))))
}

/// 重启栈（不含自身容器）
///
/// POST /restart
async fn restart_stack(State(state): State<Arc<AppState>>) -> ApiResult<Json<ApiResponse<()>>> {
    let name = state.stack.display_name();
    let outcome = state.stack.restart().await.map_err(|e| {
        error!(error = %e, "Failed to list containers");
        ApiError::internal(format!("Failed to restart {}", name))
    })?;

    Ok(Json(ApiResponse::message(format!(
        "Restarted {} {} service(s)",
        outcome.succeeded, name
    ))))
}
