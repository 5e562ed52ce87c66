//! 已知服务目录 API
//!
//! GET /services

use axum::{routing::get, Json, Router};
use std::sync::Arc;

use crate::config::KNOWN_SERVICES;
use crate::domain::{ApiResponse, ServiceInfo};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/services", get(list_services))
}

async fn list_services() -> Json<ApiResponse<&'static [ServiceInfo]>> {
    Json(ApiResponse::ok(KNOWN_SERVICES))
}
