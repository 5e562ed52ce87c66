//! API 模块
//!
//! HTTP handlers 和路由组装

pub mod logs;
pub mod services;
pub mod stack;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::middleware::request_log;
use crate::state::AppState;

/// 构建完整的 API 路由
pub fn router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        // Status / Start / Stop / Restart
        .merge(stack::router())
        // Logs
        .merge(logs::router())
        // Known services
        .merge(services::router())
        // socket 文件本身就是访问边界，CORS 全部放行
        .layer(CorsLayer::permissive());

    request_log::apply(router).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::EnvConfig;
    use crate::domain::HealthState;
    use crate::infra::fake::{FakeDeployer, FakeRuntime};
    use crate::middleware::REQUEST_ID_HEADER;

    fn app(runtime: Arc<FakeRuntime>, deployer: Arc<FakeDeployer>) -> Router {
        let state = AppState::new(EnvConfig::default(), runtime, deployer);
        router(Arc::new(state))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn scenario_stack() -> FakeRuntime {
        FakeRuntime::new()
            .with_container("penpot-frontend", "running")
            .with_container("penpot-backend", "running")
            .with_container("penpot-exporter", "exited")
            .with_container("penpot-extension-backend", "running")
            .with_container("extension-backend-a", "running")
            .with_container("extension-backend-b", "running")
            .with_health("penpot-backend", HealthState::Healthy)
    }

    #[tokio::test]
    async fn test_status_scenario() {
        let app = app(Arc::new(scenario_stack()), Arc::new(FakeDeployer::new()));

        let (status, body) = send(app, Method::GET, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["running"], true);
        assert_eq!(body["data"]["message"], "2 of 3 services running");

        let services = body["data"]["services"].as_array().unwrap();
        assert_eq!(services.len(), 3);
        for s in services {
            let name = s["name"].as_str().unwrap();
            assert!(name.starts_with("penpot-"));
            assert_ne!(name, "penpot-extension-backend");
        }
        let backend = services
            .iter()
            .find(|s| s["name"] == "penpot-backend")
            .unwrap();
        assert_eq!(backend["health"], "healthy");
        assert_eq!(backend["state"], "running");
    }

    #[tokio::test]
    async fn test_status_not_deployed() {
        let runtime = FakeRuntime::new().with_container("penpot-extension-backend", "running");
        let app = app(Arc::new(runtime), Arc::new(FakeDeployer::new()));

        let (status, body) = send(app, Method::GET, "/status").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["running"], false);
        assert_eq!(
            body["data"]["message"],
            "Penpot is not deployed. Click Start to deploy."
        );
        assert_eq!(body["data"]["services"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_status_runtime_failure() {
        let app = app(
            Arc::new(FakeRuntime::new().failing_list()),
            Arc::new(FakeDeployer::new()),
        );

        let (status, body) = send(app, Method::GET, "/status").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to get Penpot status");
    }

    #[tokio::test]
    async fn test_start_deploys_when_empty() {
        let deployer = Arc::new(FakeDeployer::new());
        let app = app(Arc::new(FakeRuntime::new()), deployer.clone());

        let (status, body) = send(app, Method::POST, "/start").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(
            body["message"],
            "Penpot deployed successfully. Services are starting..."
        );
        assert_eq!(deployer.invocations(), 1);
    }

    #[tokio::test]
    async fn test_start_with_only_stopped_self_deploys() {
        let runtime = Arc::new(FakeRuntime::new().with_container("penpot-extension-backend", "exited"));
        let deployer = Arc::new(FakeDeployer::new());
        let app = app(runtime.clone(), deployer.clone());

        let (status, body) = send(app, Method::POST, "/start").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["message"],
            "Penpot deployed successfully. Services are starting..."
        );
        assert_eq!(deployer.invocations(), 1);
        assert!(runtime.calls().is_empty());
    }

    #[tokio::test]
    async fn test_start_existing_never_deploys() {
        let deployer = Arc::new(FakeDeployer::new());
        let app = app(Arc::new(scenario_stack()), deployer.clone());

        let (status, body) = send(app, Method::POST, "/start").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Started 1 Penpot service(s)");
        assert_eq!(deployer.invocations(), 0);
    }

    #[tokio::test]
    async fn test_start_deploy_failure_reports_output() {
        let deployer = Arc::new(FakeDeployer::failing("open /penpot-compose.yaml: no such file"));
        let app = app(Arc::new(FakeRuntime::new()), deployer);

        let (status, body) = send(app, Method::POST, "/start").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Failed to deploy Penpot: open /penpot-compose.yaml: no such file"
        );
    }

    #[tokio::test]
    async fn test_stop_and_restart_counts() {
        let runtime = Arc::new(scenario_stack());

        let (status, body) = send(
            app(runtime.clone(), Arc::new(FakeDeployer::new())),
            Method::POST,
            "/stop",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Stopped 2 Penpot service(s)");
        assert_eq!(
            runtime.state_of("penpot-extension-backend").as_deref(),
            Some("running")
        );

        let (status, body) = send(
            app(runtime.clone(), Arc::new(FakeDeployer::new())),
            Method::POST,
            "/restart",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Restarted 3 Penpot service(s)");
    }

    #[tokio::test]
    async fn test_stop_partial_failure_still_succeeds() {
        let runtime = Arc::new(scenario_stack().failing("penpot-backend"));
        let app = app(runtime, Arc::new(FakeDeployer::new()));

        let (status, body) = send(app, Method::POST, "/stop").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "Stopped 1 Penpot service(s)");
    }

    #[tokio::test]
    async fn test_stop_and_restart_runtime_failure() {
        let runtime = Arc::new(FakeRuntime::new().failing_list());

        let (status, body) = send(
            app(runtime.clone(), Arc::new(FakeDeployer::new())),
            Method::POST,
            "/stop",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Failed to stop Penpot");

        let (status, body) = send(
            app(runtime.clone(), Arc::new(FakeDeployer::new())),
            Method::POST,
            "/restart",
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Failed to restart Penpot");
        assert!(!runtime.mutated());
    }

    #[tokio::test]
    async fn test_logs_found() {
        let runtime = scenario_stack().with_logs("penpot-backend", "ready\n");
        let app = app(Arc::new(runtime), Arc::new(FakeDeployer::new()));

        let (status, body) = send(app, Method::GET, "/logs/penpot-backend").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "ready\n");
    }

    #[tokio::test]
    async fn test_logs_unknown_service() {
        let runtime = Arc::new(scenario_stack());
        let app = app(runtime.clone(), Arc::new(FakeDeployer::new()));

        let (status, body) = send(app, Method::GET, "/logs/doesnotexist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Service doesnotexist not found");
        assert!(!runtime.mutated());
    }

    #[tokio::test]
    async fn test_services_catalog() {
        let app = app(Arc::new(FakeRuntime::new()), Arc::new(FakeDeployer::new()));

        let (status, body) = send(app, Method::GET, "/services").await;
        assert_eq!(status, StatusCode::OK);
        let services = body["data"].as_array().unwrap();
        assert_eq!(services.len(), 6);
        assert_eq!(services[0]["name"], "penpot-frontend");
        assert_eq!(services[0]["description"], "Frontend web interface");
    }

    #[tokio::test]
    async fn test_cors_and_request_id_headers() {
        let app = app(Arc::new(FakeRuntime::new()), Arc::new(FakeDeployer::new()));
        let request = Request::builder()
            .uri("/services")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
    }
}
