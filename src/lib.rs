//! Penpot Stack Agent - Penpot 扩展后端
//!
//! 通过 Unix socket 为 UI 提供 Penpot 容器栈的状态、启停、重启和日志接口

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;
pub mod middleware;
pub mod server;
pub mod services;
pub mod state;

pub use config::RuntimeConfig;

use anyhow::Context;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{env::constants::VERSION, EnvConfig, LogFormat};
use crate::infra::{ComposeDeployer, ContainerRuntime, DockerRuntime};
use crate::state::AppState;

/// 初始化日志（RUST_LOG 优先，默认 info）
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init(),
    }
}

/// 加载配置、连接运行时并在 socket 上提供服务
pub async fn init_and_run_agent_with_config(runtime_config: RuntimeConfig) -> anyhow::Result<()> {
    let config = runtime_config.apply(EnvConfig::from_env());
    init_tracing(config.log_format);
    config.log_fallbacks();

    tracing::info!(version = VERSION, "Starting Penpot stack agent");

    let runtime = DockerRuntime::connect().context("Failed to create Docker client")?;
    if let Err(e) = runtime.ping().await {
        tracing::warn!(error = %e, "Container runtime is not reachable yet");
    }

    let deployer = ComposeDeployer::new(config.compose.clone());
    let socket_path = config.socket_path.clone();
    let state = Arc::new(AppState::new(config, Arc::new(runtime), Arc::new(deployer)));
    let app = api::router(state);

    let shutdown = CancellationToken::new();
    tokio::spawn(server::shutdown_signal(shutdown.clone()));

    server::serve_unix(&socket_path, app, shutdown).await
}
