//! Unix socket HTTP 服务
//!
//! UI 与后端同机部署，只监听文件系统 socket，不开放 TCP 端口

use anyhow::Context;
use axum::{extract::Request, Router};
use hyper::body::Incoming;
use hyper_util::{
    rt::{TokioExecutor, TokioIo},
    server::conn::auto::Builder,
};
use std::path::Path;
use std::time::Duration;
use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use tracing::{debug, info, warn};

/// accept 失败（如文件描述符耗尽）后的等待时间
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// 清理残留的 socket 文件并确保父目录存在
pub fn prepare_socket_path(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create socket directory {}", parent.display()))?;
    }

    match std::fs::remove_file(path) {
        Ok(()) => debug!(socket = %path.display(), "Removed stale socket"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to remove stale socket {}", path.display()))
        }
    }
    Ok(())
}

/// 在 Unix socket 上服务路由，直到 `shutdown` 被取消
pub async fn serve_unix(path: &Path, app: Router, shutdown: CancellationToken) -> anyhow::Result<()> {
    prepare_socket_path(path)?;

    let listener = UnixListener::bind(path)
        .with_context(|| format!("Failed to bind socket {}", path.display()))?;
    info!(socket = %path.display(), "Listening on unix socket");

    loop {
        let stream = tokio::select! {
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, _)) => stream,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    if accept_backoff(&shutdown).await {
                        continue;
                    }
                    break;
                }
            },
        };

        let service = app.clone();
        tokio::spawn(async move {
            let io = TokioIo::new(stream);
            let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                service.clone().oneshot(request)
            });

            if let Err(e) = Builder::new(TokioExecutor::new())
                .serve_connection(io, hyper_service)
                .await
            {
                debug!(error = %e, "Connection closed with error");
            }
        });
    }

    info!("Shutting down");
    if let Err(e) = std::fs::remove_file(path) {
        warn!(socket = %path.display(), error = %e, "Failed to remove socket");
    }
    Ok(())
}

/// accept 出错后等待片刻再重试，等待期间被关闭则返回 false
async fn accept_backoff(shutdown: &CancellationToken) -> bool {
    tokio::select! {
        _ = shutdown.cancelled() => false,
        _ = tokio::time::sleep(ACCEPT_ERROR_BACKOFF) => true,
    }
}

/// 等待 SIGINT / SIGTERM 后取消 token
pub async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    token.cancel();
}
