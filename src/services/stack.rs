//! 栈生命周期操作
//!
//! 组合运行时客户端与成员过滤，实现 status / start / stop / restart / logs。
//! 每次调用都重新查询运行时，不保存任何状态。

use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::config::StackConfig;
use crate::domain::{HealthState, ServiceStatus, StackContainer, StackStatus};
use crate::error::{DeployError, RuntimeError};
use crate::infra::{ContainerRuntime, StackDeployer};

use super::filter::{partition_running, StackFilter};

/// 栈操作错误
#[derive(Debug, Error)]
pub enum StackError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("service {0} not found")]
    ServiceNotFound(String),
}

/// 批量操作结果
///
/// 单个容器失败不会中断批次，只记录日志
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    pub succeeded: usize,
    /// 失败的容器名
    pub failed: Vec<String>,
}

impl BatchOutcome {
    fn record(&mut self, name: &str, result: Result<(), RuntimeError>, action: &str) {
        match result {
            Ok(()) => self.succeeded += 1,
            Err(e) => {
                error!(container = %name, action, error = %e, "Container operation failed");
                self.failed.push(name.to_string());
            }
        }
    }
}

/// start 的两种结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// 栈中无容器，执行了 compose 部署
    Deployed,
    /// 启动了已存在但未运行的容器
    Started(BatchOutcome),
}

/// 栈操作服务
#[derive(Clone)]
pub struct StackService {
    runtime: Arc<dyn ContainerRuntime>,
    deployer: Arc<dyn StackDeployer>,
    config: StackConfig,
    filter: StackFilter,
}

impl StackService {
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        deployer: Arc<dyn StackDeployer>,
        config: StackConfig,
    ) -> Self {
        let filter = StackFilter::new(config.prefix.clone(), config.self_container.clone());
        Self {
            runtime,
            deployer,
            config,
            filter,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.config.display_name
    }

    /// 列出栈中的所有容器（不含自身）
    pub async fn discover(&self) -> Result<Vec<StackContainer>, RuntimeError> {
        let containers = self.runtime.list_containers(&self.config.prefix).await?;
        Ok(self.filter.apply(containers))
    }

    /// 汇总栈状态
    pub async fn status(&self) -> Result<StackStatus, RuntimeError> {
        let containers = self.discover().await?;

        if containers.is_empty() {
            return Ok(StackStatus {
                running: false,
                services: Vec::new(),
                message: format!(
                    "{} is not deployed. Click Start to deploy.",
                    self.config.display_name
                ),
            });
        }

        let mut services = Vec::with_capacity(containers.len());
        let mut running_count = 0;

        for container in &containers {
            let health = if container.is_running() {
                running_count += 1;
                self.health_of(container).await
            } else {
                HealthState::NotConfigured
            };

            services.push(ServiceStatus {
                name: container.name.clone(),
                status: container.status.clone(),
                state: container.state.clone(),
                health: health.to_string(),
                ports: container.port_summary(),
            });
        }

        Ok(StackStatus {
            running: running_count > 0,
            services,
            message: format!(
                "{} of {} services running",
                running_count,
                containers.len()
            ),
        })
    }

    /// 查询健康状态，失败时降级为 N/A
    async fn health_of(&self, container: &StackContainer) -> HealthState {
        match self.runtime.health(&container.id).await {
            Ok(health) => health,
            Err(e) => {
                warn!(container = %container.name, error = %e, "Failed to inspect container health");
                HealthState::NotConfigured
            }
        }
    }

    /// 启动栈：无容器时首次部署，否则启动未运行的容器
    pub async fn start(&self) -> Result<StartOutcome, StackError> {
        let containers = self.discover().await?;

        if containers.is_empty() {
            info!(
                stack = %self.config.display_name,
                "No stack containers found, deploying with compose"
            );
            let output = self.deployer.bring_up().await?;
            debug!(output = %output, "Compose output");
            info!(stack = %self.config.display_name, "Stack deployed");
            return Ok(StartOutcome::Deployed);
        }

        let (_, stopped) = partition_running(&containers);
        let mut outcome = BatchOutcome::default();
        for container in stopped {
            let result = self.runtime.start(&container.id).await;
            outcome.record(&container.name, result, "start");
        }

        info!(
            started = outcome.succeeded,
            failed = outcome.failed.len(),
            "Start finished"
        );
        Ok(StartOutcome::Started(outcome))
    }

    /// 停止所有运行中的栈容器
    pub async fn stop(&self) -> Result<BatchOutcome, RuntimeError> {
        let containers = self.discover().await?;
        let (running, _) = partition_running(&containers);

        let mut outcome = BatchOutcome::default();
        for container in running {
            let result = self
                .runtime
                .stop(&container.id, self.config.grace_period)
                .await;
            outcome.record(&container.name, result, "stop");
        }

        info!(
            stopped = outcome.succeeded,
            failed = outcome.failed.len(),
            "Stop finished"
        );
        Ok(outcome)
    }

    /// 重启所有栈容器（已停止的容器会被启动）
    pub async fn restart(&self) -> Result<BatchOutcome, RuntimeError> {
        let containers = self.discover().await?;

        let mut outcome = BatchOutcome::default();
        for container in &containers {
            let result = self
                .runtime
                .restart(&container.id, self.config.grace_period)
                .await;
            outcome.record(&container.name, result, "restart");
        }

        info!(
            restarted = outcome.succeeded,
            failed = outcome.failed.len(),
            "Restart finished"
        );
        Ok(outcome)
    }

    /// 获取服务最近的日志
    ///
    /// 取名称匹配的第一个容器；不存在时返回 `ServiceNotFound`
    pub async fn logs(&self, service: &str) -> Result<String, StackError> {
        let containers = self.runtime.list_containers(service).await?;
        let container = containers
            .first()
            .ok_or_else(|| StackError::ServiceNotFound(service.to_string()))?;

        let logs = self
            .runtime
            .logs(&container.id, self.config.log_tail)
            .await?;
        Ok(logs)
    }
}
