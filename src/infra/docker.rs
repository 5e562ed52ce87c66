//! Docker 运行时客户端（bollard）

use async_trait::async_trait;
use bollard::container::{
    InspectContainerOptions, ListContainersOptions, LogsOptions, RestartContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::models::ContainerSummary;
use bollard::Docker;
use futures_util::StreamExt;
use std::collections::HashMap;
use std::time::Duration;

use crate::domain::{HealthState, PortBinding, StackContainer};
use crate::error::RuntimeError;

use super::runtime::ContainerRuntime;

/// 基于 Docker Engine API 的运行时
#[derive(Clone)]
pub struct DockerRuntime {
    client: Docker,
}

impl DockerRuntime {
    /// 使用本地默认配置连接（遵循 DOCKER_HOST）
    pub fn connect() -> Result<Self, RuntimeError> {
        let client = Docker::connect_with_local_defaults()?;
        Ok(Self { client })
    }
}

/// 优雅停止秒数，超出 i64 时取上限
fn stop_timeout(grace: Duration) -> i64 {
    i64::try_from(grace.as_secs()).unwrap_or(i64::MAX)
}

/// 同上，restart 接口使用 isize
fn restart_timeout(grace: Duration) -> isize {
    isize::try_from(grace.as_secs()).unwrap_or(isize::MAX)
}

impl From<ContainerSummary> for StackContainer {
    fn from(summary: ContainerSummary) -> Self {
        let id = summary.id.unwrap_or_default();
        let name = StackContainer::display_name(&summary.names.unwrap_or_default(), &id);
        let ports = summary
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|p| PortBinding {
                public_port: p.public_port,
                private_port: p.private_port,
            })
            .collect();

        Self {
            id,
            name,
            state: summary.state.map(|s| s.to_string()).unwrap_or_default(),
            status: summary.status.unwrap_or_default(),
            ports,
        }
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    async fn list_containers(&self, name_filter: &str) -> Result<Vec<StackContainer>, RuntimeError> {
        let mut filters = HashMap::new();
        filters.insert("name".to_string(), vec![name_filter.to_string()]);

        let options = ListContainersOptions::<String> {
            all: true,
            filters,
            ..Default::default()
        };

        let containers = self.client.list_containers(Some(options)).await?;
        Ok(containers.into_iter().map(StackContainer::from).collect())
    }

    async fn health(&self, id: &str) -> Result<HealthState, RuntimeError> {
        let inspect = self
            .client
            .inspect_container(id, None::<InspectContainerOptions>)
            .await?;

        let status = inspect
            .state
            .and_then(|s| s.health)
            .and_then(|h| h.status)
            .map(|s| s.to_string());

        Ok(status
            .as_deref()
            .map(HealthState::from_runtime)
            .unwrap_or(HealthState::NotConfigured))
    }

    async fn start(&self, id: &str) -> Result<(), RuntimeError> {
        self.client
            .start_container(id, None::<StartContainerOptions<String>>)
            .await?;
        Ok(())
    }

    async fn stop(&self, id: &str, grace: Duration) -> Result<(), RuntimeError> {
        let options = StopContainerOptions {
            t: stop_timeout(grace),
        };
        self.client.stop_container(id, Some(options)).await?;
        Ok(())
    }

    async fn restart(&self, id: &str, grace: Duration) -> Result<(), RuntimeError> {
        let options = RestartContainerOptions {
            t: restart_timeout(grace),
        };
        self.client.restart_container(id, Some(options)).await?;
        Ok(())
    }

    async fn logs(&self, id: &str, tail: usize) -> Result<String, RuntimeError> {
        let options = LogsOptions::<String> {
            stdout: true,
            stderr: true,
            tail: tail.to_string(),
            ..Default::default()
        };

        let mut stream = self.client.logs(id, Some(options));
        let mut buf = String::new();
        while let Some(chunk) = stream.next().await {
            buf.push_str(&chunk?.to_string());
        }
        Ok(buf)
    }

    async fn ping(&self) -> Result<(), RuntimeError> {
        self.client.ping().await?;
        Ok(())
    }
}
