//! 容器运行时与部署器抽象
//!
//! 通过构造注入到 `AppState`，测试中可替换为内存实现

use async_trait::async_trait;
use std::time::Duration;

use crate::domain::{HealthState, StackContainer};
use crate::error::{DeployError, RuntimeError};

/// 容器运行时客户端
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// 列出名称匹配过滤条件的所有容器（含已停止）
    async fn list_containers(&self, name_filter: &str) -> Result<Vec<StackContainer>, RuntimeError>;

    /// 查询容器健康检查状态
    async fn health(&self, id: &str) -> Result<HealthState, RuntimeError>;

    async fn start(&self, id: &str) -> Result<(), RuntimeError>;

    /// 优雅停止，超过 `grace` 后强制终止
    async fn stop(&self, id: &str, grace: Duration) -> Result<(), RuntimeError>;

    async fn restart(&self, id: &str, grace: Duration) -> Result<(), RuntimeError>;

    /// 获取最近 `tail` 行 stdout+stderr，完整缓冲后返回
    async fn logs(&self, id: &str, tail: usize) -> Result<String, RuntimeError>;

    /// 连通性检查
    async fn ping(&self) -> Result<(), RuntimeError>;
}

/// 首次部署（声明式拉起整个栈）
#[async_trait]
pub trait StackDeployer: Send + Sync {
    /// 返回部署命令的输出
    async fn bring_up(&self) -> Result<String, DeployError>;
}
