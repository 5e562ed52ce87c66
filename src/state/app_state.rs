//! 应用状态
//!
//! 只持有由配置和注入句柄构建的栈服务，不缓存任何栈状态

use std::sync::Arc;

use crate::config::EnvConfig;
use crate::infra::{ContainerRuntime, StackDeployer};
use crate::services::StackService;

/// 应用状态
pub struct AppState {
    /// 栈操作服务
    pub stack: StackService,
}

impl AppState {
    /// 使用注入的运行时与部署器创建状态
    pub fn new(
        config: EnvConfig,
        runtime: Arc<dyn ContainerRuntime>,
        deployer: Arc<dyn StackDeployer>,
    ) -> Self {
        tracing::info!(
            socket = %config.socket_path.display(),
            prefix = %config.stack.prefix,
            self_container = %config.stack.self_container,
            compose_file = %config.compose.file.display(),
            compose_project = %config.compose.project,
            grace_secs = config.stack.grace_period.as_secs(),
            log_tail = config.stack.log_tail,
            "Loaded configuration"
        );

        let stack = StackService::new(runtime, deployer, config.stack);
        Self { stack }
    }
}
