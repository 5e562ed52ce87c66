//! Docker Compose 首次部署
//!
//! 栈中还没有任何容器时，用 compose 文件一次性创建并启动全部服务

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::ComposeConfig;
use crate::error::DeployError;

use super::command::CommandRunner;
use super::runtime::StackDeployer;

/// 通过 `compose up -d` 部署整个栈
pub struct ComposeDeployer {
    config: ComposeConfig,
}

impl ComposeDeployer {
    pub fn new(config: ComposeConfig) -> Self {
        Self { config }
    }

    /// 构造 `up -d` 参数（不含 compose 程序本身）
    fn up_args(&self) -> Vec<String> {
        vec![
            "-f".to_string(),
            self.config.file.display().to_string(),
            "-p".to_string(),
            self.config.project.clone(),
            "up".to_string(),
            "-d".to_string(),
        ]
    }
}

#[async_trait]
impl StackDeployer for ComposeDeployer {
    async fn bring_up(&self) -> Result<String, DeployError> {
        let (program, prefix) = detect_compose_command().await;
        let up_args = self.up_args();
        let args: Vec<&str> = prefix
            .into_iter()
            .chain(up_args.iter().map(String::as_str))
            .collect();

        info!(
            program,
            compose_file = %self.config.file.display(),
            project = %self.config.project,
            "Running compose up"
        );

        let output = CommandRunner::run_simple(program, &args)
            .await
            .map_err(|e| DeployError::Spawn(e.to_string()))?;
        let combined = CommandRunner::combined_output(&output);

        if !output.status.success() {
            error!(
                exit_code = ?output.status.code(),
                output = %combined,
                "Compose up failed"
            );
            return Err(DeployError::Failed {
                code: output.status.code(),
                output: combined,
            });
        }

        Ok(combined)
    }
}

/// 选择 compose 命令（优先独立的 docker-compose，否则使用 docker compose 插件）
async fn detect_compose_command() -> (&'static str, Vec<&'static str>) {
    if CommandRunner::is_on_path("docker-compose").await {
        ("docker-compose", vec![])
    } else {
        ("docker", vec!["compose"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_up_args() {
        let deployer = ComposeDeployer::new(ComposeConfig {
            file: PathBuf::from("/penpot-compose.yaml"),
            project: "penpot".to_string(),
        });
        assert_eq!(
            deployer.up_args(),
            vec!["-f", "/penpot-compose.yaml", "-p", "penpot", "up", "-d"]
        );
    }
}
