//! 命令执行器
//!
//! 子进程调用的统一入口（compose 部署等）

use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// 命令执行器
pub struct CommandRunner;

/// 命令执行错误
#[derive(Debug)]
pub enum CommandError {
    /// 命令启动失败
    SpawnFailed(std::io::Error),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::SpawnFailed(e) => write!(f, "Failed to spawn command: {}", e),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CommandError::SpawnFailed(e) => Some(e),
        }
    }
}

impl CommandRunner {
    /// 执行命令并等待完成，收集 stdout/stderr
    ///
    /// 不设超时：与运行时调用一致，直到子进程退出
    pub async fn run_simple(program: &str, args: &[&str]) -> Result<Output, CommandError> {
        debug!(program, ?args, "Running command");
        Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(CommandError::SpawnFailed)
    }

    /// 检查程序是否在 PATH 中
    pub async fn is_on_path(program: &str) -> bool {
        Command::new("which")
            .arg(program)
            .output()
            .await
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    /// 合并 stdout 与 stderr（按此顺序）
    pub fn combined_output(output: &Output) -> String {
        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        text
    }
}
