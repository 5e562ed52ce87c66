//! 配置模块
//!
//! 环境变量解析、命令行覆盖与静态服务目录

pub mod catalog;
pub mod env;

use std::path::PathBuf;

pub use catalog::KNOWN_SERVICES;
pub use env::{ComposeConfig, EnvConfig, LogFormat, StackConfig};

/// 命令行覆盖项，优先级高于环境变量
#[derive(Clone, Debug, Default)]
pub struct RuntimeConfig {
    pub socket_override: Option<PathBuf>,
    pub compose_file_override: Option<PathBuf>,
    pub project_override: Option<String>,
    pub log_format_override: Option<LogFormat>,
}

impl RuntimeConfig {
    /// 将覆盖项合并到环境配置上
    pub fn apply(&self, mut config: EnvConfig) -> EnvConfig {
        if let Some(socket) = &self.socket_override {
            config.socket_path = socket.clone();
        }
        if let Some(file) = &self.compose_file_override {
            config.compose.file = file.clone();
        }
        if let Some(project) = &self.project_override {
            config.compose.project = project.clone();
        }
        if let Some(format) = self.log_format_override {
            config.log_format = format;
        }
        config
    }
}
