//! 基础设施模块
//!
//! 封装外部依赖（容器运行时 API、compose 子进程）

pub mod command;
pub mod compose;
pub mod docker;
pub mod runtime;

#[cfg(test)]
pub mod fake;

pub use command::CommandRunner;
pub use compose::ComposeDeployer;
pub use docker::DockerRuntime;
pub use runtime::{ContainerRuntime, StackDeployer};
