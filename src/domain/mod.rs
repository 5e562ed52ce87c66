//! 领域模型模块
//!
//! 纯数据结构，不依赖 axum/tokio

pub mod container;
pub mod envelope;

// Re-exports for convenience
pub use container::{
    HealthState, PortBinding, ServiceInfo, ServiceStatus, StackContainer, StackStatus,
};
pub use envelope::ApiResponse;
