//! 已知服务目录
//!
//! 静态表，描述栈的组成，不依赖运行时状态

use crate::domain::ServiceInfo;

pub const KNOWN_SERVICES: &[ServiceInfo] = &[
    ServiceInfo {
        name: "penpot-frontend",
        description: "Frontend web interface",
    },
    ServiceInfo {
        name: "penpot-backend",
        description: "Backend API server",
    },
    ServiceInfo {
        name: "penpot-exporter",
        description: "Export service for rendering",
    },
    ServiceInfo {
        name: "penpot-postgres",
        description: "PostgreSQL database",
    },
    ServiceInfo {
        name: "penpot-valkey",
        description: "Valkey cache service",
    },
    ServiceInfo {
        name: "penpot-mailcatch",
        description: "Mail catcher for development",
    },
];
