//! 容器相关领域模型

use serde::Serialize;

/// 运行时报告的 "running" 状态
pub const STATE_RUNNING: &str = "running";

/// 短 ID 长度（与 docker ps 一致）
const SHORT_ID_LEN: usize = 12;

/// 端口绑定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortBinding {
    /// 宿主机端口，未发布时为 None
    pub public_port: Option<u16>,
    pub private_port: u16,
}

/// 运行时列出的单个容器（与具体运行时客户端无关）
#[derive(Debug, Clone)]
pub struct StackContainer {
    pub id: String,
    /// 去掉前导 `/` 的容器名
    pub name: String,
    /// 粗粒度状态，如 running / exited / created
    pub state: String,
    /// 可读状态，如 "Up 2 hours (healthy)"
    pub status: String,
    pub ports: Vec<PortBinding>,
}

impl StackContainer {
    /// 从运行时返回的原始名称列表构造显示名称
    ///
    /// 取第一个名称并去掉前导 `/`；没有名称时退回短 ID
    pub fn display_name(names: &[String], id: &str) -> String {
        names
            .first()
            .map(|n| n.trim_start_matches('/').to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.chars().take(SHORT_ID_LEN).collect())
    }

    pub fn is_running(&self) -> bool {
        self.state == STATE_RUNNING
    }

    /// 端口映射摘要，仅包含已发布到宿主机的端口
    ///
    /// 格式 `public:private`，以 `, ` 连接；IPv4/IPv6 重复绑定只保留一次
    pub fn port_summary(&self) -> String {
        let mut pairs: Vec<String> = Vec::new();
        for port in &self.ports {
            let Some(public) = port.public_port.filter(|p| *p > 0) else {
                continue;
            };
            let pair = format!("{}:{}", public, port.private_port);
            if !pairs.contains(&pair) {
                pairs.push(pair);
            }
        }
        pairs.join(", ")
    }
}

/// 健康检查状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthState {
    Healthy,
    Unhealthy,
    Starting,
    /// 未配置健康检查，或无法获取
    NotConfigured,
}

impl HealthState {
    /// 从运行时的健康状态字符串解析
    pub fn from_runtime(status: &str) -> Self {
        match status {
            "healthy" => HealthState::Healthy,
            "unhealthy" => HealthState::Unhealthy,
            "starting" => HealthState::Starting,
            _ => HealthState::NotConfigured,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
            HealthState::Starting => "starting",
            HealthState::NotConfigured => "N/A",
        }
    }
}

impl std::fmt::Display for HealthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单个服务状态
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub name: String,
    pub status: String,
    pub state: String,
    pub health: String,
    pub ports: String,
}

/// 整个栈的状态
#[derive(Debug, Clone, Serialize)]
pub struct StackStatus {
    pub running: bool,
    pub services: Vec<ServiceStatus>,
    pub message: String,
}

/// 已知服务目录条目
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub description: &'static str,
}
