//! 环境变量配置加载

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use self::constants::*;

/// 日志输出格式
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {}", other)),
        }
    }
}

/// 环境配置
#[derive(Clone, Debug)]
pub struct EnvConfig {
    /// 监听的 Unix socket 路径
    pub socket_path: PathBuf,
    /// 栈配置
    pub stack: StackConfig,
    /// compose 部署配置
    pub compose: ComposeConfig,
    /// 日志格式
    pub log_format: LogFormat,
    /// 非法值回退记录（日志初始化之后再输出）
    pub fallbacks: Vec<ConfigFallback>,
}

/// 非法配置值，已回退为默认值
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfigFallback {
    pub key: &'static str,
    pub value: String,
}

/// 栈识别与操作参数
#[derive(Clone, Debug)]
pub struct StackConfig {
    /// 容器名前缀
    pub prefix: String,
    /// 自身容器名（所有生命周期操作都跳过它）
    pub self_container: String,
    /// 消息中使用的栈名称
    pub display_name: String,
    /// stop/restart 的优雅停止时间
    pub grace_period: Duration,
    /// 日志返回的最大行数
    pub log_tail: usize,
}

/// 首次部署使用的 compose 参数
#[derive(Clone, Debug)]
pub struct ComposeConfig {
    pub file: PathBuf,
    pub project: String,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源加载配置
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let mut fallbacks = Vec::new();
        let grace_secs: u64 =
            parse_or_default(&lookup, "STOP_GRACE_SECS", DEFAULT_GRACE_SECS, &mut fallbacks);
        let log_tail: usize =
            parse_or_default(&lookup, "LOG_TAIL_LINES", DEFAULT_LOG_TAIL, &mut fallbacks);
        let log_format: LogFormat =
            parse_or_default(&lookup, "LOG_FORMAT", LogFormat::Text, &mut fallbacks);

        Self {
            socket_path: PathBuf::from(text("SOCKET_PATH", DEFAULT_SOCKET_PATH)),
            stack: StackConfig {
                prefix: text("STACK_PREFIX", DEFAULT_STACK_PREFIX),
                self_container: text("SELF_CONTAINER_NAME", DEFAULT_SELF_CONTAINER),
                display_name: text("STACK_DISPLAY_NAME", DEFAULT_DISPLAY_NAME),
                grace_period: Duration::from_secs(grace_secs),
                log_tail,
            },
            compose: ComposeConfig {
                file: PathBuf::from(text("COMPOSE_FILE", DEFAULT_COMPOSE_FILE)),
                project: text("COMPOSE_PROJECT", DEFAULT_COMPOSE_PROJECT),
            },
            log_format,
            fallbacks,
        }
    }

    /// 输出非法值回退警告，须在日志初始化之后调用
    pub fn log_fallbacks(&self) {
        for fallback in &self.fallbacks {
            warn!(
                key = fallback.key,
                value = %fallback.value,
                "Invalid value, using default"
            );
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

/// 解析环境变量，缺失或非法时使用默认值；非法值记入 `fallbacks`
fn parse_or_default<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    fallbacks: &mut Vec<ConfigFallback>,
) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                fallbacks.push(ConfigFallback { key, value: raw });
                default
            }
        },
        None => default,
    }
}

/// 常量
pub mod constants {
    pub const DEFAULT_SOCKET_PATH: &str = "/run/guest-services/backend.sock";
    pub const DEFAULT_STACK_PREFIX: &str = "penpot-";
    pub const DEFAULT_SELF_CONTAINER: &str = "penpot-extension-backend";
    pub const DEFAULT_DISPLAY_NAME: &str = "Penpot";
    pub const DEFAULT_COMPOSE_FILE: &str = "/penpot-compose.yaml";
    pub const DEFAULT_COMPOSE_PROJECT: &str = "penpot";

    /// stop/restart 优雅停止时间（秒）
    pub const DEFAULT_GRACE_SECS: u64 = 10;

    /// 日志尾部行数
    pub const DEFAULT_LOG_TAIL: usize = 100;

    /// 版本号
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
}
