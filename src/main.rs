//! Penpot Stack Agent - Penpot 扩展后端
//!
//! Usage:
//! - Default socket: `penpot-stack-agent`
//! - Custom socket: `penpot-stack-agent --socket /tmp/backend.sock`
//! - JSON logs: `penpot-stack-agent --log-format json`

use clap::Parser;
use std::path::PathBuf;

use penpot_stack_agent::config::LogFormat;
use penpot_stack_agent::RuntimeConfig;

/// 命令行参数（未指定时使用环境变量或默认值）
#[derive(Debug, Parser)]
#[command(name = "penpot-stack-agent", version, about = "Penpot extension backend")]
struct Cli {
    /// Unix domain socket to listen on
    #[arg(long)]
    socket: Option<PathBuf>,

    /// Compose file used for the first deployment
    #[arg(long)]
    compose_file: Option<PathBuf>,

    /// Compose project name
    #[arg(long)]
    project: Option<String>,

    /// Log output format
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            socket_override: cli.socket,
            compose_file_override: cli.compose_file,
            project_override: cli.project,
            log_format_override: cli.log_format,
        }
    }
}

#[tokio::main]
async fn main() {
    let config = RuntimeConfig::from(Cli::parse());

    if let Err(e) = penpot_stack_agent::init_and_run_agent_with_config(config).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
