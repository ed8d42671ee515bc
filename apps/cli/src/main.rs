//! # Serdaq CLI
//!
//! 串口数据采集命令行工具。
//!
//! ```bash
//! # 扫描可用串口
//! serdaq-cli ports
//!
//! # 配置默认参数
//! serdaq-cli config set --port /dev/ttyUSB0 --baud 9600
//!
//! # 采集（内部：打开串口 -> 后台读取 -> 停止时导出）
//! serdaq-cli record --fields Temperature,Humidity --output data.csv
//! ```
//!
//! 采集过程中：`p`+回车暂停，`r`+回车恢复，`q`+回车或 Ctrl-C 停止并导出。

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod defaults;

use commands::{ConfigCommand, PortsCommand, RecordCommand};

/// Serdaq CLI - 串口数据采集工具
#[derive(Parser, Debug)]
#[command(name = "serdaq-cli")]
#[command(about = "Command-line interface for serdaq serial data acquisition", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 列出可用串口
    Ports {
        #[command(flatten)]
        args: PortsCommand,
    },

    /// 采集数据并在停止时导出
    Record {
        #[command(flatten)]
        args: RecordCommand,
    },

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

fn main() -> Result<()> {
    // 日志走 stderr，不污染实时数据输出
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Ports { args } => args.execute(),
        Commands::Record { args } => args.execute(),
        Commands::Config(cmd) => cmd.execute(),
    }
}
