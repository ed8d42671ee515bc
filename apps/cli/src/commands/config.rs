//! 配置管理命令

use crate::defaults::CliDefaults;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

/// 配置管理
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 显示当前默认配置
    Show,

    /// 显示配置文件路径
    Path,

    /// 设置默认配置（只更新给出的项）
    Set {
        #[command(flatten)]
        args: SetArgs,
    },
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// 默认串口
    #[arg(short, long)]
    pub port: Option<String>,

    /// 默认波特率
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// 默认字段名（逗号分隔）
    #[arg(short, long)]
    pub fields: Option<String>,

    /// 默认输出路径
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Show => {
                let defaults = CliDefaults::load().unwrap_or_default();
                print!("{}", defaults.render());
                Ok(())
            },
            Self::Path => {
                let path = CliDefaults::path().context("no user config directory available")?;
                println!("{}", path.display());
                Ok(())
            },
            Self::Set { args } => {
                let mut defaults = CliDefaults::load().unwrap_or_default();
                if let Some(port) = args.port {
                    defaults.port = Some(port);
                }
                if let Some(baud) = args.baud {
                    defaults.baud_rate = Some(baud);
                }
                if let Some(fields) = args.fields {
                    defaults.fields = Some(fields);
                }
                if let Some(output) = args.output {
                    defaults.output = Some(output);
                }
                defaults.save()?;
                println!("✅ 配置已保存");
                Ok(())
            },
        }
    }
}
