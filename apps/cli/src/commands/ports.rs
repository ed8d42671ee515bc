//! 端口扫描命令

use anyhow::Result;
use clap::Args;
use serdaq_channel::list_ports;

/// 列出可用串口
#[derive(Args, Debug)]
pub struct PortsCommand {
    /// 只输出端口名（便于脚本处理）
    #[arg(short, long)]
    pub quiet: bool,
}

impl PortsCommand {
    pub fn execute(&self) -> Result<()> {
        let ports = list_ports()?;

        if ports.is_empty() {
            if !self.quiet {
                println!("没有找到可用串口");
            }
            return Ok(());
        }

        for port in ports {
            if self.quiet {
                println!("{}", port.name);
            } else {
                println!("{}", port);
            }
        }
        Ok(())
    }
}
