//! 采集命令
//!
//! 打开串口、实时回显接受的行、停止时导出表格文件。

use crate::defaults::CliDefaults;
use anyhow::{Context, Result, bail};
use clap::{Args, ValueEnum};
use crossbeam_channel::RecvTimeoutError;
use serdaq_channel::list_ports;
use serdaq_record::Schema;
use serdaq_session::{ExportFormat, SessionConfig, SessionController, SessionEvent};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::time::Duration;

/// 输出格式参数
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

/// 采集命令参数
#[derive(Args, Debug)]
pub struct RecordCommand {
    /// 串口（缺省时使用配置文件，交互环境下可现场选择）
    #[arg(short, long)]
    pub port: Option<String>,

    /// 波特率
    #[arg(short, long)]
    pub baud: Option<u32>,

    /// 字段名（逗号分隔，如 Temperature,Humidity）
    #[arg(short, long)]
    pub fields: Option<String>,

    /// 输出文件路径
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 输出格式（缺省按扩展名推断，推断不出时用 csv）
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

impl RecordCommand {
    /// 执行采集
    pub fn execute(&self) -> Result<()> {
        let defaults = CliDefaults::load().unwrap_or_default();
        let config = self.resolve_config(&defaults)?;

        println!("⏳ 打开 {} ({} baud)...", config.port, config.baud_rate);

        let mut session = SessionController::new(config)?;
        session.start().context("failed to start acquisition session")?;
        let events = session.take_events().expect("fresh session yields an event stream");

        println!("✅ 采集中（p 暂停 / r 恢复 / q 或 Ctrl-C 停止）");

        // 进程级中断与显式停止走同一条收尾路径
        let interrupted = Arc::new(AtomicBool::new(false));
        {
            let interrupted = interrupted.clone();
            ctrlc::set_handler(move || {
                interrupted.store(true, Ordering::SeqCst);
            })
            .context("failed to register Ctrl-C handler")?;
        }

        // 专用输入线程：逐行读 stdin 控制命令
        let (cmd_tx, cmd_rx) = mpsc::channel::<String>();
        std::thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if cmd_tx.send(line.trim().to_lowercase()).is_err() {
                    break;
                }
            }
        });

        loop {
            if interrupted.load(Ordering::SeqCst) {
                println!();
                break;
            }

            // 实时事件
            match events.recv_timeout(Duration::from_millis(100)) {
                Ok(SessionEvent::Line(line)) => println!("{}", line),
                Ok(SessionEvent::Fault(msg)) => {
                    eprintln!("⚠️  设备故障: {}", msg);
                    break;
                },
                Ok(SessionEvent::Stopped) => break,
                Err(RecvTimeoutError::Timeout) => {},
                Err(RecvTimeoutError::Disconnected) => break,
            }

            // 控制命令
            while let Ok(cmd) = cmd_rx.try_recv() {
                match cmd.as_str() {
                    "p" | "pause" => {
                        if session.pause()? {
                            println!("⏸  已暂停");
                        }
                    },
                    "r" | "resume" => {
                        if session.resume()? {
                            println!("▶️  已恢复");
                        }
                    },
                    "q" | "quit" | "stop" => {
                        interrupted.store(true, Ordering::SeqCst);
                    },
                    "" => {},
                    other => println!("未知命令: {}（可用 p / r / q）", other),
                }
            }
        }

        let counters = session.counters();
        match session.stop()? {
            Some(summary) => {
                println!("💾 已导出 {} 行到 {}", summary.rows, summary.path.display());
            },
            None => println!("会话已结束，无需导出"),
        }

        println!(
            "✅ 完成: 接受 {} 条，拒绝 {} 条，解码失败 {} 条",
            counters.records_accepted, counters.lines_rejected, counters.decode_errors
        );

        Ok(())
    }

    /// 合并命令行参数与配置文件默认值
    fn resolve_config(&self, defaults: &CliDefaults) -> Result<SessionConfig> {
        let port = match self.port.clone().or_else(|| defaults.port.clone()) {
            Some(port) => port,
            None => pick_port_interactively()?,
        };

        let baud_rate = self.baud.or(defaults.baud_rate).unwrap_or(9600);

        let fields = self
            .fields
            .clone()
            .or_else(|| defaults.fields.clone())
            .context("no fields given: pass --fields or set them via `config set`")?;
        let schema = Schema::from_spec(&fields)
            .with_context(|| format!("invalid field list: {:?}", fields))?;

        let output = self
            .output
            .clone()
            .or_else(|| defaults.output.clone())
            .unwrap_or_else(|| PathBuf::from("serial_data.csv"));

        let format = match self.format {
            Some(arg) => arg.into(),
            None => ExportFormat::from_path(&output).unwrap_or_default(),
        };

        Ok(SessionConfig {
            port,
            baud_rate,
            schema,
            output,
            format,
        })
    }
}

/// 交互式选择端口（没有端口可选时报错并提示显式传参）
fn pick_port_interactively() -> Result<String> {
    let ports = list_ports()?;
    if ports.is_empty() {
        bail!("no serial ports found: pass --port explicitly");
    }

    let selection = inquire::Select::new("选择串口:", ports)
        .prompt()
        .context("port selection cancelled")?;
    Ok(selection.name)
}
