//! CLI 子命令

mod config;
mod ports;
mod record;

pub use config::ConfigCommand;
pub use ports::PortsCommand;
pub use record::RecordCommand;
