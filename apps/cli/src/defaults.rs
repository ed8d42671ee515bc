//! CLI 默认配置文件
//!
//! TOML 文件保存在用户配置目录（如 `~/.config/serdaq/config.toml`），
//! `record` 命令在参数缺省时回退到这里的值。

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 持久化的默认参数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliDefaults {
    /// 默认串口
    pub port: Option<String>,
    /// 默认波特率
    pub baud_rate: Option<u32>,
    /// 默认字段名（逗号分隔，与 --fields 一致）
    pub fields: Option<String>,
    /// 默认输出路径
    pub output: Option<PathBuf>,
}

impl CliDefaults {
    /// 配置文件路径
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("serdaq").join("config.toml"))
    }

    /// 读取配置文件（不存在时返回空默认值）
    pub fn load() -> Result<Self> {
        let Some(path) = Self::path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    /// 写回配置文件
    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("no user config directory available")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize defaults")?;
        std::fs::write(&path, content)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// `config show` 的输出
    pub fn render(&self) -> String {
        let mut out = String::new();
        let display = |value: &Option<String>| {
            value.clone().unwrap_or_else(|| "（未设置）".to_string())
        };
        out.push_str(&format!("port   = {}\n", display(&self.port)));
        out.push_str(&format!(
            "baud   = {}\n",
            self.baud_rate.map(|b| b.to_string()).unwrap_or_else(|| "（未设置）".to_string())
        ));
        out.push_str(&format!("fields = {}\n", display(&self.fields)));
        out.push_str(&format!(
            "output = {}\n",
            self.output
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "（未设置）".to_string())
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toml_roundtrip() {
        let defaults = CliDefaults {
            port: Some("/dev/ttyUSB0".into()),
            baud_rate: Some(115_200),
            fields: Some("Temperature,Humidity".into()),
            output: Some(PathBuf::from("data.csv")),
        };

        let toml = toml::to_string_pretty(&defaults).unwrap();
        let parsed: CliDefaults = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.port, defaults.port);
        assert_eq!(parsed.baud_rate, defaults.baud_rate);
        assert_eq!(parsed.fields, defaults.fields);
        assert_eq!(parsed.output, defaults.output);
    }

    #[test]
    fn test_partial_file_parses() {
        // 旧版本的配置文件可能缺字段
        let parsed: CliDefaults = toml::from_str("port = \"/dev/ttyUSB0\"\n").unwrap();
        assert_eq!(parsed.port.as_deref(), Some("/dev/ttyUSB0"));
        assert!(parsed.baud_rate.is_none());
    }

    #[test]
    fn test_render_marks_unset_values() {
        let rendered = CliDefaults::default().render();
        assert!(rendered.contains("port"));
        assert!(rendered.contains("（未设置）"));
    }
}
