use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::capture::notify::DEFAULT_NOTIFY_BUFFER;
use crate::history::DEFAULT_CAPACITY;
use crate::{ReprobeError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// 环形缓冲区容量
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// "新记录" 通知通道的容量
    pub notify_buffer: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            notify_buffer: DEFAULT_NOTIFY_BUFFER,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    pub user_agent: Option<String>,
}

/// `reprobe.toml` 的内容，所有字段都有默认值
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub history: HistoryConfig,
    pub capture: CaptureConfig,
    pub executor: ExecutorConfig,
}

impl InspectorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.history.capacity == 0 {
            return Err(ReprobeError::ConfigError(
                "history.capacity 必须大于 0".to_string(),
            ));
        }
        if self.capture.notify_buffer == 0 {
            return Err(ReprobeError::ConfigError(
                "capture.notify_buffer 必须大于 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "reprobe.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<InspectorConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            ReprobeError::ConfigError(format!("无法读取 {}: {}", path.display(), e))
        })?;

        let config: InspectorConfig = toml::from_str(&content)?;
        config.validate()?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 显式指定的路径
    /// 2. 当前目录及父目录
    /// 3. 用户配置目录 ~/.config/reprobe/
    /// 4. 默认值
    ///
    /// 找不到文件不是错误；找到了但无法读取或解析则返回错误。
    pub fn load(explicit: Option<&Path>) -> Result<InspectorConfig> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        let found = std::env::current_dir()
            .ok()
            .and_then(|dir| Self::find_upwards(&dir))
            .or_else(Self::user_config_path);

        match found {
            Some(path) => Self::load_from_path(path),
            None => Ok(InspectorConfig::default()),
        }
    }

    /// 从 `start` 开始逐级向上查找配置文件
    pub fn find_upwards(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.is_file() {
                return Some(config_path);
            }

            // 尝试父目录
            if !current.pop() {
                return None;
            }
        }
    }

    fn user_config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("reprobe").join(Self::CONFIG_FILE);
        config_path.is_file().then_some(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_path() {
        let config_content = r#"
[history]
capacity = 10

[executor]
user_agent = "reprobe-test"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(config_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = ConfigLoader::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.history.capacity, 10);
        assert_eq!(config.capture.notify_buffer, DEFAULT_NOTIFY_BUFFER);
        assert_eq!(config.executor.user_agent.as_deref(), Some("reprobe-test"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: InspectorConfig = toml::from_str("").unwrap();
        assert_eq!(config, InspectorConfig::default());
        assert_eq!(config.history.capacity, 50);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[history]\ncapacity = 0\n").unwrap();

        let err = ConfigLoader::load_from_path(temp_file.path()).unwrap_err();
        assert!(matches!(err, ReprobeError::ConfigError(_)));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[history\ncapacity = ").unwrap();

        let err = ConfigLoader::load_from_path(temp_file.path()).unwrap_err();
        assert!(matches!(err, ReprobeError::ConfigError(_)));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::load(Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_find_upwards() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("reprobe.toml"), "[history]\ncapacity = 3\n").unwrap();

        let found = ConfigLoader::find_upwards(&nested).unwrap();
        assert_eq!(found, dir.path().join("reprobe.toml"));
        assert_eq!(ConfigLoader::load(Some(&found)).unwrap().history.capacity, 3);
    }
}
