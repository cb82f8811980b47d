//! 控制器配置

use std::path::Path;

use serde::Deserialize;

/// 配置错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(&'static str),
}

/// 播放控制器配置
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// 音频流地址
    pub url: String,
    /// 通知通道容量
    pub notification_capacity: usize,
    /// 模拟后端的进度通知间隔（秒）
    pub time_update_interval: f64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            url: "https://d3ctxlq1ktw2nl.cloudfront.net/production/2020-3-21/66323909-44100-2-dcd47921d951c.mp3"
                .to_string(),
            notification_capacity: 64,
            time_update_interval: 0.25,
        }
    }
}

impl PlayerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Invalid("url must not be empty"));
        }
        if self.notification_capacity == 0 {
            return Err(ConfigError::Invalid("notification_capacity must be > 0"));
        }
        if !(self.time_update_interval.is_finite() && self.time_update_interval > 0.0) {
            return Err(ConfigError::Invalid("time_update_interval must be > 0"));
        }
        Ok(())
    }
}
