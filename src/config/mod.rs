//! 连接配置
//!
//! 从TOML文件或代码直接构造，使用前必须通过一次validate。
//! host支持逗号分隔的多地址，交由底层连接池做负载均衡。

use crate::core::error::{AccessError, AccessResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// 日志配置段
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LogConfig {
    pub level: String,
    pub dir: String,
    pub file: String,
    pub max_file_size: u64,
    pub max_files: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
            file: "nebula-access".to_string(),
            max_file_size: 100 * 1024 * 1024, // 100MB
            max_files: 5,
        }
    }
}

/// nebula连接配置
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GraphConfig {
    /// 逗号分隔的graphd地址列表
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    /// 目标graph space，所有语句执行前都会USE到该space
    pub space: String,
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9669,
            user: "root".to_string(),
            password: "nebula".to_string(),
            space: "default_space".to_string(),
            log: LogConfig::default(),
        }
    }
}

impl GraphConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> AccessResult<Self> {
        let content = fs::read_to_string(&path)
            .map_err(|e| AccessError::Config(format!("read config file failed: {}", e)))?;
        let config: GraphConfig = toml::from_str(&content)
            .map_err(|e| AccessError::Config(format!("parse config file failed: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> AccessResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AccessError::Config(format!("serialize config failed: {}", e)))?;
        fs::write(path, content)
            .map_err(|e| AccessError::Config(format!("write config file failed: {}", e)))
    }

    /// 拆分host字段为地址列表
    pub fn hosts(&self) -> Vec<&str> {
        self.host
            .split(',')
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .collect()
    }

    /// 校验连接参数。失败属于启动期致命错误。
    pub fn validate(&self) -> AccessResult<()> {
        if self.hosts().is_empty() {
            return Err(AccessError::Config(
                "param 'host' should not be empty".to_string(),
            ));
        }
        // 逗号间不允许有空地址项
        if self.host.split(',').any(|h| h.trim().is_empty()) {
            return Err(AccessError::Config(format!(
                "param 'host' contains empty address: '{}'",
                self.host
            )));
        }
        if self.port == 0 {
            return Err(AccessError::Config(
                "param 'port' should be positive".to_string(),
            ));
        }
        if self.user.trim().is_empty() {
            return Err(AccessError::Config(
                "param 'user' should not be empty".to_string(),
            ));
        }
        if self.space.trim().is_empty() {
            return Err(AccessError::Config(
                "param 'space' should not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
