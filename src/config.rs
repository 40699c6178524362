use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 同时存活的浏览器数量上限
    pub browser_pool_size: usize,
    /// 同时处理的域名数量
    pub max_concurrent_domains: usize,
    /// 每个域名同时提取的子链接数量
    pub max_concurrent_sublinks: usize,
    /// 页面导航超时（秒）
    pub navigation_timeout_secs: u64,
    /// 等待 body 出现的超时（秒）
    pub dom_ready_timeout_secs: u64,
    /// 等待空闲浏览器的超时（秒）
    pub pool_acquire_timeout_secs: u64,
    /// 是否使用无头模式
    pub headless: bool,
    /// 浏览器可执行文件路径，为空时自动查找
    pub chrome_executable: Option<String>,
    /// 结果 JSON 输出目录
    pub output_dir: String,
    /// 是否保存结果文件
    pub save_results: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_pool_size: 20,
            max_concurrent_domains: 1,
            max_concurrent_sublinks: 20,
            navigation_timeout_secs: 30,
            dom_ready_timeout_secs: 5,
            pool_acquire_timeout_secs: 10,
            headless: true,
            chrome_executable: None,
            output_dir: "results".to_string(),
            save_results: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 默认值 → 可选的 TOML 文件 → 环境变量，最后校验
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 只从环境变量读取，未设置的字段使用默认值
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env_overrides()
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn with_env_overrides(self) -> Result<Self, ConfigError> {
        Ok(Self {
            browser_pool_size: env_or("BROWSER_POOL_SIZE", self.browser_pool_size)?,
            max_concurrent_domains: env_or("MAX_CONCURRENT_DOMAINS", self.max_concurrent_domains)?,
            max_concurrent_sublinks: env_or(
                "MAX_CONCURRENT_SUBLINKS",
                self.max_concurrent_sublinks,
            )?,
            navigation_timeout_secs: env_or(
                "NAVIGATION_TIMEOUT_SECS",
                self.navigation_timeout_secs,
            )?,
            dom_ready_timeout_secs: env_or("DOM_READY_TIMEOUT_SECS", self.dom_ready_timeout_secs)?,
            pool_acquire_timeout_secs: env_or(
                "POOL_ACQUIRE_TIMEOUT_SECS",
                self.pool_acquire_timeout_secs,
            )?,
            headless: env_or("HEADLESS", self.headless)?,
            chrome_executable: std::env::var("CHROME_EXECUTABLE")
                .ok()
                .or(self.chrome_executable),
            output_dir: std::env::var("OUTPUT_DIR").unwrap_or(self.output_dir),
            save_results: env_or("SAVE_RESULTS", self.save_results)?,
            verbose_logging: env_or("VERBOSE_LOGGING", self.verbose_logging)?,
        })
    }

    /// 所有并发上限都必须大于 0；导航和等待浏览器的超时至少 1 秒
    ///
    /// `dom_ready_timeout_secs` 可以为 0，表示不等待 body。
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounds = [
            ("browser_pool_size", self.browser_pool_size),
            ("max_concurrent_domains", self.max_concurrent_domains),
            ("max_concurrent_sublinks", self.max_concurrent_sublinks),
        ];
        for (field, value) in bounds {
            if value == 0 {
                return Err(ConfigError::ZeroBound { field });
            }
        }

        let timeouts = [
            ("navigation_timeout_secs", self.navigation_timeout_secs),
            ("pool_acquire_timeout_secs", self.pool_acquire_timeout_secs),
        ];
        for (field, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::ZeroTimeout { field });
            }
        }
        Ok(())
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn dom_ready_timeout(&self) -> Duration {
        Duration::from_secs(self.dom_ready_timeout_secs)
    }

    pub fn pool_acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.pool_acquire_timeout_secs)
    }
}

fn env_or<T: FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: std::any::type_name::<T>(),
            }),
        Err(_) => Ok(default),
    }
}
