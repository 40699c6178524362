use std::time::Duration;

use thiserror::Error;

/// 顶层错误类型
///
/// 只有输入校验和配置错误会中止整个运行；池、抓取、提取错误都被限制在单个域名或单个链接内部，
/// 以 `DomainResult::error` 的形式返回。
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// 种子 URL 校验失败
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// 配置错误
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 种子 URL 校验失败，列出所有不合法的输入
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid URLs detected: {}", .invalid.join(", "))]
pub struct ValidationError {
    pub invalid: Vec<String>,
}

/// 浏览器引擎错误
#[derive(Debug, Clone, Error)]
pub enum BrowserError {
    /// 启动浏览器失败
    #[error("failed to launch browser: {0}")]
    Launch(String),
    /// 导航超时
    #[error("navigation to {url} timed out after {timeout:?}")]
    NavigationTimeout { url: String, timeout: Duration },
    /// 导航失败
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },
    /// 读取页面内容失败
    #[error("failed to read page content: {0}")]
    Content(String),
    /// 会话已关闭
    #[error("browser session is closed")]
    Closed,
    /// 关闭浏览器失败
    #[error("failed to close browser: {0}")]
    Close(String),
}

/// 浏览器池错误
#[derive(Debug, Clone, Error)]
pub enum PoolError {
    /// 等待空闲浏览器超时
    #[error("Timeout waiting for available browser ({waited:?})")]
    Timeout { waited: Duration },
    /// 浏览器池已关闭
    #[error("browser pool is shut down")]
    Closed,
    /// 引擎无法启动新浏览器
    #[error(transparent)]
    Launch(BrowserError),
}

/// 单个 URL 的抓取错误
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// 没有拿到浏览器会话
    #[error("no browser session for {url}: {source}")]
    Session {
        url: String,
        #[source]
        source: PoolError,
    },
    /// 导航超时
    #[error("Timeout accessing {url}")]
    Timeout { url: String },
    /// 导航或网络错误
    #[error("failed to load {url}: {source}")]
    Navigation {
        url: String,
        #[source]
        source: BrowserError,
    },
    /// 读取渲染后 HTML 失败
    #[error("failed to read {url}: {source}")]
    Content {
        url: String,
        #[source]
        source: BrowserError,
    },
}

impl FetchError {
    pub fn url(&self) -> &str {
        match self {
            FetchError::Session { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Navigation { url, .. }
            | FetchError::Content { url, .. } => url,
        }
    }
}

/// 提取某个链接邮箱时遇到的抓取错误
#[derive(Debug, Clone, Error)]
#[error("email extraction failed for {url}: {source}")]
pub struct ExtractionError {
    pub url: String,
    #[source]
    pub source: FetchError,
}

impl ExtractionError {
    pub fn new(source: FetchError) -> Self {
        Self {
            url: source.url().to_string(),
            source,
        }
    }
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 读取配置文件失败
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("environment variable {var_name}: value '{value}' is not a valid {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: &'static str,
    },
    /// 并发数或容量不能为 0
    #[error("{field} must be greater than 0")]
    ZeroBound { field: &'static str },
    /// 超时不能为 0 秒
    #[error("{field} must be at least 1 second")]
    ZeroTimeout { field: &'static str },
}
