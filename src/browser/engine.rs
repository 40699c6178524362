//! 浏览器引擎抽象
//!
//! 核心流程只依赖这里的四个能力：启动、导航、读取 HTML、关闭。
//! 生产环境使用 chromiumoxide（见 `headless`），测试中替换为内存实现。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::BrowserError;

/// 能启动浏览器会话的引擎
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    /// 启动一个全新的浏览器实例
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, BrowserError>;
}

/// 单个浏览器实例
///
/// 会话由浏览器池独占管理，同一时刻只会被一次抓取使用。
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// 导航到 `url`，超过 `timeout` 返回 `BrowserError::NavigationTimeout`
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError>;

    /// 等待最基本的 DOM 就绪信号，尽力而为
    async fn wait_for_dom_ready(&self) -> Result<(), BrowserError> {
        Ok(())
    }

    /// 渲染后的完整 HTML
    async fn content(&self) -> Result<String, BrowserError>;

    /// 关闭浏览器，重复调用无副作用
    async fn close(&self) -> Result<(), BrowserError>;
}
