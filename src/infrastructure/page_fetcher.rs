//! 页面抓取器 - 基础设施层
//!
//! 只暴露"打开页面并读取 HTML"的能力，不认识邮箱和链接

use std::time::Duration;

use tracing::debug;

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::{BrowserError, FetchError};

/// 页面抓取器
///
/// 职责：
/// - 导航到 URL（带超时）
/// - 尽力等待 body 出现
/// - 读取渲染后的 HTML
/// - 不重试，失败直接返回给调用方
#[derive(Debug, Clone, Copy)]
pub struct PageFetcher {
    navigation_timeout: Duration,
    dom_ready_timeout: Duration,
}

impl PageFetcher {
    pub fn new(navigation_timeout: Duration, dom_ready_timeout: Duration) -> Self {
        Self {
            navigation_timeout,
            dom_ready_timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.navigation_timeout(), config.dom_ready_timeout())
    }

    /// 抓取 `url` 渲染后的 HTML
    ///
    /// # 参数
    /// - `session`: 已借出的浏览器会话
    /// - `url`: 目标地址
    ///
    /// # 返回
    /// 返回完整的 HTML 字符串
    pub async fn fetch(&self, session: &dyn BrowserSession, url: &str) -> Result<String, FetchError> {
        debug!("打开页面: {}", url);

        session
            .navigate(url, self.navigation_timeout)
            .await
            .map_err(|e| match e {
                BrowserError::NavigationTimeout { .. } => FetchError::Timeout {
                    url: url.to_string(),
                },
                other => FetchError::Navigation {
                    url: url.to_string(),
                    source: other,
                },
            })?;

        // body 没出现不算错误
        match tokio::time::timeout(self.dom_ready_timeout, session.wait_for_dom_ready()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => debug!("等待 body 失败 {}: {}", url, e),
            Err(_) => debug!("等待 body 超时 {} ({:?})", url, self.dom_ready_timeout),
        }

        let html = session
            .content()
            .await
            .map_err(|source| FetchError::Content {
                url: url.to_string(),
                source,
            })?;
        debug!("读取页面完成: {} ({} 字节)", url, html.len());

        Ok(html)
    }
}
