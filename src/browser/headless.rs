use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use super::engine::{BrowserEngine, BrowserSession};
use crate::config::Config;
use crate::error::BrowserError;

/// 每个浏览器实例使用独立的用户目录，避免并发启动时争用同一个 profile
static NEXT_PROFILE_ID: AtomicU64 = AtomicU64::new(0);

/// 基于 chromiumoxide 的无头浏览器引擎
#[derive(Debug, Clone)]
pub struct ChromiumEngine {
    headless: bool,
    chrome_executable: Option<PathBuf>,
}

impl ChromiumEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.as_ref().map(PathBuf::from),
        }
    }

    fn browser_config(&self, user_data_dir: &Path) -> Result<BrowserConfig, BrowserError> {
        let builder = BrowserConfig::builder();
        let builder = if self.headless {
            builder.new_headless_mode()
        } else {
            builder.with_head()
        };
        let mut builder = builder.user_data_dir(user_data_dir).args(vec![
            "--no-sandbox",
            "--disable-setuid-sandbox",
            "--disable-dev-shm-usage",
            "--disable-gpu",
        ]);
        if let Some(executable) = &self.chrome_executable {
            builder = builder.chrome_executable(executable);
        }

        builder.build().map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            BrowserError::Launch(e)
        })
    }
}

#[async_trait]
impl BrowserEngine for ChromiumEngine {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        let profile_id = NEXT_PROFILE_ID.fetch_add(1, Ordering::Relaxed);
        let user_data_dir = std::env::temp_dir().join(format!(
            "contact-discovery-{}-{}",
            std::process::id(),
            profile_id
        ));
        let config = self.browser_config(&user_data_dir)?;

        debug!("🚀 启动浏览器 #{}", profile_id);
        let (mut browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            BrowserError::Launch(e.to_string())
        })?;

        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("浏览器事件错误: {}", e);
                }
            }
        });

        // 添加短暂延迟以等待浏览器状态同步
        sleep(Duration::from_millis(300)).await;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                error!("创建页面失败: {}", e);
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                let _ = tokio::fs::remove_dir_all(&user_data_dir).await;
                return Err(BrowserError::Launch(e.to_string()));
            }
        };

        Ok(Arc::new(ChromiumSession {
            id: profile_id,
            browser: Mutex::new(Some(browser)),
            page,
            handler_task,
            user_data_dir,
        }))
    }
}

/// 单个 Chromium 进程及其唯一的页面
pub struct ChromiumSession {
    id: u64,
    browser: Mutex<Option<Browser>>,
    page: Page,
    handler_task: JoinHandle<()>,
    user_data_dir: PathBuf,
}

impl ChromiumSession {
    async fn ensure_open(&self) -> Result<(), BrowserError> {
        if self.browser.lock().await.is_none() {
            return Err(BrowserError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        self.ensure_open().await?;
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Err(_) => Err(BrowserError::NavigationTimeout {
                url: url.to_string(),
                timeout,
            }),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Ok(Ok(_)) => Ok(()),
        }
    }

    async fn wait_for_dom_ready(&self) -> Result<(), BrowserError> {
        self.page
            .find_element("body")
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Content(e.to_string()))
    }

    async fn content(&self) -> Result<String, BrowserError> {
        self.ensure_open().await?;
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Content(e.to_string()))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        let Some(mut browser) = self.browser.lock().await.take() else {
            return Ok(());
        };

        if let Err(e) = self.page.clone().close().await {
            debug!("浏览器 #{} 关闭页面失败: {}", self.id, e);
        }
        let result = browser.close().await;
        if let Err(e) = browser.wait().await {
            warn!("浏览器 #{} 进程回收失败: {}", self.id, e);
        }
        self.handler_task.abort();
        if let Err(e) = tokio::fs::remove_dir_all(&self.user_data_dir).await {
            debug!("清理用户目录失败 {}: {}", self.user_data_dir.display(), e);
        }
        debug!("浏览器 #{} 已关闭", self.id);

        result
            .map(|_| ())
            .map_err(|e| BrowserError::Close(e.to_string()))
    }
}
