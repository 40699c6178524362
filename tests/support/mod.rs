//! 测试用的内存浏览器引擎

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use contact_discovery::error::BrowserError;
use contact_discovery::{BrowserEngine, BrowserSession, Config};

/// 假页面的行为
#[derive(Debug, Clone)]
pub enum FakePage {
    Html(String),
    /// 导航直接失败
    Fail,
    /// 延迟后返回 HTML；超过导航超时则超时
    Delayed(Duration, String),
}

#[derive(Debug, Default)]
pub struct Counters {
    pub launched: AtomicUsize,
    pub live: AtomicUsize,
    pub max_live: AtomicUsize,
    pub closed: AtomicUsize,
}

impl Counters {
    pub fn launched(&self) -> usize {
        self.launched.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }

    pub fn max_live(&self) -> usize {
        self.max_live.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }
}

/// 内存浏览器引擎，按 URL 返回预设的页面
#[derive(Default)]
pub struct FakeEngine {
    pages: HashMap<String, FakePage>,
    pub counters: Arc<Counters>,
    fail_launch: bool,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(normalize(url), page);
        self
    }

    pub fn html(self, url: &str, html: impl Into<String>) -> Self {
        self.page(url, FakePage::Html(html.into()))
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }
}

fn normalize(url: &str) -> String {
    url::Url::parse(url)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| url.to_string())
}

#[async_trait]
impl BrowserEngine for FakeEngine {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>, BrowserError> {
        if self.fail_launch {
            return Err(BrowserError::Launch("no browser available".to_string()));
        }
        self.counters.launched.fetch_add(1, Ordering::SeqCst);
        let live = self.counters.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.counters.max_live.fetch_max(live, Ordering::SeqCst);

        Ok(Arc::new(FakeSession {
            pages: self.pages.clone(),
            counters: self.counters.clone(),
            current: Mutex::new(None),
            closed: AtomicBool::new(false),
        }))
    }
}

pub struct FakeSession {
    pages: HashMap<String, FakePage>,
    counters: Arc<Counters>,
    current: Mutex<Option<String>>,
    closed: AtomicBool,
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn navigate(&self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrowserError::Closed);
        }
        let html = match self.pages.get(&normalize(url)) {
            Some(FakePage::Html(html)) => html.clone(),
            Some(FakePage::Delayed(delay, html)) => {
                if *delay > timeout {
                    tokio::time::sleep(timeout).await;
                    return Err(BrowserError::NavigationTimeout {
                        url: url.to_string(),
                        timeout,
                    });
                }
                tokio::time::sleep(*delay).await;
                html.clone()
            }
            Some(FakePage::Fail) | None => {
                return Err(BrowserError::Navigation {
                    url: url.to_string(),
                    message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
                })
            }
        };
        *self.current.lock().unwrap() = Some(html);
        Ok(())
    }

    async fn content(&self) -> Result<String, BrowserError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BrowserError::Closed);
        }
        let current = self.current.lock().unwrap().clone();
        current.ok_or_else(|| BrowserError::Content("nothing loaded".to_string()))
    }

    async fn close(&self) -> Result<(), BrowserError> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.counters.live.fetch_sub(1, Ordering::SeqCst);
            self.counters.closed.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}

/// 测试用配置：不写文件、超时较短
pub fn test_config() -> Config {
    Config {
        browser_pool_size: 4,
        max_concurrent_domains: 2,
        max_concurrent_sublinks: 4,
        navigation_timeout_secs: 2,
        dom_ready_timeout_secs: 1,
        pool_acquire_timeout_secs: 5,
        save_results: false,
        ..Config::default()
    }
}
