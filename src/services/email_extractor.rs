//! 邮箱提取服务 - 业务能力层
//!
//! 负责"打开一个链接并找出其中的邮箱"，只处理单个链接

use std::sync::{Arc, LazyLock};

use regex::Regex;
use tracing::{debug, warn};

use crate::browser::BrowserSessionPool;
use crate::error::{ExtractionError, FetchError};
use crate::infrastructure::PageFetcher;
use crate::models::ExtractedEmailSet;
use crate::utils::url::{is_primary_email_domain, registrable_domain, registrable_domain_of_url};

/// 宽松的邮箱匹配：本地部分 `[a-z0-9._%+-]`，顶级域名至少两个字母
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("email pattern is valid")
});

/// 图片、样式等资源文件名会被误认为邮箱（如 `logo@2x.png`）
const ASSET_SUFFIXES: [&str; 9] = ["png", "jpg", "jpeg", "gif", "svg", "webp", "css", "js", "ico"];

/// 从 HTML 中提取邮箱并按页面域名分类
///
/// 所有邮箱统一转为小写；域名部分等于 `page_domain` 的可注册域名（或其最后两段）的归入 primary，
/// 子域名邮箱归入 other。
pub fn extract_emails(page_domain: &str, html: &str) -> ExtractedEmailSet {
    let page_domain = registrable_domain(page_domain);
    let mut set = ExtractedEmailSet::default();

    for found in EMAIL_PATTERN.find_iter(html) {
        let email = found.as_str().to_ascii_lowercase();
        let Some((_, domain)) = email.rsplit_once('@') else {
            continue;
        };
        let domain = domain.trim_matches('.');
        if is_asset_name(domain) {
            continue;
        }

        if is_primary_email_domain(domain, &page_domain) {
            set.primary_emails.insert(email);
        } else {
            set.other_emails.insert(email);
        }
    }

    set
}

fn is_asset_name(domain: &str) -> bool {
    domain
        .rsplit('.')
        .next()
        .is_some_and(|suffix| ASSET_SUFFIXES.contains(&suffix))
}

/// 邮箱提取服务
///
/// 职责：
/// - 为每个链接借一个新的浏览器会话
/// - 抓取页面并分类邮箱
/// - 无论成功失败都归还会话
#[derive(Clone)]
pub struct EmailExtractor {
    pool: Arc<BrowserSessionPool>,
    fetcher: PageFetcher,
}

impl EmailExtractor {
    pub fn new(pool: Arc<BrowserSessionPool>, fetcher: PageFetcher) -> Self {
        Self { pool, fetcher }
    }

    /// 提取单个链接中的邮箱
    ///
    /// # 参数
    /// - `url`: 要打开的绝对地址
    ///
    /// # 返回
    /// 返回分类后的邮箱集合；抓取失败时返回 `ExtractionError`
    pub async fn extract(&self, url: &str) -> Result<ExtractedEmailSet, ExtractionError> {
        let page_domain = registrable_domain_of_url(url).unwrap_or_default();

        let lease = self.pool.acquire().await.map_err(|source| {
            warn!("无法获取浏览器会话 {}: {}", url, source);
            ExtractionError::new(FetchError::Session {
                url: url.to_string(),
                source,
            })
        })?;

        let fetched = self.fetcher.fetch(lease.session(), url).await;
        self.pool.release(lease).await;

        let html = fetched.map_err(ExtractionError::new)?;
        let emails = extract_emails(&page_domain, &html);
        debug!(
            "{}: primary {} 个, other {} 个",
            url,
            emails.primary_emails.len(),
            emails.other_emails.len()
        );

        Ok(emails)
    }
}
