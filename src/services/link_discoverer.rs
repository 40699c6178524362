//! 链接发现服务 - 业务能力层
//!
//! 只负责"从 HTML 中找同域子链接"，不打开页面

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::models::DiscoveredLink;
use crate::utils::url::{is_http, normalize_url, registrable_domain};

/// `<a ... href="...">`，支持单双引号
static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\s[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("anchor pattern is valid")
});

/// 按出现顺序提取所有 href 原始值
pub fn extract_hrefs(html: &str) -> Vec<&str> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .collect()
}

/// 找出与 `base_url` 同一可注册域名的 http(s) 链接
///
/// 保留 HTML 中的顺序，不去重；`base_url` 不合法时返回空列表。
pub fn discover_links(base_url: &str, html: &str) -> Vec<DiscoveredLink> {
    let Ok(base) = Url::parse(base_url) else {
        return Vec::new();
    };
    if !is_http(&base) {
        return Vec::new();
    }
    let Some(base_domain) = base.host_str().map(registrable_domain) else {
        return Vec::new();
    };

    extract_hrefs(html)
        .into_iter()
        .filter_map(|href| normalize_url(&base, href))
        .filter(|url| {
            url.host_str().map(registrable_domain).as_deref() == Some(base_domain.as_str())
        })
        .map(|url| DiscoveredLink::new(url.to_string()))
        .collect()
}
