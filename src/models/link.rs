use serde::{Deserialize, Serialize};

/// 从种子页面中发现的同域子链接
///
/// 发现阶段不去重，重复的链接在邮箱层面合并。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredLink {
    pub url: String,
}

impl DiscoveredLink {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}
