use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 单个页面的邮箱提取结果
///
/// - `primary_emails`: 域名部分与页面可注册域名一致
/// - `other_emails`: 其余邮箱，不包含已归入 primary 的地址
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedEmailSet {
    pub primary_emails: BTreeSet<String>,
    pub other_emails: BTreeSet<String>,
}

impl ExtractedEmailSet {
    pub fn is_empty(&self) -> bool {
        self.primary_emails.is_empty() && self.other_emails.is_empty()
    }

    pub fn len(&self) -> usize {
        self.primary_emails.len() + self.other_emails.len()
    }

    /// 把本页面的结果展开成带来源的记录，primary 在前
    pub fn into_sources(self, link: &str, timestamp: DateTime<Utc>) -> Vec<EmailSource> {
        let primary = self
            .primary_emails
            .into_iter()
            .map(|email| EmailSource::new(email, link, timestamp, true));
        let other = self
            .other_emails
            .into_iter()
            .map(|email| EmailSource::new(email, link, timestamp, false));
        primary.chain(other).collect()
    }
}

/// 某个邮箱在某个链接、某个时间被发现
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSource {
    pub email: String,
    pub source_link: String,
    pub timestamp: DateTime<Utc>,
    pub is_primary_domain: bool,
}

impl EmailSource {
    pub fn new(
        email: impl Into<String>,
        source_link: impl Into<String>,
        timestamp: DateTime<Utc>,
        is_primary_domain: bool,
    ) -> Self {
        Self {
            email: email.into(),
            source_link: source_link.into(),
            timestamp,
            is_primary_domain,
        }
    }
}
