use serde::{Deserialize, Serialize};

use super::email::EmailSource;

/// 单个域名的处理结论（仅用于报告，不影响代码路径）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CrawlStatus {
    /// 没有子链接失败
    Complete,
    /// 部分子链接失败
    Partial { failed: usize },
    /// 所有子链接都失败且没有找到任何邮箱
    AllFailed,
    /// 种子页面抓取失败
    SeedFailed,
}

impl CrawlStatus {
    /// 根据子链接统计给出结论
    ///
    /// 0 个子链接视为 Complete。
    pub fn classify(sublinks_total: usize, sublinks_failed: usize, emails_found: usize) -> Self {
        if sublinks_failed == 0 {
            CrawlStatus::Complete
        } else if sublinks_failed == sublinks_total && emails_found == 0 {
            CrawlStatus::AllFailed
        } else {
            CrawlStatus::Partial {
                failed: sublinks_failed,
            }
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, CrawlStatus::AllFailed | CrawlStatus::SeedFailed)
    }
}

/// 单个种子目标的最终结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainResult {
    pub domain: String,
    #[serde(rename = "emailsWithSources")]
    pub emails: Vec<EmailSource>,
    pub error: Option<String>,
    pub status: CrawlStatus,
}

impl DomainResult {
    /// 种子页面失败时的结果：没有邮箱，带错误信息
    pub fn failed(domain: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            emails: Vec::new(),
            error: Some(error.into()),
            status: CrawlStatus::SeedFailed,
        }
    }

    /// 记录子链接失败数，同时更新 status 和 error
    pub fn record_sublink_failures(mut self, sublinks_total: usize, sublinks_failed: usize) -> Self {
        self.status = CrawlStatus::classify(sublinks_total, sublinks_failed, self.emails.len());
        self.error = (sublinks_failed > 0).then(|| format!("{} sub-links failed", sublinks_failed));
        self
    }

    pub fn primary_emails(&self) -> impl Iterator<Item = &EmailSource> {
        self.emails.iter().filter(|e| e.is_primary_domain)
    }

    pub fn other_emails(&self) -> impl Iterator<Item = &EmailSource> {
        self.emails.iter().filter(|e| !e.is_primary_domain)
    }

    /// 去重后的来源链接，按首次出现排序
    pub fn source_links(&self) -> Vec<&str> {
        let mut links: Vec<&str> = Vec::new();
        for source in &self.emails {
            if !links.contains(&source.source_link.as_str()) {
                links.push(&source.source_link);
            }
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(CrawlStatus::classify(0, 0, 0), CrawlStatus::Complete);
        assert_eq!(CrawlStatus::classify(5, 0, 0), CrawlStatus::Complete);
        assert_eq!(CrawlStatus::classify(4, 4, 0), CrawlStatus::AllFailed);
        // 全部失败但种子页面有邮箱
        assert_eq!(
            CrawlStatus::classify(4, 4, 2),
            CrawlStatus::Partial { failed: 4 }
        );
        assert_eq!(
            CrawlStatus::classify(10, 3, 0),
            CrawlStatus::Partial { failed: 3 }
        );
    }

    #[test]
    fn test_record_sublink_failures_sets_error() {
        let result = DomainResult {
            domain: "example.com".to_string(),
            emails: Vec::new(),
            error: None,
            status: CrawlStatus::Complete,
        };

        let ok = result.clone().record_sublink_failures(3, 0);
        assert_eq!(ok.error, None);

        let partial = result.record_sublink_failures(10, 3);
        assert_eq!(partial.error.as_deref(), Some("3 sub-links failed"));
        assert!(!partial.status.is_failure());
    }
}
