//! 结果汇总服务
//!
//! 把一个域名下所有链接的邮箱记录合并为去重后的 `DomainResult`

use std::collections::HashSet;

use crate::models::{CrawlStatus, DomainResult, EmailSource};

pub struct ResultAggregator;

impl ResultAggregator {
    /// 按邮箱去重，保留输入顺序中第一次出现的记录
    ///
    /// 调用方决定输入顺序：先种子页面，再按发现顺序排列的子链接。
    pub fn aggregate(domain: impl Into<String>, sources: Vec<EmailSource>) -> DomainResult {
        let mut seen = HashSet::with_capacity(sources.len());
        let emails = sources
            .into_iter()
            .filter(|source| seen.insert(source.email.clone()))
            .collect();

        DomainResult {
            domain: domain.into(),
            emails,
            error: None,
            status: CrawlStatus::Complete,
        }
    }
}
