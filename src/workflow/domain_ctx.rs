//! 域名处理上下文
//!
//! 封装"我正在处理第几个种子、它是哪个域名"这一信息

use std::fmt::Display;

use crate::models::SeedTarget;

/// 域名处理上下文
#[derive(Debug, Clone)]
pub struct DomainCtx {
    /// 种子在输入中的索引（从 0 开始，用于进度事件）
    pub domain_index: usize,

    /// 种子目标
    pub seed: SeedTarget,
}

impl DomainCtx {
    pub fn new(domain_index: usize, seed: SeedTarget) -> Self {
        Self { domain_index, seed }
    }

    pub fn domain(&self) -> &str {
        self.seed.domain()
    }

    pub fn seed_url(&self) -> &str {
        self.seed.as_str()
    }
}

impl Display for DomainCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[域名 {} {}]", self.domain_index + 1, self.domain())
    }
}
