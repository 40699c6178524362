use std::fmt::Display;

use url::Url;

use crate::error::ValidationError;
use crate::utils::url::registrable_domain;

/// 经过校验的种子 URL（绝对地址，http 或 https）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTarget {
    url: Url,
}

impl SeedTarget {
    /// 解析单个种子 URL，失败时返回 None
    pub fn parse(input: &str) -> Option<Self> {
        let url = Url::parse(input.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.host_str().filter(|host| !host.is_empty())?;
        Some(Self { url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// 种子的主机名，用作结果中的 domain
    pub fn domain(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn registrable_domain(&self) -> String {
        registrable_domain(self.domain())
    }
}

impl Display for SeedTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// 在开始抓取之前校验全部输入
///
/// 只要有一个不合法就整体失败，错误中列出所有不合法的输入。
pub fn validate_seeds<S: AsRef<str>>(inputs: &[S]) -> Result<Vec<SeedTarget>, ValidationError> {
    let mut seeds = Vec::with_capacity(inputs.len());
    let mut invalid = Vec::new();

    for input in inputs {
        match SeedTarget::parse(input.as_ref()) {
            Some(seed) => seeds.push(seed),
            None => invalid.push(input.as_ref().to_string()),
        }
    }

    if invalid.is_empty() {
        Ok(seeds)
    } else {
        Err(ValidationError { invalid })
    }
}
