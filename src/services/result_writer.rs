//! 结果写入服务
//!
//! 只负责把最终结果写成 JSON 文件，不关心流程

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::models::{DomainResult, EmailSource};

/// 结果写入服务
pub struct ResultWriter {
    output_dir: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DomainRecord<'a> {
    domain: &'a str,
    primary_emails: Vec<EmailRecord<'a>>,
    other_emails: Vec<EmailRecord<'a>>,
    error: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct EmailRecord<'a> {
    email: &'a str,
    source: &'a str,
    timestamp: &'a DateTime<Utc>,
}

impl<'a> From<&'a EmailSource> for EmailRecord<'a> {
    fn from(source: &'a EmailSource) -> Self {
        Self {
            email: &source.email,
            source: &source.source_link,
            timestamp: &source.timestamp,
        }
    }
}

impl ResultWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 写入 `contact-discovery-<时间戳>.json`
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub async fn write(&self, results: &[DomainResult]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("无法创建输出目录: {}", self.output_dir.display()))?;

        let timestamp = Utc::now()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
            .replace([':', '.'], "-");
        let path = self
            .output_dir
            .join(format!("contact-discovery-{}.json", timestamp));

        let json = serde_json::to_string_pretty(&to_records(results))?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("无法写入结果文件: {}", path.display()))?;
        debug!("结果已写入: {}", path.display());

        Ok(path)
    }
}

fn to_records(results: &[DomainResult]) -> Vec<DomainRecord<'_>> {
    results
        .iter()
        .map(|result| DomainRecord {
            domain: &result.domain,
            primary_emails: result.primary_emails().map(EmailRecord::from).collect(),
            other_emails: result.other_emails().map(EmailRecord::from).collect(),
            error: result.error.as_deref(),
        })
        .collect()
}
