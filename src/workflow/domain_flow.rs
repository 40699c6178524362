//! 域名处理流程 - 流程层
//!
//! 核心职责：定义"一个种子 URL"的完整处理流程
//!
//! 流程顺序：
//! 1. 抓取种子页面（失败则整个域名失败）
//! 2. 从种子页面 HTML 中分类邮箱、发现同域子链接
//! 3. 并发提取所有子链接的邮箱，单个失败只计数
//! 4. 等待全部结束后汇总去重

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::browser::BrowserSessionPool;
use crate::config::Config;
use crate::error::{ExtractionError, FetchError, PoolError};
use crate::infrastructure::PageFetcher;
use crate::models::{DiscoveredLink, DomainResult, EmailSource, ExtractedEmailSet};
use crate::services::{discover_links, extract_emails, EmailExtractor, ResultAggregator};
use crate::workflow::domain_ctx::DomainCtx;
use crate::workflow::progress::{DomainStage, ProgressEvent, ProgressSink};

/// 单个子链接任务的产出：邮箱集合和完成时间
type SublinkOutcome = Result<(ExtractedEmailSet, chrono::DateTime<Utc>), ExtractionError>;

/// 域名处理流程
///
/// - 不持有任何浏览器会话，只在需要时向池借用
/// - 子链接并发数独立于浏览器池容量
pub struct DomainFlow {
    pool: Arc<BrowserSessionPool>,
    fetcher: PageFetcher,
    extractor: EmailExtractor,
    max_concurrent_sublinks: usize,
}

/// 子链接阶段的统计
#[derive(Debug, Default)]
struct SublinkStats {
    sources: Vec<EmailSource>,
    total: usize,
    failed: usize,
}

impl DomainFlow {
    pub fn new(pool: Arc<BrowserSessionPool>, config: &Config) -> Self {
        let fetcher = PageFetcher::from_config(config);
        Self {
            extractor: EmailExtractor::new(pool.clone(), fetcher),
            pool,
            fetcher,
            max_concurrent_sublinks: config.max_concurrent_sublinks,
        }
    }

    /// 处理一个种子目标，总是返回结果，不会向上抛错
    pub async fn run(&self, ctx: &DomainCtx, progress: &ProgressSink) -> DomainResult {
        let index = ctx.domain_index;
        info!("{} 🔍 开始分析 {}", ctx, ctx.seed_url());

        // ========== 1. 抓取种子页面 ==========
        progress.stage(index, DomainStage::FetchingSeed);
        let html = match self.fetch_seed(ctx).await {
            Ok(html) => html,
            Err(e) => {
                error!("{} ❌ 种子页面抓取失败: {}", ctx, e);
                progress.send(ProgressEvent::Error {
                    domain_index: index,
                    message: e.to_string(),
                });
                progress.stage(index, DomainStage::Failed);
                return DomainResult::failed(ctx.domain(), e.to_string());
            }
        };

        // ========== 2. 种子页面邮箱 + 子链接发现 ==========
        progress.stage(index, DomainStage::DiscoveringLinks);
        let seed_emails = extract_emails(ctx.domain(), &html);
        let links = discover_links(ctx.seed_url(), &html);
        info!(
            "{} ✓ 种子页面找到 {} 个邮箱, {} 个子链接",
            ctx,
            seed_emails.len(),
            links.len()
        );
        progress.send(ProgressEvent::SubLinksTotal {
            domain_index: index,
            total: links.len(),
        });

        // ========== 3. 并发提取子链接 ==========
        progress.stage(index, DomainStage::ExtractingSublinks);
        let mut sources = seed_emails.into_sources(ctx.seed_url(), Utc::now());
        let stats = self.extract_sublinks(ctx, links, progress).await;
        sources.extend(stats.sources);

        // ========== 4. 汇总 ==========
        progress.stage(index, DomainStage::Aggregating);
        let result = ResultAggregator::aggregate(ctx.domain(), sources)
            .record_sublink_failures(stats.total, stats.failed);

        progress.send(ProgressEvent::EmailsFound {
            domain_index: index,
            count: result.emails.len(),
        });
        log_domain_complete(ctx, &result, stats.total, stats.failed);
        if result.status.is_failure() {
            progress.stage(index, DomainStage::Failed);
        } else {
            progress.stage(index, DomainStage::Completed);
        }

        result
    }

    /// 借会话抓取种子页面，抓取结束立即归还
    async fn fetch_seed(&self, ctx: &DomainCtx) -> Result<String, FetchError> {
        let lease = self
            .pool
            .acquire()
            .await
            .map_err(|source| FetchError::Session {
                url: ctx.seed_url().to_string(),
                source,
            })?;

        let fetched = self.fetcher.fetch(lease.session(), ctx.seed_url()).await;
        self.pool.release(lease).await;
        fetched
    }

    /// 扇出所有子链接，等全部结束后按发现顺序合并
    async fn extract_sublinks(
        &self,
        ctx: &DomainCtx,
        links: Vec<DiscoveredLink>,
        progress: &ProgressSink,
    ) -> SublinkStats {
        let total = links.len();
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_sublinks));
        let done = Arc::new(AtomicUsize::new(0));
        let failed = Arc::new(AtomicUsize::new(0));

        let handles: Vec<(String, JoinHandle<SublinkOutcome>)> = links
            .into_iter()
            .map(|link| {
                let url = link.url.clone();
                let handle = tokio::spawn(extract_sublink(
                    link.url,
                    self.extractor.clone(),
                    semaphore.clone(),
                    SublinkProgress {
                        domain_index: ctx.domain_index,
                        total,
                        done: done.clone(),
                        failed: failed.clone(),
                        sink: progress.clone(),
                    },
                ));
                (url, handle)
            })
            .collect();

        // 按发现顺序等待，合并顺序与完成先后无关
        let mut stats = SublinkStats {
            total,
            ..Default::default()
        };
        for (url, handle) in handles {
            match handle.await {
                Ok(Ok((emails, found_at))) => {
                    stats.sources.extend(emails.into_sources(&url, found_at));
                }
                Ok(Err(e)) => {
                    warn!("{} ⚠️ 子链接失败: {}", ctx, e);
                    stats.failed += 1;
                }
                Err(e) => {
                    error!("{} 子链接任务异常 {}: {}", ctx, url, e);
                    stats.failed += 1;
                }
            }
        }

        stats
    }
}

/// 子链接任务共享的进度计数
struct SublinkProgress {
    domain_index: usize,
    total: usize,
    done: Arc<AtomicUsize>,
    failed: Arc<AtomicUsize>,
    sink: ProgressSink,
}

impl SublinkProgress {
    fn settle(&self, succeeded: bool) {
        if !succeeded {
            let failed = self.failed.fetch_add(1, Ordering::SeqCst) + 1;
            self.sink.send(ProgressEvent::SubLinksFailed {
                domain_index: self.domain_index,
                failed,
            });
        }
        let done = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        self.sink.send(ProgressEvent::SubLinksDone {
            domain_index: self.domain_index,
            done: done.min(self.total),
        });
    }
}

async fn extract_sublink(
    url: String,
    extractor: EmailExtractor,
    semaphore: Arc<Semaphore>,
    progress: SublinkProgress,
) -> SublinkOutcome {
    let outcome = match semaphore.acquire_owned().await {
        Ok(_permit) => extractor
            .extract(&url)
            .await
            .map(|emails| (emails, Utc::now())),
        Err(_) => Err(ExtractionError::new(FetchError::Session {
            url: url.clone(),
            source: PoolError::Closed,
        })),
    };
    progress.settle(outcome.is_ok());
    outcome
}

fn log_domain_complete(ctx: &DomainCtx, result: &DomainResult, total: usize, failed: usize) {
    if failed == 0 {
        info!(
            "{} ✅ 处理完成: {} 个邮箱, {} 个子链接",
            ctx,
            result.emails.len(),
            total
        );
    } else if result.status.is_failure() {
        error!("{} ❌ 所有 {} 个子链接都失败了", ctx, total);
    } else {
        warn!(
            "{} ⚠️ 处理完成: {} 个邮箱, {}/{} 个子链接失败",
            ctx,
            result.emails.len(),
            failed,
            total
        );
    }
}
