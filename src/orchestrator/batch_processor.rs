//! 批量域名处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量域名的处理和资源管理。
//!
//! ## 核心功能
//!
//! 1. **输入校验**：启动任何浏览器之前校验全部种子 URL，有一个不合法就整体拒绝
//! 2. **并发控制**：使用 Semaphore 限制同时处理的域名数
//! 3. **资源管理**：唯一持有浏览器池，运行结束后统一关闭
//! 4. **结果收集**：按输入顺序返回每个域名的结果，单个域名失败不影响其他域名
//! 5. **全局统计**：输出汇总并按配置写入 JSON 文件

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::browser::{BrowserEngine, BrowserSessionPool, ChromiumEngine};
use crate::config::Config;
use crate::error::DiscoveryError;
use crate::models::{validate_seeds, DomainResult};
use crate::orchestrator::progress_reporter::spawn_progress_reporter;
use crate::services::ResultWriter;
use crate::utils::logging;
use crate::workflow::{DomainCtx, DomainFlow, DomainStage};

/// 应用主结构
pub struct App {
    config: Config,
    pool: Arc<BrowserSessionPool>,
    flow: Arc<DomainFlow>,
}

impl App {
    /// 使用指定的浏览器引擎创建应用
    ///
    /// 浏览器会话按需启动，这里不会打开任何浏览器。
    pub fn new(config: Config, engine: Arc<dyn BrowserEngine>) -> Result<Self, DiscoveryError> {
        config.validate()?;

        let pool = Arc::new(BrowserSessionPool::new(
            engine,
            config.browser_pool_size,
            config.pool_acquire_timeout(),
        ));
        let flow = Arc::new(DomainFlow::new(pool.clone(), &config));

        Ok(Self { config, pool, flow })
    }

    /// 使用本机 Chromium 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(
            config.browser_pool_size,
            config.max_concurrent_domains,
            config.max_concurrent_sublinks,
        );
        let engine = Arc::new(ChromiumEngine::new(&config));
        Ok(Self::new(config, engine)?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn pool(&self) -> &Arc<BrowserSessionPool> {
        &self.pool
    }

    /// 对所有种子执行联系方式发现
    ///
    /// # 返回
    /// 与输入顺序一致的结果列表；只有输入校验失败会返回错误
    pub async fn discover<S: AsRef<str>>(
        &self,
        inputs: &[S],
    ) -> Result<Vec<DomainResult>, DiscoveryError> {
        let seeds = validate_seeds(inputs)?;
        logging::log_domains_loaded(seeds.len());

        let (progress, reporter) =
            spawn_progress_reporter(seeds.iter().map(|s| s.domain().to_string()).collect());
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_domains));

        let mut handles = Vec::with_capacity(seeds.len());
        for (index, seed) in seeds.into_iter().enumerate() {
            let ctx = DomainCtx::new(index, seed);
            let flow = self.flow.clone();
            let progress = progress.clone();
            let semaphore = semaphore.clone();
            let domain = ctx.domain().to_string();

            let handle = tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        progress.stage(ctx.domain_index, DomainStage::Failed);
                        return DomainResult::failed(ctx.domain(), "Domain scheduler closed");
                    }
                };
                flow.run(&ctx, &progress).await
            });
            handles.push((domain, handle));
        }
        drop(progress);

        let mut results = Vec::with_capacity(handles.len());
        for (index, (domain, handle)) in handles.into_iter().enumerate() {
            match handle.await {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("[域名 {} {}] 任务执行失败: {}", index + 1, domain, e);
                    results.push(DomainResult::failed(domain, e.to_string()));
                }
            }
        }

        if let Err(e) = reporter.await {
            warn!("进度汇报任务异常: {}", e);
        }

        Ok(results)
    }

    /// 运行应用主逻辑：发现、关闭浏览器池、输出汇总并保存结果
    pub async fn run<S: AsRef<str>>(&self, inputs: &[S]) -> Result<Vec<DomainResult>> {
        let discovered = self.discover(inputs).await;
        self.shutdown().await;
        let results = discovered?;

        for result in &results {
            logging::log_domain_summary(result);
        }
        logging::print_final_stats(&results);

        if self.config.save_results {
            let writer = ResultWriter::new(&self.config.output_dir);
            let path = writer.write(&results).await?;
            info!("\n💾 结果已保存至: {}", path.display());
        }

        Ok(results)
    }

    /// 关闭浏览器池，强制关闭所有仍在使用的会话
    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }
}
