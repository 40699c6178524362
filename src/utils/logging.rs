/// 日志工具模块
///
/// 提供日志初始化以及启动、汇总信息的输出
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::models::DomainResult;

/// 初始化 tracing 日志
///
/// `RUST_LOG` 优先；未设置时使用 info，`verbose` 为 true 时使用 debug。
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 重复初始化（例如测试中）直接忽略
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
///
/// # 参数
/// - `pool_size`: 浏览器池容量
/// - `max_domains`: 同时处理的域名数
/// - `max_sublinks`: 每个域名同时处理的子链接数
pub fn log_startup(pool_size: usize, max_domains: usize, max_sublinks: usize) {
    info!("{}", "=".repeat(60));
    info!("🎯 Contact Discovery Engine 启动");
    info!(
        "📊 浏览器池: {} | 并发域名: {} | 并发子链接: {}",
        pool_size, max_domains, max_sublinks
    );
    info!("{}", "=".repeat(60));
}

/// 记录待处理域名
pub fn log_domains_loaded(total: usize) {
    info!("✓ 共 {} 个待处理的域名", total);
}

/// 输出每个域名的汇总
pub fn log_domain_summary(result: &DomainResult) {
    info!("\n{}", "─".repeat(60));
    info!("🌐 {}", result.domain);

    if result.emails.is_empty() {
        match &result.error {
            Some(error) => warn!("   No emails found, Error: {}", error),
            None => info!("   No emails found"),
        }
        return;
    }

    let primary: Vec<&str> = result.primary_emails().map(|e| e.email.as_str()).collect();
    let other: Vec<&str> = result.other_emails().map(|e| e.email.as_str()).collect();
    if !primary.is_empty() {
        info!("   Primary Domain Emails: {}", primary.join(", "));
    }
    if !other.is_empty() {
        info!("   Other Emails: {}", other.join(", "));
    }
    info!("   来源: {}", result.source_links().join(", "));

    match &result.error {
        Some(error) => warn!("   Partial Success ({})", error),
        None => info!("   Success"),
    }
}

/// 打印最终统计信息
///
/// # 参数
/// - `results`: 所有域名的结果
pub fn print_final_stats(results: &[DomainResult]) {
    let failed = results.iter().filter(|r| r.status.is_failure()).count();
    let emails: usize = results.iter().map(|r| r.emails.len()).sum();

    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", results.len() - failed, results.len());
    info!("❌ 失败: {}", failed);
    info!("📧 邮箱总数: {}", emails);
    info!("{}", "=".repeat(60));
}
