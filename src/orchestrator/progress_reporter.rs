//! 进度汇报器
//!
//! 单独的任务消费 `ProgressEvent`，维护每个域名的进度表并输出日志。
//! 所有发送端释放后任务结束，返回最终的进度表。

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::workflow::{DomainStage, ProgressEvent, ProgressSink};

/// 单个域名的进度快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainProgress {
    pub domain: String,
    pub stage: DomainStage,
    pub sublinks_total: usize,
    pub sublinks_done: usize,
    pub sublinks_failed: usize,
    pub emails_found: usize,
    pub error: Option<String>,
}

impl DomainProgress {
    fn new(domain: String) -> Self {
        Self {
            domain,
            stage: DomainStage::Pending,
            sublinks_total: 0,
            sublinks_done: 0,
            sublinks_failed: 0,
            emails_found: 0,
            error: None,
        }
    }
}

/// 启动进度汇报任务
///
/// # 参数
/// - `domains`: 按输入顺序排列的域名，下标即事件中的 `domain_index`
///
/// # 返回
/// 发送端和汇报任务句柄；句柄在所有发送端释放后返回最终进度表
pub fn spawn_progress_reporter(
    domains: Vec<String>,
) -> (ProgressSink, JoinHandle<Vec<DomainProgress>>) {
    let (sink, rx) = ProgressSink::channel();
    let table = domains.into_iter().map(DomainProgress::new).collect();
    let handle = tokio::spawn(report(rx, table));
    (sink, handle)
}

async fn report(
    mut rx: UnboundedReceiver<ProgressEvent>,
    mut table: Vec<DomainProgress>,
) -> Vec<DomainProgress> {
    while let Some(event) = rx.recv().await {
        let Some(row) = table.get_mut(event.domain_index()) else {
            debug!("忽略未知域名的进度事件: {:?}", event);
            continue;
        };
        apply(row, event);
    }
    table
}

fn apply(row: &mut DomainProgress, event: ProgressEvent) {
    match event {
        ProgressEvent::Stage { stage, .. } => {
            row.stage = stage;
            match stage {
                DomainStage::Completed => info!(
                    "📈 {} {} ({} emails, {}/{} links)",
                    row.domain, stage, row.emails_found, row.sublinks_done, row.sublinks_total
                ),
                DomainStage::Failed => warn!(
                    "📈 {} {}: {}",
                    row.domain,
                    stage,
                    row.error.as_deref().unwrap_or("all sub-links failed")
                ),
                _ => debug!("📈 {} {}", row.domain, stage),
            }
        }
        ProgressEvent::SubLinksTotal { total, .. } => row.sublinks_total = total,
        ProgressEvent::SubLinksDone { done, .. } => {
            // 并发任务的事件可能乱序到达，只前进不后退
            row.sublinks_done = row.sublinks_done.max(done);
            debug!(
                "📈 {} {}/{} links",
                row.domain, row.sublinks_done, row.sublinks_total
            );
        }
        ProgressEvent::SubLinksFailed { failed, .. } => {
            row.sublinks_failed = row.sublinks_failed.max(failed)
        }
        ProgressEvent::EmailsFound { count, .. } => row.emails_found = count,
        ProgressEvent::Error { message, .. } => row.error = Some(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reporter_builds_final_table() {
        let (sink, handle) =
            spawn_progress_reporter(vec!["a.example".to_string(), "b.example".to_string()]);

        sink.stage(0, DomainStage::FetchingSeed);
        sink.send(ProgressEvent::SubLinksTotal {
            domain_index: 0,
            total: 3,
        });
        sink.send(ProgressEvent::SubLinksDone {
            domain_index: 0,
            done: 2,
        });
        sink.send(ProgressEvent::SubLinksDone {
            domain_index: 0,
            done: 1,
        });
        sink.send(ProgressEvent::EmailsFound {
            domain_index: 0,
            count: 5,
        });
        sink.stage(0, DomainStage::Completed);
        sink.send(ProgressEvent::Error {
            domain_index: 1,
            message: "Timeout accessing https://b.example/".to_string(),
        });
        sink.stage(1, DomainStage::Failed);
        sink.stage(9, DomainStage::Completed);
        drop(sink);

        let table = handle.await.unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table[0].stage, DomainStage::Completed);
        assert_eq!(table[0].sublinks_total, 3);
        assert_eq!(table[0].sublinks_done, 2);
        assert_eq!(table[0].emails_found, 5);
        assert_eq!(table[1].stage, DomainStage::Failed);
        assert_eq!(
            table[1].error.as_deref(),
            Some("Timeout accessing https://b.example/")
        );
    }

    #[tokio::test]
    async fn test_untouched_domain_stays_pending() {
        let (sink, handle) = spawn_progress_reporter(vec!["a.example".to_string()]);
        drop(sink);

        let table = handle.await.unwrap();
        assert_eq!(table[0].stage, DomainStage::Pending);
        assert_eq!(table[0].sublinks_total, 0);
    }
}
