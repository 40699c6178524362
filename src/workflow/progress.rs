//! 进度事件
//!
//! 核心流程只往通道里发事件，从不直接修改展示状态；由单独的任务负责消费。

use std::fmt::Display;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// 单个域名的处理阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainStage {
    Pending,
    FetchingSeed,
    DiscoveringLinks,
    ExtractingSublinks,
    Aggregating,
    Completed,
    Failed,
}

impl Display for DomainStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            DomainStage::Pending => "Pending",
            DomainStage::FetchingSeed => "Analyzing links",
            DomainStage::DiscoveringLinks => "Discovering links",
            DomainStage::ExtractingSublinks => "Extracting emails",
            DomainStage::Aggregating => "Aggregating",
            DomainStage::Completed => "Complete",
            DomainStage::Failed => "Failed",
        };
        f.write_str(label)
    }
}

/// 进度事件，每个变体只携带它更新的那个字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Stage {
        domain_index: usize,
        stage: DomainStage,
    },
    SubLinksTotal {
        domain_index: usize,
        total: usize,
    },
    /// 已结束（成功或失败）的子链接数
    SubLinksDone {
        domain_index: usize,
        done: usize,
    },
    SubLinksFailed {
        domain_index: usize,
        failed: usize,
    },
    EmailsFound {
        domain_index: usize,
        count: usize,
    },
    /// 失败原因
    Error {
        domain_index: usize,
        message: String,
    },
}

impl ProgressEvent {
    pub fn domain_index(&self) -> usize {
        match self {
            ProgressEvent::Stage { domain_index, .. }
            | ProgressEvent::SubLinksTotal { domain_index, .. }
            | ProgressEvent::SubLinksDone { domain_index, .. }
            | ProgressEvent::SubLinksFailed { domain_index, .. }
            | ProgressEvent::EmailsFound { domain_index, .. }
            | ProgressEvent::Error { domain_index, .. } => *domain_index,
        }
    }
}

/// 进度事件发送端
///
/// 尽力而为：接收端已关闭或未设置时静默丢弃。
#[derive(Debug, Clone, Default)]
pub struct ProgressSink {
    tx: Option<UnboundedSender<ProgressEvent>>,
}

impl ProgressSink {
    /// 创建一对发送端 / 接收端
    pub fn channel() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// 不发送任何事件
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn send(&self, event: ProgressEvent) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event);
        }
    }

    pub fn stage(&self, domain_index: usize, stage: DomainStage) {
        self.send(ProgressEvent::Stage {
            domain_index,
            stage,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_sink_drops_events() {
        let sink = ProgressSink::disabled();
        sink.stage(0, DomainStage::FetchingSeed);
    }

    #[test]
    fn test_closed_receiver_is_ignored() {
        let (sink, rx) = ProgressSink::channel();
        drop(rx);
        sink.send(ProgressEvent::SubLinksTotal {
            domain_index: 0,
            total: 3,
        });
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let (sink, mut rx) = ProgressSink::channel();
        sink.stage(1, DomainStage::FetchingSeed);
        sink.send(ProgressEvent::SubLinksTotal {
            domain_index: 1,
            total: 4,
        });
        drop(sink);

        let first = rx.recv().await.unwrap();
        assert_eq!(
            first,
            ProgressEvent::Stage {
                domain_index: 1,
                stage: DomainStage::FetchingSeed
            }
        );
        assert_eq!(rx.recv().await.unwrap().domain_index(), 1);
        assert!(rx.recv().await.is_none());
    }
}
