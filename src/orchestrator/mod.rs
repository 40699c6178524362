//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批量处理和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `batch_processor` - 批量域名处理器
//! - 管理应用生命周期（初始化、运行、关闭浏览器池）
//! - 校验所有种子 URL
//! - 控制并发域名数量（Semaphore）
//! - 输出全局统计信息并保存结果
//!
//! ### `progress_reporter` - 进度汇报器
//! - 消费 workflow 发出的进度事件
//! - 维护每个域名的进度表
//!
//! ## 层次关系
//!
//! ```text
//! batch_processor (处理 Vec<SeedTarget>)
//!     ↓
//! workflow::DomainFlow (处理单个种子)
//!     ↓
//! services (能力层：link_discoverer / email_extractor / result_aggregator)
//!     ↓
//! infrastructure (基础设施：PageFetcher)
//!     ↓
//! browser (BrowserSessionPool)
//! ```

pub mod batch_processor;
pub mod progress_reporter;

// 重新导出主要类型
pub use batch_processor::App;
pub use progress_reporter::{spawn_progress_reporter, DomainProgress};
