//! # Contact Discovery
//!
//! 用真实浏览器批量访问网站，从种子页面及其同域子页面中找出联系邮箱
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 浏览器层（Browser）
//! - `browser/` - 持有稀缺资源（浏览器会话），只暴露借用 / 归还
//! - `BrowserSessionPool` - 限制同时存活的会话数，关闭时强制回收
//!
//! ### ② 基础设施层（Infrastructure）
//! - `PageFetcher` - 在一个会话中导航并取回渲染后的 HTML
//!
//! ### ③ 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个页面
//! - `link_discoverer` - 发现同域子链接
//! - `EmailExtractor` - 提取并分类邮箱
//! - `ResultAggregator` - 去重汇总
//! - `ResultWriter` - 写 JSON 结果文件
//!
//! ### ④ 流程层（Workflow）
//! - `workflow/` - 定义"一个种子"的完整处理流程
//! - `DomainCtx` - 上下文封装（domain_index + seed）
//! - `DomainFlow` - 流程编排（seed → links → sub-links → aggregate）
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/batch_processor` - 批量域名处理器，管理资源和并发
//! - `orchestrator/progress_reporter` - 进度汇报
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{BrowserEngine, BrowserSession, BrowserSessionPool, ChromiumEngine};
pub use config::Config;
pub use error::DiscoveryError;
pub use infrastructure::PageFetcher;
pub use models::{CrawlStatus, DomainResult, EmailSource, SeedTarget};
pub use orchestrator::App;
pub use workflow::{DomainCtx, DomainFlow};
