//! 浏览器层
//!
//! - `engine` - 引擎抽象（启动 / 导航 / 读取 HTML / 关闭）
//! - `headless` - chromiumoxide 实现
//! - `pool` - 会话池，唯一持有浏览器生命周期的地方

pub mod engine;
pub mod headless;
pub mod pool;

pub use engine::{BrowserEngine, BrowserSession};
pub use headless::ChromiumEngine;
pub use pool::{BrowserSessionPool, SessionLease};
