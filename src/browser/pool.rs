//! 浏览器会话池
//!
//! ## 规则
//!
//! - 同时存活的会话数 ≤ `capacity`
//! - 会话只用一次：`release` 关闭并丢弃会话，不做复用
//! - 池满时等待信号量唤醒，超过 `acquire_timeout` 返回 `PoolError::Timeout`
//! - `shutdown` 强制关闭所有未归还的会话，之后的 `acquire` 一律返回 `PoolError::Closed`

use std::collections::HashMap;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::{debug, info, warn};

use super::engine::{BrowserEngine, BrowserSession};
use crate::error::PoolError;

type LeaseTable = Arc<Mutex<HashMap<u64, Arc<dyn BrowserSession>>>>;

/// 浏览器会话池
pub struct BrowserSessionPool {
    engine: Arc<dyn BrowserEngine>,
    acquire_timeout: Duration,
    permits: Arc<Semaphore>,
    leased: LeaseTable,
    next_id: AtomicU64,
}

impl BrowserSessionPool {
    pub fn new(engine: Arc<dyn BrowserEngine>, capacity: usize, acquire_timeout: Duration) -> Self {
        Self {
            engine,
            acquire_timeout,
            permits: Arc::new(Semaphore::new(capacity)),
            leased: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// 当前已借出的会话数
    pub fn outstanding(&self) -> usize {
        lock_table(&self.leased).len()
    }

    pub fn is_closed(&self) -> bool {
        self.permits.is_closed()
    }

    /// 借出一个全新的会话
    ///
    /// 池满时等待其他会话归还；启动失败时名额立即归还。
    pub async fn acquire(&self) -> Result<SessionLease, PoolError> {
        let permit = match tokio::time::timeout(
            self.acquire_timeout,
            self.permits.clone().acquire_owned(),
        )
        .await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(PoolError::Closed),
            Err(_) => {
                warn!("⏳ 等待空闲浏览器超时 ({:?})", self.acquire_timeout);
                return Err(PoolError::Timeout {
                    waited: self.acquire_timeout,
                });
            }
        };

        let session = self.engine.launch().await.map_err(PoolError::Launch)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let accepted = {
            let mut leased = lock_table(&self.leased);
            // 启动期间池被关闭：不能把会话交出去
            let open = !self.permits.is_closed();
            if open {
                leased.insert(id, session.clone());
            }
            open
        };
        if !accepted {
            if let Err(e) = session.close().await {
                warn!("关闭浏览器会话 #{} 失败: {}", id, e);
            }
            return Err(PoolError::Closed);
        }
        debug!("借出浏览器会话 #{}", id);

        Ok(SessionLease {
            id,
            session,
            leased: self.leased.clone(),
            permit: Some(permit),
            released: false,
        })
    }

    /// 归还并关闭会话，总是成功
    pub async fn release(&self, lease: SessionLease) {
        lease.release().await;
    }

    /// 关闭所有未归还的会话，可重复调用
    pub async fn shutdown(&self) {
        let drained: Vec<(u64, Arc<dyn BrowserSession>)> = {
            let mut leased = lock_table(&self.leased);
            self.permits.close();
            leased.drain().collect()
        };

        if drained.is_empty() {
            return;
        }
        info!("🧹 关闭 {} 个未归还的浏览器会话", drained.len());

        join_all(drained.into_iter().map(|(id, session)| async move {
            if let Err(e) = session.close().await {
                warn!("关闭浏览器会话 #{} 失败: {}", id, e);
            }
        }))
        .await;
    }
}

/// 借出的会话
///
/// 推荐显式调用 `release`；如果租约在错误路径上被直接丢弃，
/// Drop 会在后台关闭会话并归还名额。
pub struct SessionLease {
    id: u64,
    session: Arc<dyn BrowserSession>,
    leased: LeaseTable,
    permit: Option<OwnedSemaphorePermit>,
    released: bool,
}

impl SessionLease {
    pub fn session(&self) -> &dyn BrowserSession {
        self.session.as_ref()
    }

    /// 关闭会话后再归还名额，保证存活的浏览器数不超过容量
    pub async fn release(mut self) {
        self.released = true;
        lock_table(&self.leased).remove(&self.id);

        if let Err(e) = self.session.close().await {
            warn!("关闭浏览器会话 #{} 失败: {}", self.id, e);
        }
        debug!("归还浏览器会话 #{}", self.id);
        self.permit.take();
    }
}

impl std::fmt::Debug for SessionLease {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionLease")
            .field("id", &self.id)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

impl Deref for SessionLease {
    type Target = dyn BrowserSession;

    fn deref(&self) -> &Self::Target {
        self.session.as_ref()
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        lock_table(&self.leased).remove(&self.id);

        let id = self.id;
        let session = self.session.clone();
        let permit = self.permit.take();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = session.close().await {
                        warn!("后台关闭浏览器会话 #{} 失败: {}", id, e);
                    }
                    drop(permit);
                });
            }
            Err(_) => warn!("没有可用的运行时，浏览器会话 #{} 未能关闭", id),
        }
    }
}

fn lock_table(
    table: &Mutex<HashMap<u64, Arc<dyn BrowserSession>>>,
) -> MutexGuard<'_, HashMap<u64, Arc<dyn BrowserSession>>> {
    table.lock().unwrap_or_else(PoisonError::into_inner)
}
