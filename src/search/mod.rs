//! 防抖搜索
//!
//! 每次输入都会取消上一轮尚未完成的查询（包括已经发出的请求），
//! 所以旧的结果不会覆盖新的结果。去除首尾空白后少于最小长度的输入
//! 不会访问网络，只清空结果。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::schema::UserSummary;
use crate::error::Result;

#[async_trait]
pub trait UserSearch: Send + Sync {
    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchEvent {
    Cleared,
    Results {
        query: String,
        users: Vec<UserSummary>,
    },
    Failed {
        query: String,
        message: String,
    },
}

pub struct DebouncedSearch {
    searcher: Arc<dyn UserSearch>,
    delay: Duration,
    min_chars: usize,
    events: mpsc::UnboundedSender<SearchEvent>,
    pending: Option<JoinHandle<()>>,
}

impl DebouncedSearch {
    pub fn new(
        searcher: Arc<dyn UserSearch>,
        delay: Duration,
        min_chars: usize,
    ) -> (Self, mpsc::UnboundedReceiver<SearchEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let search = Self {
            searcher,
            delay,
            min_chars,
            events,
            pending: None,
        };
        (search, receiver)
    }

    /// 处理一次输入变化，必须在 tokio 运行时中调用
    pub fn input(&mut self, query: &str) {
        self.cancel();

        let query = query.trim().to_string();
        if query.chars().count() < self.min_chars {
            let _ = self.events.send(SearchEvent::Cleared);
            return;
        }

        let searcher = self.searcher.clone();
        let events = self.events.clone();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tracing::debug!("Searching users for {:?}", query);
            let event = match searcher.search_users(&query).await {
                Ok(users) => SearchEvent::Results { query, users },
                Err(e) => {
                    tracing::warn!("User search failed: {}", e);
                    SearchEvent::Failed {
                        query,
                        message: e.user_message(),
                    }
                }
            };
            let _ = events.send(event);
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for DebouncedSearch {
    fn drop(&mut self) {
        self.cancel();
    }
}
