use std::sync::Arc;

use api::ApiClient;
use api::operations::AdminData;
use auth::AuthContext;
use config::Config;
use storage::{FileStorage, LocalStorage};

pub mod ai;
pub mod api;
pub mod auth;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod forms;
pub mod result;
pub mod router;
pub mod search;
pub mod storage;
pub mod utils;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub auth: Arc<AuthContext>,
    pub api: ApiClient,
    pub admin: Arc<AdminData>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn LocalStorage>) -> Self {
        let auth = Arc::new(AuthContext::new(storage));
        let api = ApiClient::new(&config.api_base_url, auth.clone());
        Self {
            config,
            auth,
            api,
            admin: Arc::new(AdminData::seeded()),
        }
    }

    /// 使用文件存储并恢复上一次的会话
    pub fn open(config: Config) -> error::Result<Self> {
        let storage = Arc::new(FileStorage::new(config.storage_path.clone()));
        let state = Self::new(config, storage);
        state.auth.restore()?;
        Ok(state)
    }
}
