// 各页面的数据操作
// 每个资源一个操作集合，先做表单校验再发请求

pub mod admin;
pub mod ai;
pub mod auth;
pub mod chat;
pub mod post;
pub mod snippet;
pub mod user;

// 重新导出常用操作
pub use admin::{AdminData, AdminOperations};
pub use ai::AiOperations;
pub use auth::AuthOperations;
pub use chat::ChatOperations;
pub use post::PostOperations;
pub use snippet::SnippetOperations;
pub use user::{ApiUserSearch, UserOperations};

use crate::AppState;
use crate::error::{ClientError, Result};

/// 需要登录的操作在本地先检查，未登录时不发请求
pub(crate) fn require_session(state: &AppState) -> Result<()> {
    if state.auth.is_authenticated() {
        Ok(())
    } else {
        Err(ClientError::Unauthorized)
    }
}
