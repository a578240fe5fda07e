//! 登录状态上下文
//!
//! 在内存中保存当前用户和令牌，并同步写入本地存储，刷新页面
//! （或重新启动命令行）后可以恢复。本地缓存只用于会话延续，服务端才是
//! 数据的来源。不做令牌过期和自动刷新。

mod session;

use std::sync::{Arc, PoisonError, RwLock};

pub use session::Session;

use crate::api::schema::User;
use crate::error::Result;
use crate::storage::LocalStorage;
use crate::storage::keys::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, SESSION_KEYS, USER_KEY};

#[derive(Debug, Default, Clone)]
struct AuthState {
    user: Option<User>,
    session: Option<Session>,
}

pub struct AuthContext {
    storage: Arc<dyn LocalStorage>,
    state: RwLock<AuthState>,
}

impl AuthContext {
    pub fn new(storage: Arc<dyn LocalStorage>) -> Self {
        Self {
            storage,
            state: RwLock::new(AuthState::default()),
        }
    }

    /// 从本地存储恢复会话，缓存损坏时丢弃并视为未登录
    pub fn restore(&self) -> Result<bool> {
        let user = match self.storage.get_item(USER_KEY)? {
            Some(raw) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Discarding unreadable cached user: {}", e);
                    self.clear_storage()?;
                    None
                }
            },
            None => None,
        };
        let session = match (user.as_ref(), self.storage.get_item(ACCESS_TOKEN_KEY)?) {
            (Some(_), Some(access_token)) => Some(Session::new(
                access_token,
                self.storage.get_item(REFRESH_TOKEN_KEY)?,
            )),
            _ => None,
        };

        let restored = user.is_some();
        if let Some(user) = &user {
            tracing::info!("Restored session for user: {}", user.id);
        }
        *self.write() = AuthState { user, session };
        Ok(restored)
    }

    pub fn login(&self, user: User, session: Session) -> Result<()> {
        let user_json = serde_json::to_string(&user)?;
        self.storage.set_item(USER_KEY, &user_json)?;
        self.storage.set_item(ACCESS_TOKEN_KEY, &session.access_token)?;
        match &session.refresh_token {
            Some(refresh) => self.storage.set_item(REFRESH_TOKEN_KEY, refresh)?,
            None => self.storage.remove_item(REFRESH_TOKEN_KEY)?,
        }

        tracing::info!("User logged in: {}", user.id);
        *self.write() = AuthState {
            user: Some(user),
            session: Some(session),
        };
        Ok(())
    }

    /// 清除内存和本地存储中的三个会话键
    pub fn logout(&self) -> Result<()> {
        let previous = std::mem::take(&mut *self.write());
        self.clear_storage()?;
        if let Some(user) = previous.user {
            tracing::info!("User logged out: {}", user.id);
        }
        Ok(())
    }

    pub fn update_user(&self, user: User) -> Result<()> {
        let user_json = serde_json::to_string(&user)?;
        self.storage.set_item(USER_KEY, &user_json)?;
        self.write().user = Some(user);
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        self.read().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read()
            .session
            .as_ref()
            .map(|s| s.access_token.clone())
    }

    pub fn session(&self) -> Option<Session> {
        self.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.read()
            .user
            .as_ref()
            .is_some_and(User::has_admin_rights)
    }

    fn clear_storage(&self) -> Result<()> {
        for key in SESSION_KEYS {
            self.storage.remove_item(key)?;
        }
        Ok(())
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AuthState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AuthState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};

    fn sample_user() -> User {
        User {
            id: "u-1".into(),
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            username: "ada".into(),
            role: "user".into(),
            ..User::default()
        }
    }

    #[test]
    fn test_login_persists_all_session_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = AuthContext::new(storage.clone());
        auth.login(sample_user(), Session::new("access", Some("refresh".into())))
            .unwrap();

        assert!(auth.is_authenticated());
        assert_eq!(auth.access_token().as_deref(), Some("access"));
        for key in SESSION_KEYS {
            assert!(storage.get_item(key).unwrap().is_some(), "missing {}", key);
        }
    }

    #[test]
    fn test_logout_clears_everything() {
        let storage = Arc::new(MemoryStorage::new());
        let auth = AuthContext::new(storage.clone());
        auth.login(sample_user(), Session::new("access", Some("refresh".into())))
            .unwrap();
        auth.logout().unwrap();

        assert!(!auth.is_authenticated());
        assert!(auth.access_token().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_restore_from_storage() {
        let storage = Arc::new(MemoryStorage::new());
        AuthContext::new(storage.clone())
            .login(sample_user(), Session::new("access", None))
            .unwrap();

        let auth = AuthContext::new(storage);
        assert!(auth.restore().unwrap());
        assert_eq!(auth.current_user().unwrap().username, "ada");
        assert_eq!(auth.session().unwrap(), Session::new("access", None));
    }

    #[test]
    fn test_restore_discards_corrupt_user() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(USER_KEY, "{broken").unwrap();
        storage.set_item(ACCESS_TOKEN_KEY, "access").unwrap();

        let auth = AuthContext::new(storage.clone());
        assert!(!auth.restore().unwrap());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_restore_survives_corrupt_storage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        std::fs::write(&path, "{\"user\": ").unwrap();

        let auth = AuthContext::new(Arc::new(FileStorage::new(&path)));
        assert!(!auth.restore().unwrap());
        assert!(!auth.is_authenticated());
        auth.logout().unwrap();
    }

    #[test]
    fn test_update_user_and_admin_flag() {
        let auth = AuthContext::new(Arc::new(MemoryStorage::new()));
        auth.login(sample_user(), Session::new("a", None)).unwrap();
        assert!(!auth.is_admin());

        let mut promoted = sample_user();
        promoted.is_admin = true;
        auth.update_user(promoted).unwrap();
        assert!(auth.is_admin());
    }
}
