// 用户资料、设置与搜索

use async_trait::async_trait;

use super::require_session;
use crate::AppState;
use crate::api::ApiClient;
use crate::api::schema::{User, UserSummary};
use crate::error::Result;
use crate::forms::{ChangePasswordForm, Form, ProfileForm};
use crate::search::UserSearch;

pub struct UserOperations;

impl UserOperations {
    pub async fn get_profile(state: &AppState, username: &str) -> Result<User> {
        state
            .api
            .get(&format!("/users/{}", urlencoding::encode(username.trim())))
            .await
    }

    /// 更新资料并同步本地缓存的用户
    pub async fn update_profile(state: &AppState, form: &ProfileForm) -> Result<User> {
        form.check()?;
        require_session(state)?;

        let request = form.to_request();
        let user = if state.config.demo_mode {
            let mut user = state.auth.current_user().unwrap_or_default();
            if let Some(name) = request.name {
                user.name = name;
            }
            user.bio = request.bio;
            user.location = request.location;
            user.website = request.website;
            if let Some(links) = request.social_links {
                user.social_links = links;
            }
            user
        } else {
            state.api.put("/users/profile", &request).await?
        };

        state.auth.update_user(user.clone())?;
        tracing::info!("Profile updated for user: {}", user.id);
        Ok(user)
    }

    pub async fn change_password(state: &AppState, form: &ChangePasswordForm) -> Result<()> {
        form.check()?;
        require_session(state)?;
        if state.config.demo_mode {
            return Ok(());
        }
        state.api.put_ack("/users/password", &form.to_request()).await?;
        Ok(())
    }

    /// 少于最小长度的查询直接返回空结果，不发请求
    pub async fn search(state: &AppState, query: &str) -> Result<Vec<UserSummary>> {
        search_users(&state.api, query, state.config.search_min_chars).await
    }

    pub async fn follow(state: &AppState, user_id: &str) -> Result<()> {
        require_session(state)?;
        state
            .api
            .post_ack(
                &format!("/users/{}/follow", urlencoding::encode(user_id)),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    pub async fn unfollow(state: &AppState, user_id: &str) -> Result<()> {
        require_session(state)?;
        state
            .api
            .delete(&format!("/users/{}/follow", urlencoding::encode(user_id)))
            .await
    }
}

async fn search_users(api: &ApiClient, query: &str, min_chars: usize) -> Result<Vec<UserSummary>> {
    let query = query.trim();
    if query.chars().count() < min_chars {
        return Ok(Vec::new());
    }
    api.get_with_query("/users/search", &[("q", query.to_string())])
        .await
}

/// 防抖搜索使用的后端实现
#[derive(Clone)]
pub struct ApiUserSearch {
    api: ApiClient,
    min_chars: usize,
}

impl ApiUserSearch {
    pub fn new(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            min_chars: state.config.search_min_chars,
        }
    }
}

#[async_trait]
impl UserSearch for ApiUserSearch {
    async fn search_users(&self, query: &str) -> Result<Vec<UserSummary>> {
        search_users(&self.api, query, self.min_chars).await
    }
}
