// 登录、注册与会话操作

use chrono::Utc;

use crate::AppState;
use crate::api::schema::{AuthResponse, ForgotPasswordRequest, User};
use crate::auth::Session;
use crate::error::Result;
use crate::forms::{Form, ForgotPasswordForm, LoginForm, RegisterForm};
use crate::router::Route;

pub struct AuthOperations;

impl AuthOperations {
    /// 登录成功后返回跳转目标（控制台）
    pub async fn login(state: &AppState, form: &LoginForm) -> Result<Route> {
        form.check()?;
        let request = form.to_request();

        let (user, session) = if state.config.demo_mode {
            tracing::info!("Demo mode login for {}", request.email);
            (demo_user(&request.email, None), Session::demo())
        } else {
            let resp: AuthResponse = state.api.post("/auth/login", &request).await?;
            (resp.user, Session::new(resp.access_token, resp.refresh_token))
        };

        state.auth.login(user, session)?;
        Ok(Route::Dashboard)
    }

    pub async fn register(state: &AppState, form: &RegisterForm) -> Result<Route> {
        form.check()?;
        let request = form.to_request();

        let (user, session) = if state.config.demo_mode {
            tracing::info!("Demo mode registration for {}", request.email);
            let mut user = demo_user(&request.email, Some(&request.name));
            user.username = request.username.clone();
            (user, Session::demo())
        } else {
            let resp: AuthResponse = state.api.post("/auth/register", &request).await?;
            (resp.user, Session::new(resp.access_token, resp.refresh_token))
        };

        state.auth.login(user, session)?;
        Ok(Route::Dashboard)
    }

    /// 通知后端失败不影响本地退出
    pub async fn logout(state: &AppState) -> Result<Route> {
        if !state.config.demo_mode && state.auth.is_authenticated() {
            let refresh_token = state.auth.session().and_then(|s| s.refresh_token);
            let body = serde_json::json!({ "refreshToken": refresh_token });
            if let Err(e) = state.api.post_ack("/auth/logout", &body).await {
                tracing::warn!("Logout request failed, clearing local session anyway: {}", e);
            }
        }
        state.auth.logout()?;
        Ok(Route::Login)
    }

    /// 返回给用户展示的提示文字
    pub async fn forgot_password(state: &AppState, form: &ForgotPasswordForm) -> Result<String> {
        form.check()?;
        let request = ForgotPasswordRequest {
            email: form.email.trim().to_lowercase(),
        };
        if !state.config.demo_mode {
            let ack = state.api.post_ack("/auth/forgot-password", &request).await?;
            if let Some(message) = ack.message {
                return Ok(message);
            }
        }
        Ok(format!(
            "If an account exists for {}, a reset link has been sent.",
            request.email
        ))
    }

    /// 从后端刷新当前用户资料并更新缓存
    pub async fn me(state: &AppState) -> Result<User> {
        super::require_session(state)?;
        if state.config.demo_mode {
            if let Some(user) = state.auth.current_user() {
                return Ok(user);
            }
        }
        let user: User = state.api.get("/auth/me").await?;
        state.auth.update_user(user.clone())?;
        Ok(user)
    }
}

/// 演示模式下根据邮箱生成本地用户，`admin@` 开头的邮箱获得管理员身份
fn demo_user(email: &str, name: Option<&str>) -> User {
    let local = email.split('@').next().unwrap_or(email);
    let username: String = local
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    let display_name = match name {
        Some(name) => name.to_string(),
        None => local
            .split(['.', '_', '-'])
            .filter(|part| !part.is_empty())
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" "),
    };
    let is_admin = local.eq_ignore_ascii_case("admin");

    User {
        id: uuid::Uuid::new_v4().to_string(),
        name: display_name,
        email: email.to_string(),
        username,
        role: if is_admin { "admin" } else { "user" }.to_string(),
        is_admin,
        bio: Some("Developer on DevHub".to_string()),
        joined_at: Some(Utc::now()),
        ..User::default()
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
