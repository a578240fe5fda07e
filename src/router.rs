use std::fmt;

use crate::auth::AuthContext;

/// 页面路由表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    ForgotPassword,
    Dashboard,
    Blog,
    PostDetail(String),
    NewPost,
    Snippets,
    SnippetDetail(String),
    NewSnippet,
    Chat,
    ChatRoom(String),
    AiTools,
    Profile(String),
    Settings,
    Admin,
    AdminUsers,
    AdminReports,
    NotFound(String),
}

/// 访问级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    /// 仅未登录用户，已登录时跳转到控制台
    GuestOnly,
    Authenticated,
    Admin,
}

/// 导航结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["forgot-password"] => Route::ForgotPassword,
            ["dashboard"] => Route::Dashboard,
            ["blog"] => Route::Blog,
            ["blog", "new"] => Route::NewPost,
            ["blog", id] => Route::PostDetail(id.to_string()),
            ["snippets"] => Route::Snippets,
            ["snippets", "new"] => Route::NewSnippet,
            ["snippets", id] => Route::SnippetDetail(id.to_string()),
            ["chat"] => Route::Chat,
            ["chat", room] => Route::ChatRoom(room.to_string()),
            ["ai-tools"] => Route::AiTools,
            ["profile", username] => Route::Profile(username.to_string()),
            ["settings"] => Route::Settings,
            ["admin"] => Route::Admin,
            ["admin", "users"] => Route::AdminUsers,
            ["admin", "reports"] => Route::AdminReports,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::ForgotPassword => "/forgot-password".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Blog => "/blog".to_string(),
            Route::PostDetail(id) => format!("/blog/{}", id),
            Route::NewPost => "/blog/new".to_string(),
            Route::Snippets => "/snippets".to_string(),
            Route::SnippetDetail(id) => format!("/snippets/{}", id),
            Route::NewSnippet => "/snippets/new".to_string(),
            Route::Chat => "/chat".to_string(),
            Route::ChatRoom(room) => format!("/chat/{}", room),
            Route::AiTools => "/ai-tools".to_string(),
            Route::Profile(username) => format!("/profile/{}", username),
            Route::Settings => "/settings".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::AdminUsers => "/admin/users".to_string(),
            Route::AdminReports => "/admin/reports".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Login | Route::Register | Route::ForgotPassword => Access::GuestOnly,
            Route::Home
            | Route::Blog
            | Route::PostDetail(_)
            | Route::Snippets
            | Route::SnippetDetail(_)
            | Route::Profile(_)
            | Route::NotFound(_) => Access::Public,
            Route::Dashboard
            | Route::NewPost
            | Route::NewSnippet
            | Route::Chat
            | Route::ChatRoom(_)
            | Route::AiTools
            | Route::Settings => Access::Authenticated,
            Route::Admin | Route::AdminUsers | Route::AdminReports => Access::Admin,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// 路由守卫：只看本地是否缓存了用户
pub fn navigate(path: &str, auth: &AuthContext) -> Navigation {
    let route = Route::parse(path);
    match route.access() {
        Access::Public => Navigation::Render(route),
        Access::GuestOnly if auth.is_authenticated() => Navigation::Redirect(Route::Dashboard),
        Access::GuestOnly => Navigation::Render(route),
        Access::Authenticated if auth.is_authenticated() => Navigation::Render(route),
        Access::Authenticated => Navigation::Redirect(Route::Login),
        Access::Admin if auth.is_admin() => Navigation::Render(route),
        Access::Admin if auth.is_authenticated() => Navigation::Redirect(Route::Dashboard),
        Access::Admin => Navigation::Redirect(Route::Login),
    }
}
