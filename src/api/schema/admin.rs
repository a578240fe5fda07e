use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// 管理后台首页统计
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: u64,
    pub active_users: u64,
    pub total_posts: u64,
    pub total_snippets: u64,
    pub total_rooms: u64,
    pub pending_reports: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Banned,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AdminRole {
    User,
    Moderator,
    Admin,
}

// 用户管理列表行
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: AdminRole,
    pub status: AccountStatus,
    pub joined: NaiveDate,
    pub posts: u32,
}

// 用户列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct AdminUserFilter {
    pub search: Option<String>,
    pub role: Option<AdminRole>,
    pub status: Option<AccountStatus>,
}

impl AdminUserFilter {
    pub fn matches(&self, row: &AdminUserRow) -> bool {
        if let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let term = term.to_lowercase();
            if !row.name.to_lowercase().contains(&term) && !row.email.to_lowercase().contains(&term) {
                return false;
            }
        }
        self.role.is_none_or(|role| role == row.role)
            && self.status.is_none_or(|status| status == row.status)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Pending,
    Resolved,
    Dismissed,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Post,
    Snippet,
    Message,
    User,
}

// 内容举报
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentReport {
    pub id: String,
    pub content_kind: ContentKind,
    pub content_id: String,
    pub reason: String,
    pub reporter: String,
    pub status: ReportStatus,
    pub reported_on: NaiveDate,
}
