// 管理后台
// 当前版本没有管理接口，数据来自内置的演示数据，修改只在本进程内生效

use std::sync::{PoisonError, RwLock};

use chrono::NaiveDate;

use super::require_session;
use crate::AppState;
use crate::api::schema::{
    AccountStatus, AdminRole, AdminUserFilter, AdminUserRow, ContentKind, ContentReport,
    DashboardStats, ReportStatus,
};
use crate::error::{ClientError, Result};

// 演示数据中未逐条列出的内容总数
const SEEDED_SNIPPETS: u64 = 342;
const SEEDED_ROOMS: u64 = 18;

// (id, 姓名, 角色, 状态, 注册日期, 文章数)
const SEED_USERS: [(&str, &str, AdminRole, AccountStatus, &str, u32); 5] = [
    ("1", "John Doe", AdminRole::User, AccountStatus::Active, "2024-01-15", 12),
    ("2", "Jane Smith", AdminRole::Admin, AccountStatus::Active, "2023-11-02", 34),
    ("3", "Bob Wilson", AdminRole::Moderator, AccountStatus::Active, "2024-02-20", 7),
    ("4", "Alice Brown", AdminRole::User, AccountStatus::Suspended, "2024-03-08", 3),
    ("5", "Charlie Davis", AdminRole::User, AccountStatus::Banned, "2023-09-30", 0),
];

// (id, 类型, 内容 ID, 原因, 举报人, 状态, 日期)
const SEED_REPORTS: [(&str, ContentKind, &str, &str, &str, ReportStatus, &str); 4] = [
    (
        "r1",
        ContentKind::Post,
        "p-101",
        "Spam content",
        "John",
        ReportStatus::Pending,
        "2024-03-10",
    ),
    (
        "r2",
        ContentKind::Snippet,
        "s-204",
        "Copyrighted code",
        "Jane",
        ReportStatus::Pending,
        "2024-03-11",
    ),
    (
        "r3",
        ContentKind::Message,
        "m-877",
        "Harassment",
        "Bob",
        ReportStatus::Resolved,
        "2024-03-05",
    ),
    (
        "r4",
        ContentKind::User,
        "5",
        "Fake account",
        "Alice",
        ReportStatus::Dismissed,
        "2024-02-28",
    ),
];

pub struct AdminData {
    users: RwLock<Vec<AdminUserRow>>,
    reports: RwLock<Vec<ContentReport>>,
}

impl AdminData {
    pub fn new(users: Vec<AdminUserRow>, reports: Vec<ContentReport>) -> Self {
        Self {
            users: RwLock::new(users),
            reports: RwLock::new(reports),
        }
    }

    pub fn seeded() -> Self {
        let users = SEED_USERS
            .iter()
            .map(|&(id, name, role, status, joined, posts)| AdminUserRow {
                id: id.to_string(),
                name: name.to_string(),
                email: seed_email(name),
                role,
                status,
                joined: date(joined),
                posts,
            })
            .collect();
        let reports = SEED_REPORTS
            .iter()
            .map(|&(id, content_kind, content_id, reason, reporter, status, reported_on)| {
                ContentReport {
                    id: id.to_string(),
                    content_kind,
                    content_id: content_id.to_string(),
                    reason: reason.to_string(),
                    reporter: seed_email(reporter),
                    status,
                    reported_on: date(reported_on),
                }
            })
            .collect();
        Self::new(users, reports)
    }
}

pub struct AdminOperations;

impl AdminOperations {
    pub async fn dashboard_stats(state: &AppState) -> Result<DashboardStats> {
        require_admin(state)?;
        let users = state.admin.users.read().unwrap_or_else(PoisonError::into_inner);
        let reports = state.admin.reports.read().unwrap_or_else(PoisonError::into_inner);
        Ok(DashboardStats {
            total_users: users.len() as u64,
            active_users: users
                .iter()
                .filter(|u| u.status == AccountStatus::Active)
                .count() as u64,
            total_posts: users.iter().map(|u| u64::from(u.posts)).sum(),
            total_snippets: SEEDED_SNIPPETS,
            total_rooms: SEEDED_ROOMS,
            pending_reports: reports
                .iter()
                .filter(|r| r.status == ReportStatus::Pending)
                .count() as u64,
        })
    }

    pub async fn users(state: &AppState, filter: &AdminUserFilter) -> Result<Vec<AdminUserRow>> {
        require_admin(state)?;
        let users = state.admin.users.read().unwrap_or_else(PoisonError::into_inner);
        Ok(users.iter().filter(|u| filter.matches(u)).cloned().collect())
    }

    pub async fn set_user_status(
        state: &AppState,
        user_id: &str,
        status: AccountStatus,
    ) -> Result<AdminUserRow> {
        require_admin(state)?;
        let mut users = state.admin.users.write().unwrap_or_else(PoisonError::into_inner);
        let row = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(ClientError::NotFound)?;
        row.status = status;
        tracing::info!("Admin set status of user {} to {:?}", user_id, status);
        Ok(row.clone())
    }

    pub async fn set_user_role(
        state: &AppState,
        user_id: &str,
        role: AdminRole,
    ) -> Result<AdminUserRow> {
        require_admin(state)?;
        let mut users = state.admin.users.write().unwrap_or_else(PoisonError::into_inner);
        let row = users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(ClientError::NotFound)?;
        row.role = role;
        tracing::info!("Admin set role of user {} to {:?}", user_id, role);
        Ok(row.clone())
    }

    pub async fn delete_user(state: &AppState, user_id: &str) -> Result<()> {
        require_admin(state)?;
        let mut users = state.admin.users.write().unwrap_or_else(PoisonError::into_inner);
        let before = users.len();
        users.retain(|u| u.id != user_id);
        if users.len() == before {
            return Err(ClientError::NotFound);
        }
        tracing::info!("Admin deleted user {}", user_id);
        Ok(())
    }

    /// `status` 为空时返回全部举报
    pub async fn reports(
        state: &AppState,
        status: Option<ReportStatus>,
    ) -> Result<Vec<ContentReport>> {
        require_admin(state)?;
        let reports = state.admin.reports.read().unwrap_or_else(PoisonError::into_inner);
        Ok(reports
            .iter()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect())
    }

    pub async fn resolve_report(
        state: &AppState,
        report_id: &str,
        outcome: ReportStatus,
    ) -> Result<ContentReport> {
        require_admin(state)?;
        if outcome == ReportStatus::Pending {
            return Err(ClientError::Status {
                status: 400,
                message: "A report can only be resolved or dismissed".to_string(),
            });
        }
        let mut reports = state.admin.reports.write().unwrap_or_else(PoisonError::into_inner);
        let report = reports
            .iter_mut()
            .find(|r| r.id == report_id)
            .ok_or(ClientError::NotFound)?;
        report.status = outcome;
        Ok(report.clone())
    }
}

/// 未登录返回 Unauthorized，已登录但不是管理员返回 403
fn require_admin(state: &AppState) -> Result<()> {
    require_session(state)?;
    if state.auth.is_admin() {
        Ok(())
    } else {
        tracing::warn!("Non-admin user attempted an admin operation");
        Err(ClientError::Status {
            status: 403,
            message: "Admin access required".to_string(),
        })
    }
}

fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or_default()
}

// "John Doe" -> john@example.com
fn seed_email(name: &str) -> String {
    let first = name.split_whitespace().next().unwrap_or(name);
    format!("{}@example.com", first.to_lowercase())
}
