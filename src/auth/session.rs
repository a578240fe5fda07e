use serde::{Deserialize, Serialize};

/// 客户端持有的令牌对，内容对客户端不透明
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }

    /// 演示模式下生成的本地令牌
    pub fn demo() -> Self {
        Self {
            access_token: format!("demo-access-{}", uuid::Uuid::new_v4()),
            refresh_token: Some(format!("demo-refresh-{}", uuid::Uuid::new_v4())),
        }
    }
}
