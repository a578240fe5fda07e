use serde::Deserialize;

/// 后端响应的两种形态：`{ success, data, message }` 包装或直接返回数据
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ApiEnvelope<T> {
    Wrapped {
        #[serde(default)]
        success: Option<bool>,
        data: T,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(T),
}

impl<T> ApiEnvelope<T> {
    pub fn into_data(self) -> T {
        match self {
            ApiEnvelope::Wrapped { data, .. } => data,
            ApiEnvelope::Bare(data) => data,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ApiEnvelope::Wrapped { message, .. } => message.as_deref(),
            ApiEnvelope::Bare(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, ApiEnvelope::Wrapped { success: Some(false), .. })
    }
}

/// 仅含提示信息的响应，例如删除或点赞
#[derive(Debug, Default, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}
