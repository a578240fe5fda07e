use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::Author;

// 聊天室
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub members_count: u64,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
}

// 聊天消息
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub sender: Author,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

// 创建聊天室请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub is_private: bool,
}

// 发送消息请求
#[derive(Debug, Clone, Serialize)]
pub struct MessagePayload {
    pub content: String,
}
