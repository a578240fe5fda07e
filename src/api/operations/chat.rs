// 聊天室与消息

use super::require_session;
use crate::AppState;
use crate::api::schema::{Message, Room};
use crate::error::Result;
use crate::forms::{Form, MessageForm, RoomForm};

pub struct ChatOperations;

impl ChatOperations {
    pub async fn rooms(state: &AppState) -> Result<Vec<Room>> {
        require_session(state)?;
        state.api.get("/chat/rooms").await
    }

    pub async fn create_room(state: &AppState, form: &RoomForm) -> Result<Room> {
        form.check()?;
        require_session(state)?;
        let room: Room = state.api.post("/chat/rooms", &form.to_payload()).await?;
        tracing::info!("Created chat room {} ({})", room.id, room.name);
        Ok(room)
    }

    pub async fn join_room(state: &AppState, room_id: &str) -> Result<()> {
        require_session(state)?;
        state
            .api
            .post_ack(
                &format!("/chat/rooms/{}/join", urlencoding::encode(room_id)),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    pub async fn leave_room(state: &AppState, room_id: &str) -> Result<()> {
        require_session(state)?;
        state
            .api
            .post_ack(
                &format!("/chat/rooms/{}/leave", urlencoding::encode(room_id)),
                &serde_json::json!({}),
            )
            .await?;
        Ok(())
    }

    /// 按时间升序返回，`before` 为分页游标（消息 ID）
    pub async fn messages(
        state: &AppState,
        room_id: &str,
        before: Option<&str>,
    ) -> Result<Vec<Message>> {
        require_session(state)?;
        let query: Vec<(&str, String)> = before
            .map(|cursor| vec![("before", cursor.to_string())])
            .unwrap_or_default();
        let mut messages: Vec<Message> = state
            .api
            .get_with_query(
                &format!("/chat/rooms/{}/messages", urlencoding::encode(room_id)),
                &query,
            )
            .await?;
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(messages)
    }

    pub async fn send_message(
        state: &AppState,
        room_id: &str,
        form: &MessageForm,
    ) -> Result<Message> {
        form.check()?;
        require_session(state)?;
        state
            .api
            .post(
                &format!("/chat/rooms/{}/messages", urlencoding::encode(room_id)),
                &form.to_payload(),
            )
            .await
    }
}
