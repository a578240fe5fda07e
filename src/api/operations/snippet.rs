// 代码片段操作

use super::require_session;
use crate::AppState;
use crate::api::schema::{LikeResponse, ListQuery, Snippet};
use crate::error::Result;
use crate::forms::{Form, SnippetForm};

pub struct SnippetOperations;

impl SnippetOperations {
    pub async fn list(state: &AppState, query: &ListQuery) -> Result<Vec<Snippet>> {
        state.api.get_with_query("/snippets", &query.to_pairs()).await
    }

    pub async fn get(state: &AppState, id: &str) -> Result<Snippet> {
        state.api.get(&format!("/snippets/{}", urlencoding::encode(id))).await
    }

    pub async fn create(state: &AppState, form: &SnippetForm) -> Result<Snippet> {
        form.check()?;
        require_session(state)?;
        let snippet: Snippet = state.api.post("/snippets", &form.to_payload()).await?;
        tracing::info!("Created snippet {} ({})", snippet.id, snippet.language);
        Ok(snippet)
    }

    pub async fn update(state: &AppState, id: &str, form: &SnippetForm) -> Result<Snippet> {
        form.check()?;
        require_session(state)?;
        state
            .api
            .put(&format!("/snippets/{}", urlencoding::encode(id)), &form.to_payload())
            .await
    }

    pub async fn delete(state: &AppState, id: &str) -> Result<()> {
        require_session(state)?;
        state.api.delete(&format!("/snippets/{}", urlencoding::encode(id))).await
    }

    pub async fn like(state: &AppState, id: &str) -> Result<LikeResponse> {
        require_session(state)?;
        state
            .api
            .post(
                &format!("/snippets/{}/like", urlencoding::encode(id)),
                &serde_json::json!({}),
            )
            .await
    }
}
