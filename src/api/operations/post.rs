// 博客文章操作

use super::require_session;
use crate::AppState;
use crate::api::schema::{Comment, CommentPayload, LikeResponse, ListQuery, Post};
use crate::error::Result;
use crate::forms::{Form, FormError, PostForm};

pub struct PostOperations;

impl PostOperations {
    pub async fn list(state: &AppState, query: &ListQuery) -> Result<Vec<Post>> {
        state.api.get_with_query("/posts", &query.to_pairs()).await
    }

    pub async fn get(state: &AppState, id: &str) -> Result<Post> {
        state.api.get(&format!("/posts/{}", urlencoding::encode(id))).await
    }

    pub async fn create(state: &AppState, form: &PostForm) -> Result<Post> {
        form.check()?;
        require_session(state)?;
        let post: Post = state.api.post("/posts", &form.to_payload()).await?;
        tracing::info!("Created post {}", post.id);
        Ok(post)
    }

    pub async fn update(state: &AppState, id: &str, form: &PostForm) -> Result<Post> {
        form.check()?;
        require_session(state)?;
        state
            .api
            .put(&format!("/posts/{}", urlencoding::encode(id)), &form.to_payload())
            .await
    }

    pub async fn delete(state: &AppState, id: &str) -> Result<()> {
        require_session(state)?;
        state.api.delete(&format!("/posts/{}", urlencoding::encode(id))).await?;
        tracing::info!("Deleted post {}", id);
        Ok(())
    }

    pub async fn like(state: &AppState, id: &str) -> Result<LikeResponse> {
        require_session(state)?;
        state
            .api
            .post(&format!("/posts/{}/like", urlencoding::encode(id)), &serde_json::json!({}))
            .await
    }

    pub async fn comments(state: &AppState, id: &str) -> Result<Vec<Comment>> {
        state
            .api
            .get(&format!("/posts/{}/comments", urlencoding::encode(id)))
            .await
    }

    pub async fn add_comment(state: &AppState, id: &str, content: &str) -> Result<Comment> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FormError::new("content", "Comment cannot be empty").into());
        }
        require_session(state)?;
        state
            .api
            .post(
                &format!("/posts/{}/comments", urlencoding::encode(id)),
                &CommentPayload {
                    content: content.to_string(),
                },
            )
            .await
    }
}
