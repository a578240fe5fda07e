use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::Author;

// 博客文章
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub author: Author,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub comments_count: u64,
    #[serde(default = "default_published")]
    pub published: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_published() -> bool {
    true
}

/// 列表页正文预览的字符数
pub const SUMMARY_CHARS: usize = 160;

impl Post {
    /// 列表页摘要，没有摘要时截取正文
    pub fn summary(&self, max_chars: usize) -> String {
        match self.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
            Some(excerpt) => excerpt.to_string(),
            None => crate::utils::truncate_chars(&self.content, max_chars),
        }
    }
}

// 创建/编辑文章请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPayload {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub published: bool,
}

// 评论
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub author: Author,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentPayload {
    pub content: String,
}

// 点赞响应
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub likes: u64,
    #[serde(default)]
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_prefers_excerpt() {
        let post = Post {
            content: "Long body text".into(),
            excerpt: Some("Short".into()),
            ..Post::default()
        };
        assert_eq!(post.summary(4), "Short");

        let post = Post {
            content: "Ownership and borrowing".into(),
            ..Post::default()
        };
        assert_eq!(post.summary(9), "Ownership...");
    }

    #[test]
    fn test_list_preview_keeps_160_chars() {
        let post = Post {
            content: "a".repeat(200),
            ..Post::default()
        };
        let preview = post.summary(SUMMARY_CHARS);
        assert_eq!(preview, format!("{}...", "a".repeat(160)));
    }
}
