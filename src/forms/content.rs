use validator::Validate;

use super::{blank_to_none, Form, FormError};
use crate::api::schema::{MessagePayload, PostPayload, RoomPayload, SnippetPayload, Visibility};
use crate::utils::parse_tags;

const MAX_TAGS: usize = 5;

#[derive(Debug, Clone, Default, Validate)]
pub struct PostForm {
    #[validate(length(max = 150, message = "Title must be 150 characters or less"))]
    pub title: String,
    pub content: String,
    /// 逗号分隔的原始输入
    pub tags: String,
    pub published: bool,
}

impl Form for PostForm {
    const FIELDS: &'static [&'static str] = &["title", "content", "tags"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("title", self.title.as_str(), "Title is required"),
            ("content", self.content.as_str(), "Content is required"),
        ]
    }

    fn extra_checks(&self) -> Vec<FormError> {
        check_tag_count(&self.tags).err().into_iter().collect()
    }
}

impl PostForm {
    pub fn to_payload(&self) -> PostPayload {
        PostPayload {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            tags: parse_tags(&self.tags),
            published: self.published,
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct SnippetForm {
    #[validate(length(max = 100, message = "Title must be 100 characters or less"))]
    pub title: String,
    #[validate(length(max = 500, message = "Description must be 500 characters or less"))]
    pub description: Option<String>,
    pub code: String,
    pub language: String,
    pub tags: String,
    pub visibility: Visibility,
}

impl Form for SnippetForm {
    const FIELDS: &'static [&'static str] = &["title", "description", "code", "language", "tags"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("title", self.title.as_str(), "Title is required"),
            ("code", self.code.as_str(), "Code is required"),
            ("language", self.language.as_str(), "Please select a language"),
        ]
    }

    fn extra_checks(&self) -> Vec<FormError> {
        check_tag_count(&self.tags).err().into_iter().collect()
    }
}

impl SnippetForm {
    pub fn to_payload(&self) -> SnippetPayload {
        SnippetPayload {
            title: self.title.trim().to_string(),
            description: blank_to_none(&self.description),
            code: self.code.clone(),
            language: self.language.trim().to_lowercase(),
            tags: parse_tags(&self.tags),
            visibility: self.visibility,
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RoomForm {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Room name must be between 3 and 50 characters"
    ))]
    pub name: String,
    pub description: Option<String>,
    pub is_private: bool,
}

impl Form for RoomForm {
    const FIELDS: &'static [&'static str] = &["name"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![("name", self.name.as_str(), "Room name is required")]
    }
}

impl RoomForm {
    pub fn to_payload(&self) -> RoomPayload {
        RoomPayload {
            name: self.name.trim().to_string(),
            description: blank_to_none(&self.description),
            is_private: self.is_private,
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct MessageForm {
    #[validate(length(max = 2000, message = "Message must be 2000 characters or less"))]
    pub content: String,
}

impl Form for MessageForm {
    const FIELDS: &'static [&'static str] = &["content"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![("content", self.content.as_str(), "Message cannot be empty")]
    }
}

impl MessageForm {
    pub fn to_payload(&self) -> MessagePayload {
        MessagePayload {
            content: self.content.trim().to_string(),
        }
    }
}

fn check_tag_count(raw: &str) -> Result<(), FormError> {
    if parse_tags(raw).len() > MAX_TAGS {
        Err(FormError::new(
            "tags",
            format!("Use at most {} tags", MAX_TAGS),
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_requires_title_and_content() {
        let form = PostForm {
            title: "  ".into(),
            content: "body".into(),
            ..PostForm::default()
        };
        let err = form.check().unwrap_err();
        assert_eq!(err.field, "title");
        assert_eq!(err.message, "Title is required");

        let form = PostForm {
            title: "Lifetimes".into(),
            ..PostForm::default()
        };
        assert_eq!(form.check().unwrap_err().field, "content");
    }

    #[test]
    fn test_post_form_limits_tags() {
        let form = PostForm {
            title: "Tags".into(),
            content: "x".into(),
            tags: "a,b,c,d,e,f".into(),
            published: true,
        };
        assert_eq!(form.check().unwrap_err().field, "tags");
    }

    #[test]
    fn test_snippet_payload_normalizes_input() {
        let form = SnippetForm {
            title: " Binary search ".into(),
            description: Some(String::new()),
            code: "fn main() {}".into(),
            language: "Rust".into(),
            tags: "algorithms, Search".into(),
            visibility: Visibility::Private,
        };
        assert!(form.check().is_ok());
        let payload = form.to_payload();
        assert_eq!(payload.title, "Binary search");
        assert_eq!(payload.description, None);
        assert_eq!(payload.language, "rust");
        assert_eq!(payload.tags, vec!["algorithms", "search"]);
    }

    #[test]
    fn test_message_form_rejects_whitespace() {
        let form = MessageForm {
            content: " \n ".into(),
        };
        assert!(form.check().is_err());
    }

    #[test]
    fn test_room_name_length() {
        let form = RoomForm {
            name: "ab".into(),
            ..RoomForm::default()
        };
        assert_eq!(form.check().unwrap_err().field, "name");
    }
}
