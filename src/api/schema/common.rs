use serde::{Deserialize, Serialize};

// 帖子、代码片段、消息共用的作者摘要
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(alias = "_id", default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Author {
    /// 展示用名称，缺少姓名时退回用户名
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.username
        } else {
            &self.name
        }
    }
}

// 列表查询参数
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub search: Option<String>,
    pub tag: Option<String>,
    pub author: Option<String>,
    pub language: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_page(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// 转为查询字符串键值对，空值不下发
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let text_fields = [
            ("search", &self.search),
            ("tag", &self.tag),
            ("author", &self.author),
            ("language", &self.language),
        ];
        for (name, value) in text_fields {
            if let Some(value) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
                pairs.push((name, value.to_string()));
            }
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_skip_blank_values() {
        let query = ListQuery {
            search: Some("  ".into()),
            ..ListQuery::search("rust")
        }
        .with_tag("async")
        .with_page(2, 20);
        assert_eq!(
            query.to_pairs(),
            vec![
                ("tag", "async".to_string()),
                ("page", "2".to_string()),
                ("limit", "20".to_string()),
            ]
        );
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        let author = Author {
            username: "ferris".into(),
            ..Author::default()
        };
        assert_eq!(author.display_name(), "ferris");
    }
}
