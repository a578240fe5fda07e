use serde::{Deserialize, Serialize};

/// AI 工具类型，对应代理路径 `/<provider>/<endpoint>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiTool {
    ExplainCode,
    FixBug,
    ReviewResume,
    SuggestProjects,
    GenerateCode,
}

impl AiTool {
    pub fn endpoint(&self) -> &'static str {
        match self {
            AiTool::ExplainCode => "explain",
            AiTool::FixBug => "fix-bug",
            AiTool::ReviewResume => "review-resume",
            AiTool::SuggestProjects => "project-suggestions",
            AiTool::GenerateCode => "generate-code",
        }
    }

    /// 回复中是否应当提取代码块
    pub fn produces_code(&self) -> bool {
        matches!(self, AiTool::FixBug | AiTool::GenerateCode)
    }
}

// 各工具请求体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplainCodeRequest {
    pub code: String,
    pub language: String,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FixBugRequest {
    pub code: String,
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeReviewRequest {
    pub resume_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_role: Option<String>,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSuggestionRequest {
    pub skills: Vec<String>,
    pub experience_level: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeGenerationRequest {
    pub description: String,
    pub language: String,
    pub prompt: String,
}

// API 密钥保存请求
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyRequest {
    pub api_key: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyStatus {
    #[serde(default, alias = "hasApiKey")]
    pub configured: bool,
    #[serde(default)]
    pub masked_key: Option<String>,
}

/// 代码问题条目
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CodeIssue {
    #[serde(rename = "type", default = "default_issue_type")]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub line: Option<u32>,
}

fn default_issue_type() -> String {
    "warning".to_string()
}

/// 识别出的响应形态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseShape {
    PlainText,
    NestedPayload,
    SuccessEnvelope,
    ChatCompletion,
    StructuredFields,
    #[default]
    Freeform,
}

/// AI 工具结果的展示模型
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AiResult {
    pub explanation: Option<String>,
    #[serde(rename = "fixedCode")]
    pub code: Option<String>,
    pub suggestions: Vec<String>,
    pub issues: Vec<CodeIssue>,
    pub improvements: Vec<String>,
    pub complexity: Option<String>,
    pub usage: Option<String>,
    pub notes: Option<String>,
    #[serde(skip)]
    pub shape: ResponseShape,
}

/// 可复制的结果区块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSection {
    Explanation,
    Code,
    Suggestions,
    Issues,
    Improvements,
}

impl AiResult {
    pub fn has_content(&self) -> bool {
        self.explanation.as_deref().is_some_and(|e| !e.is_empty())
            || self.code.as_deref().is_some_and(|c| !c.is_empty())
    }

    /// 某个区块在页面上显示的文本，复制按钮原样使用
    pub fn section_text(&self, section: ResultSection) -> Option<String> {
        let text = match section {
            ResultSection::Explanation => self.explanation.clone()?,
            ResultSection::Code => self.code.clone()?,
            ResultSection::Suggestions => bullet_list(&self.suggestions)?,
            ResultSection::Improvements => bullet_list(&self.improvements)?,
            ResultSection::Issues => {
                if self.issues.is_empty() {
                    return None;
                }
                self.issues
                    .iter()
                    .map(|issue| match issue.line {
                        Some(line) => format!("[{}] line {}: {}", issue.kind, line, issue.message),
                        None => format!("[{}] {}", issue.kind, issue.message),
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            }
        };
        Some(text)
    }
}

fn bullet_list(items: &[String]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    Some(
        items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
