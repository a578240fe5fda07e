use validator::Validate;

use super::{blank_to_none, Form};
use crate::utils::parse_tags;

// 代码解释输入
#[derive(Debug, Clone, Default, Validate)]
pub struct CodeInputForm {
    #[validate(length(max = 20000, message = "Code is too long (max 20000 characters)"))]
    pub code: String,
    pub language: String,
}

impl Form for CodeInputForm {
    const FIELDS: &'static [&'static str] = &["code", "language"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("code", self.code.as_str(), "Please enter some code"),
            ("language", self.language.as_str(), "Please select a language"),
        ]
    }
}

// 错误修复输入
#[derive(Debug, Clone, Default, Validate)]
pub struct FixBugForm {
    #[validate(length(max = 20000, message = "Code is too long (max 20000 characters)"))]
    pub code: String,
    pub language: String,
    pub error_message: Option<String>,
}

impl Form for FixBugForm {
    const FIELDS: &'static [&'static str] = &["code", "language", "error_message"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("code", self.code.as_str(), "Please enter the code you want fixed"),
            ("language", self.language.as_str(), "Please select a language"),
        ]
    }
}

impl FixBugForm {
    pub fn error_message(&self) -> Option<String> {
        blank_to_none(&self.error_message)
    }
}

// 简历审阅输入
#[derive(Debug, Clone, Default, Validate)]
pub struct ResumeForm {
    #[validate(length(min = 50, message = "Resume looks too short to review"))]
    pub resume_text: String,
    pub target_role: Option<String>,
}

impl Form for ResumeForm {
    const FIELDS: &'static [&'static str] = &["resume_text", "target_role"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![("resume_text", self.resume_text.as_str(), "Please paste your resume")]
    }
}

// 项目建议输入
#[derive(Debug, Clone, Default, Validate)]
pub struct ProjectIdeasForm {
    /// 逗号分隔的技能
    pub skills: String,
    pub experience_level: String,
    pub interests: String,
}

impl Form for ProjectIdeasForm {
    const FIELDS: &'static [&'static str] = &["skills", "experience_level", "interests"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("skills", self.skills.as_str(), "Please list at least one skill"),
            (
                "experience_level",
                self.experience_level.as_str(),
                "Please choose your experience level",
            ),
        ]
    }
}

impl ProjectIdeasForm {
    pub fn skill_list(&self) -> Vec<String> {
        parse_tags(&self.skills)
    }

    pub fn interest_list(&self) -> Vec<String> {
        parse_tags(&self.interests)
    }
}

// 代码生成输入
#[derive(Debug, Clone, Default, Validate)]
pub struct CodeGenerationForm {
    #[validate(length(max = 2000, message = "Description must be 2000 characters or less"))]
    pub description: String,
    pub language: String,
}

impl Form for CodeGenerationForm {
    const FIELDS: &'static [&'static str] = &["description", "language"];

    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        vec![
            ("description", self.description.as_str(), "Describe what the code should do"),
            ("language", self.language.as_str(), "Please select a language"),
        ]
    }
}
