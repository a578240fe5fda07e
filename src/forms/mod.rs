//! 表单校验
//!
//! 所有表单在提交前同步校验，失败时返回表单顺序中第一个出错字段的提示，
//! 并且不发出任何网络请求。

mod ai;
mod auth;
mod content;

use std::fmt;

use validator::{Validate, ValidationErrors};

pub use ai::{CodeGenerationForm, CodeInputForm, FixBugForm, ProjectIdeasForm, ResumeForm};
pub use auth::{ChangePasswordForm, ForgotPasswordForm, LoginForm, ProfileForm, RegisterForm};
pub use content::{MessageForm, PostForm, RoomForm, SnippetForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormError {
    pub field: String,
    pub message: String,
}

impl FormError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for FormError {}

/// 带字段顺序的表单
pub trait Form: Validate {
    /// 字段在页面上的顺序，决定先提示哪一个错误
    const FIELDS: &'static [&'static str];

    /// 必填项：(字段, 当前值, 提示)，按顺序检查，纯空白视为未填写
    fn required(&self) -> Vec<(&'static str, &str, &'static str)> {
        Vec::new()
    }

    /// 声明式规则之外的检查，例如两次密码是否一致
    fn extra_checks(&self) -> Vec<FormError> {
        Vec::new()
    }

    /// 逐个字段检查，同一字段依次看必填、声明式规则和额外检查
    fn check(&self) -> Result<(), FormError> {
        let missing: Vec<FormError> = self
            .required()
            .into_iter()
            .filter_map(|(field, value, message)| require(value, field, message).err())
            .collect();
        let invalid = self.validate().err();
        let extra = self.extra_checks();

        for field in Self::FIELDS {
            if let Some(err) = missing.iter().find(|e| e.field == *field) {
                return Err(err.clone());
            }
            if let Some(err) = invalid.as_ref().and_then(|errors| field_error(errors, field)) {
                return Err(err);
            }
            if let Some(err) = extra.iter().find(|e| e.field == *field) {
                return Err(err.clone());
            }
        }

        // 不在字段列表中的错误
        if let Some(err) = missing.into_iter().chain(extra).next() {
            return Err(err);
        }
        match invalid {
            Some(_) => Err(FormError::new("form", "Please check the form and try again.")),
            None => Ok(()),
        }
    }
}

fn field_error(errors: &ValidationErrors, field: &str) -> Option<FormError> {
    let err = errors.field_errors().get(field)?.first()?.clone();
    let message = err
        .message
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{} is invalid", field));
    Some(FormError::new(field, message))
}

/// 仅含空白字符的必填项
pub(crate) fn require(value: &str, field: &str, message: &str) -> Result<(), FormError> {
    if value.trim().is_empty() {
        Err(FormError::new(field, message))
    } else {
        Ok(())
    }
}

pub(crate) fn blank_to_none(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_error_follows_field_order() {
        let form = LoginForm {
            email: String::new(),
            password: "123".into(),
        };
        let err = form.check().unwrap_err();
        assert_eq!(err.field, "email");
        assert_eq!(err.message, "Email is required");
    }

    #[test]
    fn test_rule_errors_follow_field_order() {
        let form = RegisterForm {
            name: "Grace".into(),
            username: "grace hopper".into(),
            email: "not-an-email".into(),
            password: "cobol1959".into(),
            confirm_password: "cobol1959".into(),
        };
        assert_eq!(form.check().unwrap_err().field, "username");

        let form = SnippetForm {
            title: "Quicksort".into(),
            description: Some("x".repeat(600)),
            code: "   ".into(),
            language: "rust".into(),
            ..SnippetForm::default()
        };
        let err = form.check().unwrap_err();
        assert_eq!(err.field, "description");
        assert_eq!(err.message, "Description must be 500 characters or less");
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(&Some("  ".into())), None);
        assert_eq!(blank_to_none(&Some(" x ".into())), Some("x".into()));
    }
}
