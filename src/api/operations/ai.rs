// AI 工具：格式化提示词，经后端代理转发，再整理回复

use serde::Serialize;

use super::require_session;
use crate::AppState;
use crate::ai::{normalize, prompts};
use crate::api::schema::{
    AiResult, AiTool, ApiKeyRequest, ApiKeyStatus, CodeGenerationRequest, ExplainCodeRequest,
    FixBugRequest, ProjectSuggestionRequest, ResumeReviewRequest,
};
use crate::error::Result;
use crate::forms::{
    CodeGenerationForm, CodeInputForm, FixBugForm, Form, FormError, ProjectIdeasForm, ResumeForm,
};

pub struct AiOperations;

impl AiOperations {
    pub async fn explain_code(state: &AppState, form: &CodeInputForm) -> Result<AiResult> {
        form.check()?;
        require_session(state)?;
        let request = ExplainCodeRequest {
            code: form.code.clone(),
            language: form.language.clone(),
            prompt: prompts::explain_code(&form.language, &form.code),
        };
        ask(state, AiTool::ExplainCode, &request, Some(&form.code)).await
    }

    /// 回复中没有代码块时，结果里的代码回退为用户提交的原始代码
    pub async fn fix_bug(state: &AppState, form: &FixBugForm) -> Result<AiResult> {
        form.check()?;
        require_session(state)?;
        let error_message = form.error_message();
        let request = FixBugRequest {
            code: form.code.clone(),
            language: form.language.clone(),
            prompt: prompts::fix_bug(&form.language, &form.code, error_message.as_deref()),
            error_message,
        };
        ask(state, AiTool::FixBug, &request, Some(&form.code)).await
    }

    pub async fn review_resume(state: &AppState, form: &ResumeForm) -> Result<AiResult> {
        form.check()?;
        require_session(state)?;
        let target_role = crate::forms::blank_to_none(&form.target_role);
        let request = ResumeReviewRequest {
            resume_text: form.resume_text.trim().to_string(),
            prompt: prompts::review_resume(form.resume_text.trim(), target_role.as_deref()),
            target_role,
        };
        ask(state, AiTool::ReviewResume, &request, None).await
    }

    pub async fn suggest_projects(state: &AppState, form: &ProjectIdeasForm) -> Result<AiResult> {
        form.check()?;
        let skills = form.skill_list();
        if skills.is_empty() {
            return Err(FormError::new("skills", "Please list at least one skill").into());
        }
        require_session(state)?;
        let interests = form.interest_list();
        let request = ProjectSuggestionRequest {
            prompt: prompts::suggest_projects(&skills, &form.experience_level, &interests),
            skills,
            experience_level: form.experience_level.clone(),
            interests,
        };
        ask(state, AiTool::SuggestProjects, &request, None).await
    }

    pub async fn generate_code(state: &AppState, form: &CodeGenerationForm) -> Result<AiResult> {
        form.check()?;
        require_session(state)?;
        let request = CodeGenerationRequest {
            description: form.description.trim().to_string(),
            language: form.language.clone(),
            prompt: prompts::generate_code(&form.language, form.description.trim()),
        };
        ask(state, AiTool::GenerateCode, &request, None).await
    }

    pub async fn save_api_key(state: &AppState, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(FormError::new("api_key", "Please enter an API key").into());
        }
        require_session(state)?;
        let path = format!("/{}/api-key", state.config.ai_provider.path_segment());
        state
            .api
            .post_ack(
                &path,
                &ApiKeyRequest {
                    api_key: api_key.to_string(),
                },
            )
            .await?;
        tracing::info!("Saved {} API key", state.config.ai_provider.path_segment());
        Ok(())
    }

    pub async fn remove_api_key(state: &AppState) -> Result<()> {
        require_session(state)?;
        let path = format!("/{}/api-key", state.config.ai_provider.path_segment());
        state.api.delete(&path).await
    }

    pub async fn api_key_status(state: &AppState) -> Result<ApiKeyStatus> {
        require_session(state)?;
        let path = format!("/{}/api-key/status", state.config.ai_provider.path_segment());
        state.api.get(&path).await
    }
}

async fn ask<B: Serialize>(
    state: &AppState,
    tool: AiTool,
    request: &B,
    original_code: Option<&str>,
) -> Result<AiResult> {
    let path = format!(
        "/{}/{}",
        state.config.ai_provider.path_segment(),
        tool.endpoint()
    );
    tracing::info!("Sending {} request to AI proxy", tool.endpoint());
    let body = state.api.post_raw(&path, request).await?;
    Ok(normalize(&body, tool, original_code))
}
