// 各 AI 工具发往代理的提示词

pub fn explain_code(language: &str, code: &str) -> String {
    format!(
        "Explain the following {language} code in plain language. \
         Describe what it does step by step, mention the time complexity, \
         and list any potential issues.\n\n```{language}\n{code}\n```"
    )
}

pub fn fix_bug(language: &str, code: &str, error_message: Option<&str>) -> String {
    let error_section = match error_message {
        Some(error) => format!("\n\nThe code fails with this error:\n{error}"),
        None => String::new(),
    };
    format!(
        "Find and fix the bugs in the following {language} code.{error_section}\n\n\
         ```{language}\n{code}\n```\n\n\
         Respond with an Explanation section, an Issues section listing each problem \
         (mention the line number), and a Fixed Code section containing the complete corrected code."
    )
}

pub fn review_resume(resume: &str, target_role: Option<&str>) -> String {
    let role = target_role
        .map(|r| format!(" for a {r} position"))
        .unwrap_or_default();
    format!(
        "Review this developer resume{role}. Give a short overall assessment, \
         then a Suggestions section and an Improvements section as bullet lists.\n\n{resume}"
    )
}

pub fn suggest_projects(skills: &[String], level: &str, interests: &[String]) -> String {
    let interests = if interests.is_empty() {
        String::new()
    } else {
        format!(" They are interested in {}.", interests.join(", "))
    };
    format!(
        "Suggest portfolio projects for a {level} developer who knows {}.{interests} \
         List each idea as a bullet under a Project Ideas heading with a one-line description.",
        skills.join(", ")
    )
}

pub fn generate_code(language: &str, description: &str) -> String {
    format!(
        "Write {language} code that does the following:\n{description}\n\n\
         Return the code in a single fenced block, followed by a short usage note."
    )
}
