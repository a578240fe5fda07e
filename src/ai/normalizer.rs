//! AI 回复归一化
//!
//! 上游 AI 接口的响应形态并不稳定。这里按优先级依次尝试一组形态识别器
//! （判断 + 提取），第一个命中的生效；全部落空时对原始文本做启发式分段。
//! 任何输入都会得到一个可展示的结果，不会返回错误。

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::api::schema::{AiResult, AiTool, CodeIssue, ResponseShape};

pub const EMPTY_RESPONSE_MESSAGE: &str = "The AI service returned an empty response.";

/// 嵌套负载中可能承载正文的字段
const PAYLOAD_KEYS: [&str; 5] = ["response", "content", "text", "result", "output"];
const TOP_LEVEL_KEYS: [&str; 5] = ["response", "result", "output", "content", "text"];
const ENVELOPE_KEYS: [&str; 5] = ["data", "response", "result", "content", "output"];
const STRUCTURED_KEYS: [&str; 6] = [
    "explanation",
    "fixedCode",
    "code",
    "suggestions",
    "issues",
    "improvements",
];

static LINE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bline\s+(\d+)").expect("hardcoded line regex is invalid - fix source code")
});

static LEADING_LINE_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\(?line\s+\d+\)?\s*[:\-]?\s*")
        .expect("hardcoded line prefix regex is invalid - fix source code")
});

static COMPLEXITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*[*_]*(?:time\s+)?complexity[*_]*\s*:\s*[*_]*\s*(.+?)\s*$")
        .expect("hardcoded complexity regex is invalid - fix source code")
});

enum Recognized {
    Text(String),
    Structured(AiResult),
}

struct ShapeRecognizer {
    shape: ResponseShape,
    recognize: fn(&Value) -> Option<Recognized>,
}

/// 识别顺序即优先级
const RECOGNIZERS: [ShapeRecognizer; 5] = [
    ShapeRecognizer {
        shape: ResponseShape::PlainText,
        recognize: plain_text,
    },
    ShapeRecognizer {
        shape: ResponseShape::NestedPayload,
        recognize: nested_payload,
    },
    ShapeRecognizer {
        shape: ResponseShape::SuccessEnvelope,
        recognize: success_envelope,
    },
    ShapeRecognizer {
        shape: ResponseShape::ChatCompletion,
        recognize: chat_completion,
    },
    ShapeRecognizer {
        shape: ResponseShape::StructuredFields,
        recognize: structured_fields,
    },
];

/// 将任意形态的回复整理为展示模型
pub fn normalize(body: &Value, tool: AiTool, original_code: Option<&str>) -> AiResult {
    for recognizer in &RECOGNIZERS {
        if let Some(recognized) = (recognizer.recognize)(body) {
            let mut result = match recognized {
                Recognized::Text(text) => from_text(text, tool),
                Recognized::Structured(result) => result,
            };
            result.shape = recognizer.shape;
            tracing::debug!("AI reply recognized as {:?}", recognizer.shape);
            return finish(result, tool, original_code);
        }
    }

    tracing::debug!("AI reply shape not recognized, segmenting raw text");
    let mut result = segment_text(&raw_text(body));
    result.shape = ResponseShape::Freeform;
    finish(result, tool, original_code)
}

fn plain_text(body: &Value) -> Option<Recognized> {
    body.as_str().map(|s| Recognized::Text(s.to_string()))
}

fn nested_payload(body: &Value) -> Option<Recognized> {
    let obj = body.as_object()?;
    let has_flag = obj.contains_key("success");

    if !has_flag {
        if let Some(text) = obj.get("data").and_then(Value::as_str) {
            return Some(Recognized::Text(text.to_string()));
        }
    }
    if let Some(data) = obj.get("data").and_then(Value::as_object) {
        if let Some(text) = first_string(data, &PAYLOAD_KEYS) {
            return Some(Recognized::Text(text));
        }
    }
    if !has_flag {
        return first_string(obj, &TOP_LEVEL_KEYS).map(Recognized::Text);
    }
    None
}

fn success_envelope(body: &Value) -> Option<Recognized> {
    let obj = body.as_object()?;
    match obj.get("success").and_then(Value::as_bool)? {
        true => first_string(obj, &ENVELOPE_KEYS).map(Recognized::Text),
        false => first_string(obj, &["message", "error"]).map(|message| {
            Recognized::Text(format!("The AI service reported an error: {}", message))
        }),
    }
}

fn chat_completion(body: &Value) -> Option<Recognized> {
    if let Some(choice) = body.pointer("/choices/0") {
        let text = choice
            .pointer("/message/content")
            .or_else(|| choice.get("text"))
            .and_then(Value::as_str)?;
        return Some(Recognized::Text(text.to_string()));
    }
    // Gemini 原生格式
    body.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .map(|text| Recognized::Text(text.to_string()))
}

fn structured_fields(body: &Value) -> Option<Recognized> {
    let obj = body.as_object()?;
    let fields = if STRUCTURED_KEYS.iter().any(|key| obj.contains_key(*key)) {
        obj
    } else {
        let data = obj.get("data")?.as_object()?;
        if !STRUCTURED_KEYS.iter().any(|key| data.contains_key(*key)) {
            return None;
        }
        data
    };

    let result = AiResult {
        explanation: first_string(fields, &["explanation", "summary", "analysis", "message"]),
        code: first_string(fields, &["fixedCode", "code", "generatedCode"]),
        suggestions: string_list(fields.get("suggestions")),
        issues: fields
            .get("issues")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(issue_from_value).collect())
            .unwrap_or_default(),
        improvements: string_list(fields.get("improvements")),
        complexity: first_string(fields, &["complexity"]),
        usage: first_string(fields, &["usage"]),
        notes: first_string(fields, &["notes"]),
        shape: ResponseShape::StructuredFields,
    };
    Some(Recognized::Structured(result))
}

fn from_text(text: String, tool: AiTool) -> AiResult {
    let code = if tool.produces_code() {
        first_fenced_block(&text)
    } else {
        None
    };
    AiResult {
        complexity: extract_complexity(&text),
        explanation: Some(text),
        code,
        ..AiResult::default()
    }
}

/// 兜底：代码回退为用户提交的原始代码，空结果给出固定提示
fn finish(mut result: AiResult, tool: AiTool, original_code: Option<&str>) -> AiResult {
    if result.code.as_deref().is_none_or(|c| c.trim().is_empty()) {
        result.code = match original_code {
            Some(code) if tool.produces_code() && !code.trim().is_empty() => Some(code.to_string()),
            _ => None,
        };
    }
    let has_explanation = result
        .explanation
        .as_deref()
        .is_some_and(|e| !e.trim().is_empty());
    if !has_explanation {
        result.explanation = if result.code.is_none() {
            Some(EMPTY_RESPONSE_MESSAGE.to_string())
        } else {
            None
        };
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Explanation,
    Code,
    Suggestions,
    Issues,
    Improvements,
}

/// 启发式分段：按标题切换模式，项目符号行归入对应列表，其余进入说明
pub fn segment_text(text: &str) -> AiResult {
    let mut mode = Mode::Explanation;
    let mut in_fence = false;
    let mut explanation: Vec<&str> = Vec::new();
    let mut code: Vec<&str> = Vec::new();
    let mut result = AiResult::default();

    for line in text.lines() {
        let trimmed = line.trim();

        if trimmed.starts_with("```") {
            if in_fence && !code.is_empty() {
                code.push("");
            }
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            code.push(line);
            continue;
        }
        if let Some(next) = heading_mode(trimmed) {
            mode = next;
            continue;
        }
        if COMPLEXITY.is_match(trimmed) && result.complexity.is_none() {
            result.complexity = extract_complexity(trimmed);
            continue;
        }

        match mode {
            Mode::Explanation => explanation.push(line),
            Mode::Code => code.push(line),
            Mode::Suggestions | Mode::Improvements | Mode::Issues => match strip_bullet(trimmed) {
                Some(item) if !item.is_empty() => match mode {
                    Mode::Suggestions => result.suggestions.push(item.to_string()),
                    Mode::Improvements => result.improvements.push(item.to_string()),
                    _ => result.issues.push(issue_from_text(item)),
                },
                _ if !trimmed.is_empty() => explanation.push(trimmed),
                _ => {}
            },
        }
    }

    result.explanation = non_empty(explanation.join("\n"));
    result.code = non_empty(code.join("\n"));
    result
}

fn heading_mode(line: &str) -> Option<Mode> {
    let looks_like_heading = line.starts_with('#')
        || (line.ends_with(':') && strip_bullet(line).is_none())
        || (line.starts_with("**") && line.ends_with("**"));
    if !looks_like_heading || line.chars().count() > 60 {
        return None;
    }

    let title = line
        .trim_start_matches('#')
        .trim_matches(|c: char| c == '*' || c == ':' || c == '_' || c.is_whitespace())
        .trim_start_matches(|c: char| c.is_ascii_digit() || c == '.' || c == ')')
        .trim()
        .to_lowercase();

    if matches!(title.as_str(), "code" | "fixed code" | "corrected code" | "updated code") {
        return Some(Mode::Code);
    }
    if ["explanation", "summary", "overview", "analysis"]
        .iter()
        .any(|k| title.contains(k))
    {
        return Some(Mode::Explanation);
    }
    if title.contains("improvement") {
        return Some(Mode::Improvements);
    }
    if ["suggestion", "recommendation", "tips", "project idea"]
        .iter()
        .any(|k| title.contains(k))
    {
        return Some(Mode::Suggestions);
    }
    if ["issue", "bug", "problem", "error"]
        .iter()
        .any(|k| title.contains(k))
    {
        return Some(Mode::Issues);
    }
    if ["fixed code", "corrected code", "solution", "generated code"]
        .iter()
        .any(|k| title.contains(k))
    {
        return Some(Mode::Code);
    }
    None
}

fn strip_bullet(line: &str) -> Option<&str> {
    for marker in ["- ", "* ", "• ", "+ "] {
        if let Some(rest) = line.strip_prefix(marker) {
            return Some(rest.trim());
        }
    }
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") ")) {
            return Some(rest.trim());
        }
    }
    None
}

fn issue_from_text(text: &str) -> CodeIssue {
    let line = LINE_REF
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok());
    let message = LEADING_LINE_REF.replace(text, "").trim().to_string();
    let lower = text.to_lowercase();
    let kind = if ["error", "bug", "crash", "panic", "exception"]
        .iter()
        .any(|k| lower.contains(k))
    {
        "error"
    } else if ["performance", "style", "consider"].iter().any(|k| lower.contains(k)) {
        "info"
    } else {
        "warning"
    };
    CodeIssue {
        kind: kind.to_string(),
        message: if message.is_empty() { text.to_string() } else { message },
        line,
    }
}

fn issue_from_value(value: &Value) -> Option<CodeIssue> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(issue_from_text(s.trim())),
        Value::Object(obj) => {
            let message = first_string(obj, &["message", "description", "issue"])?;
            let line = match obj.get("line") {
                Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
                Some(Value::String(s)) => s.trim().parse().ok(),
                _ => None,
            };
            let kind = first_string(obj, &["type", "severity"])
                .map(|k| k.to_lowercase())
                .unwrap_or_else(|| "warning".to_string());
            Some(CodeIssue { kind, message, line })
        }
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => non_empty(s.trim().to_string()),
                Value::Object(obj) => {
                    match (
                        first_string(obj, &["title", "name"]),
                        first_string(obj, &["description", "text", "message"]),
                    ) {
                        (Some(title), Some(desc)) => Some(format!("{}: {}", title, desc)),
                        (Some(only), None) | (None, Some(only)) => Some(only),
                        (None, None) => None,
                    }
                }
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => {
            let bullets: Vec<String> = s
                .lines()
                .filter_map(|l| strip_bullet(l.trim()))
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect();
            if bullets.is_empty() {
                non_empty(s.trim().to_string()).into_iter().collect()
            } else {
                bullets
            }
        }
        _ => Vec::new(),
    }
}

fn first_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| obj.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_fenced_block(text: &str) -> Option<String> {
    let mut lines = text.lines().skip_while(|l| !l.trim_start().starts_with("```"));
    lines.next()?;
    let block: Vec<&str> = lines
        .take_while(|l| !l.trim_start().starts_with("```"))
        .collect();
    non_empty(block.join("\n"))
}

fn extract_complexity(text: &str) -> Option<String> {
    COMPLEXITY
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_end_matches(['*', '_']).trim().to_string())
        .filter(|s| !s.is_empty())
}

fn raw_text(body: &Value) -> String {
    match body {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.trim_matches('\n').to_string())
    }
}
