use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};

use crate::api::schema::{AiResult, ResultSection, Snippet};
use crate::error::{ClientError, Result};

pub trait Clipboard: Send + Sync {
    fn set_text(&self, text: &str) -> Result<()>;
    fn text(&self) -> Result<Option<String>>;
}

/// 进程内剪贴板
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }

    fn text(&self) -> Result<Option<String>> {
        Ok(self
            .contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// 通过系统剪贴板命令写入（wl-copy / xclip / pbcopy），只写不读
#[derive(Debug, Clone)]
pub struct SystemClipboard {
    program: String,
    args: Vec<String>,
}

impl SystemClipboard {
    pub fn detect() -> Option<Self> {
        let candidates: [(&str, &[&str]); 3] = [
            ("wl-copy", &[]),
            ("xclip", &["-selection", "clipboard"]),
            ("pbcopy", &[]),
        ];
        candidates
            .iter()
            .find(|(program, _)| {
                Command::new("which")
                    .arg(program)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .status()
                    .is_ok_and(|s| s.success())
            })
            .map(|(program, args)| SystemClipboard {
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string()).collect(),
            })
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&self, text: &str) -> Result<()> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .spawn()
            .map_err(|e| ClientError::Storage(format!("failed to run {}: {}", self.program, e)))?;
        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| ClientError::Storage(e.to_string()))?;
        }
        let status = child
            .wait()
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        if !status.success() {
            return Err(ClientError::Storage(format!(
                "{} exited with {}",
                self.program, status
            )));
        }
        Ok(())
    }

    fn text(&self) -> Result<Option<String>> {
        Ok(None)
    }
}

/// 原样复制页面上显示的文本
pub fn copy_to_clipboard(clipboard: &dyn Clipboard, text: &str) -> Result<()> {
    clipboard.set_text(text)?;
    tracing::debug!("Copied {} bytes to clipboard", text.len());
    Ok(())
}

/// 复制结果区块，区块为空时返回 false
pub fn copy_section(
    clipboard: &dyn Clipboard,
    result: &AiResult,
    section: ResultSection,
) -> Result<bool> {
    match result.section_text(section) {
        Some(text) => copy_to_clipboard(clipboard, &text).map(|_| true),
        None => Ok(false),
    }
}

pub fn copy_snippet(clipboard: &dyn Clipboard, snippet: &Snippet) -> Result<()> {
    copy_to_clipboard(clipboard, &snippet.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_copy_is_byte_for_byte() {
        let clipboard = MemoryClipboard::new();
        let code = "fn main() {\r\n\tprintln!(\"héllo 🦀\");  \n}\n\n";
        let snippet = Snippet {
            code: code.to_string(),
            ..Snippet::default()
        };
        copy_snippet(&clipboard, &snippet).unwrap();
        assert_eq!(clipboard.text().unwrap().as_deref(), Some(code));
    }

    #[test]
    fn test_copy_section_uses_displayed_text() {
        let clipboard = MemoryClipboard::new();
        let result = AiResult {
            suggestions: vec!["Use clippy".into(), "Add tests".into()],
            ..AiResult::default()
        };
        assert!(copy_section(&clipboard, &result, ResultSection::Suggestions).unwrap());
        assert_eq!(
            clipboard.text().unwrap().as_deref(),
            Some("- Use clippy\n- Add tests")
        );

        assert!(!copy_section(&clipboard, &result, ResultSection::Code).unwrap());
        assert_eq!(
            clipboard.text().unwrap().as_deref(),
            Some("- Use clippy\n- Add tests")
        );
    }
}
