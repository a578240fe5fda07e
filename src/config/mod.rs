use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{ClientError, Result};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_STORAGE_PATH: &str = ".devhub/local_storage.json";

/// AI 代理提供方，对应后端的 `/gemini/*` 与 `/deepseek/*`
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    Gemini,
    DeepSeek,
}

impl AiProvider {
    pub fn path_segment(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini",
            AiProvider::DeepSeek => "deepseek",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "gemini" => Some(AiProvider::Gemini),
            "deepseek" => Some(AiProvider::DeepSeek),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub api_base_url: String,
    pub storage_path: PathBuf,
    pub demo_mode: bool,
    pub search_debounce_ms: u64,
    pub search_min_chars: usize,
    pub ai_provider: AiProvider,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: DEFAULT_API_URL.to_string(),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            demo_mode: true,
            search_debounce_ms: 300,
            search_min_chars: 2,
            ai_provider: AiProvider::Gemini,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源构建配置，缺省项使用默认值
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let api_base_url = lookup("DEVHUB_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_base_url);
        let storage_path = lookup("DEVHUB_STORAGE_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_path);
        let demo_mode = match lookup("DEVHUB_DEMO_MODE") {
            Some(raw) => parse_bool(&raw).ok_or_else(|| {
                ClientError::Config(format!("DEVHUB_DEMO_MODE is not a boolean: {}", raw))
            })?,
            None => defaults.demo_mode,
        };
        let search_debounce_ms = match lookup("DEVHUB_SEARCH_DEBOUNCE_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ClientError::Config(format!("DEVHUB_SEARCH_DEBOUNCE_MS: {}", e))
            })?,
            None => defaults.search_debounce_ms,
        };
        let search_min_chars = match lookup("DEVHUB_SEARCH_MIN_CHARS") {
            Some(raw) => raw.trim().parse::<usize>().map_err(|e| {
                ClientError::Config(format!("DEVHUB_SEARCH_MIN_CHARS: {}", e))
            })?,
            None => defaults.search_min_chars,
        };
        let ai_provider = match lookup("DEVHUB_AI_PROVIDER") {
            Some(raw) => AiProvider::parse(&raw).ok_or_else(|| {
                ClientError::Config(format!("unknown AI provider: {}", raw))
            })?,
            None => defaults.ai_provider,
        };

        Ok(Config {
            api_base_url,
            storage_path,
            demo_mode,
            search_debounce_ms,
            search_min_chars,
            ai_provider,
        })
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
