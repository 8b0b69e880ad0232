use std::env;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub gemini: GeminiConfig,
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Missing keys are reported per request, not at startup.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind: var_or("SMARTTASK_BIND", DEFAULT_BIND),
            gemini: GeminiConfig {
                api_key: env::var("GOOGLE_GEMINI_API_KEY")
                    .ok()
                    .filter(|k| !k.trim().is_empty()),
                model: var_or("GEMINI_MODEL", DEFAULT_MODEL),
                api_base: var_or("GEMINI_API_BASE", DEFAULT_API_BASE),
            },
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
