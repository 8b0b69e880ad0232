use std::env;
use std::path::PathBuf;

use url::Url;

const DEFAULT_PROXY_URL: &str = "http://localhost:3000/api/gemini";
const DEFAULT_DATA_FILE: &str = "tasks.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub proxy_url: Url,
    pub data_file: PathBuf,
    pub log_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, url::ParseError> {
        let proxy_url = non_empty("SMARTTASK_PROXY_URL");
        let proxy_url = Url::parse(proxy_url.as_deref().unwrap_or(DEFAULT_PROXY_URL))?;

        Ok(Self {
            proxy_url,
            data_file: non_empty("SMARTTASK_DATA_FILE")
                .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())
                .into(),
            log_file: non_empty("SMARTTASK_LOG_FILE").map(PathBuf::from),
        })
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
