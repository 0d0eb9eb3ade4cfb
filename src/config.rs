use anyhow::{bail, Result};
use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub summarizer: SummarizerConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root under which every request gets its own directory
    pub work_dir: PathBuf,
    /// Leave request directories on disk after the response (debugging aid)
    pub keep_artifacts: bool,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerProvider {
    HuggingFace,
    Extractive,
}

impl SummarizerProvider {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "extractive" => Ok(Self::Extractive),
            other => bail!("Unsupported summarizer provider: {}", other),
        }
    }
}

impl std::fmt::Display for SummarizerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizerProvider::HuggingFace => write!(f, "huggingface"),
            SummarizerProvider::Extractive => write!(f, "extractive"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummarizerConfig {
    pub provider: SummarizerProvider,
    pub api_base: String,
    pub model: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    pub logo_path: PathBuf,
    pub title: String,
}

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
pub const DEFAULT_HF_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_HF_MODEL: &str = "facebook/bart-large-cnn";
pub const DEFAULT_REPORT_TITLE: &str = "MGM's College Of Engineering";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig {
                port: env::var("PORT")
                    .unwrap_or_else(|_| "5000".to_string())
                    .parse()?,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            },
            storage: StorageConfig {
                work_dir: env::var("WORK_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("uploads")),
                keep_artifacts: env::var("KEEP_ARTIFACTS")
                    .unwrap_or_else(|_| "false".to_string())
                    .parse()?,
                max_upload_bytes: match env::var("MAX_UPLOAD_BYTES") {
                    Ok(v) => v.parse()?,
                    Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
                },
            },
            summarizer: SummarizerConfig {
                provider: SummarizerProvider::parse(
                    &env::var("SUMMARIZER_PROVIDER").unwrap_or_else(|_| "huggingface".to_string()),
                )?,
                api_base: env::var("HF_API_BASE").unwrap_or_else(|_| DEFAULT_HF_API_BASE.to_string()),
                model: env::var("HF_MODEL").unwrap_or_else(|_| DEFAULT_HF_MODEL.to_string()),
                api_token: env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty()),
                timeout_secs: env::var("SUMMARIZER_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "120".to_string())
                    .parse()?,
            },
            report: ReportConfig {
                logo_path: env::var("LOGO_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("static/mgmLogo.png")),
                title: env::var("REPORT_TITLE").unwrap_or_else(|_| DEFAULT_REPORT_TITLE.to_string()),
            },
        })
    }
}
