use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_VAR: &str = "UPSTAGE_API_KEY";
pub const DEFAULT_API_URL: &str = "https://api.upstage.ai/v1/solar/chat/completions";
pub const DEFAULT_MODEL: &str = "solar-pro";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// 실행 환경 설정 (비밀 키, API 엔드포인트, 데이터 경로)
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub data_dir: PathBuf,
    pub request_timeout: Duration,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"***")
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("data_dir", &self.data_dir)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl AppConfig {
    /// 환경 변수에서 설정 로드
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 임의의 조회 함수로 설정 로드 (테스트에서 프로세스 환경 변수를 건드리지 않기 위함)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_VAR))?;

        let api_url = lookup("UPSTAGE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let model = lookup("UPSTAGE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let data_dir = lookup("GEC_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data"));

        let timeout_secs = match lookup("GEC_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::InvalidNumber {
                    name: "GEC_REQUEST_TIMEOUT_SECS",
                    value: raw,
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_key,
            api_url,
            model,
            data_dir,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} 환경 변수가 설정되지 않았습니다. .env 파일 또는 환경 변수를 확인하세요.")]
    MissingApiKey(&'static str),
    #[error("{name} 값이 올바른 숫자가 아닙니다: {value}")]
    InvalidNumber { name: &'static str, value: String },
    #[error("알 수 없는 템플릿입니다: {0}")]
    UnknownTemplate(String),
    #[error("실험 설정이 올바르지 않습니다: {0}")]
    InvalidExperiment(String),
}
