use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::ai::prompt::TemplateError;

/// 애플리케이션 전역 에러 타입
#[derive(Debug, Error)]
pub enum AppError {
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),

    #[error("파일 입출력 실패: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV 처리 실패: {0}")]
    Csv(#[from] csv::Error),

    #[error("프롬프트 템플릿 오류: {0}")]
    Template(#[from] TemplateError),

    /// 2xx 이외의 HTTP 응답
    #[error("API 호출 실패 (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// 타임아웃, 연결 실패 등 응답을 받지 못한 경우
    #[error("API 요청 전송 실패: {message}")]
    ApiTransport { message: String, timeout: bool },

    #[error("API 응답 형식이 올바르지 않습니다: {0}")]
    MalformedResponse(String),

    #[error("형태소 분석 실패: {0}")]
    Tagger(String),

    #[error("체크포인트 처리 실패: {0}")]
    Checkpoint(String),

    #[error("잘못된 입력입니다: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// 재시도하면 성공할 수 있는 일시적 오류인지 판단
    ///
    /// Rate limit(429), 서버 에러(5xx), 타임아웃/연결 실패만 재시도 대상입니다.
    /// 인증 오류나 요청 형식 오류는 즉시 실패합니다.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Api { status, .. } => *status == 429 || (500..=599).contains(status),
            AppError::ApiTransport { .. } => true,
            _ => false,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        AppError::InvalidInput(msg.into())
    }

    pub fn malformed_response(msg: impl Into<String>) -> Self {
        AppError::MalformedResponse(msg.into())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => AppError::Api {
                status: status.as_u16(),
                message: error.to_string(),
            },
            None if error.is_decode() => AppError::MalformedResponse(error.to_string()),
            None => AppError::ApiTransport {
                timeout: error.is_timeout(),
                message: error.to_string(),
            },
        }
    }
}
