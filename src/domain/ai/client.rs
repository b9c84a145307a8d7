use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::debug;

use super::dto::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};
use crate::config::{AppConfig, ExperimentConfig};
use crate::utils::{AppError, Result};

/// 에러 메시지에 담을 응답 본문 최대 길이 (문자 수)
const ERROR_BODY_LIMIT: usize = 300;

/// 프롬프트 하나를 보내고 모델의 응답 텍스트를 받는 클라이언트
///
/// 테스트에서는 Mock 객체나 가짜 구현으로 대체합니다.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<C: CompletionClient + ?Sized> CompletionClient for Arc<C> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

#[async_trait]
impl<C: CompletionClient + ?Sized> CompletionClient for Box<C> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}

/// Upstage(OpenAI 호환) chat completion API 클라이언트
pub struct UpstageClient {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: Option<f32>,
}

impl UpstageClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url: api_url.into(),
            api_key: api_key.into(),
            model: model.into(),
            temperature: None,
        })
    }

    /// 비밀 키와 타임아웃은 환경 설정에서, 엔드포인트/모델/temperature는 실험 설정에서 가져옵니다.
    pub fn from_config(app: &AppConfig, experiment: &ExperimentConfig) -> Result<Self> {
        Ok(Self::new(
            experiment.api_url(),
            app.api_key.as_str(),
            experiment.model(),
            app.request_timeout,
        )?
        .with_temperature(experiment.temperature()))
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl CompletionClient for UpstageClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest::user(&self.model, prompt, self.temperature);
        let started = Instant::now();

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!(
            status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            prompt_length = prompt.chars().count(),
            "Completion response received"
        );

        parse_completion(status, &body)
    }
}

/// 상태 코드와 응답 본문에서 첫 번째 choice의 내용을 꺼냅니다.
pub fn parse_completion(status: u16, body: &str) -> Result<String> {
    if !(200..300).contains(&status) {
        return Err(AppError::Api {
            status,
            message: error_message(body),
        });
    }

    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| AppError::malformed_response(format!("{} (본문: {})", e, truncate(body))))?;

    response
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .ok_or_else(|| AppError::malformed_response("choices가 비어 있습니다"))
}

fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => truncate(body),
    }
}

fn truncate(body: &str) -> String {
    let mut text: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if body.chars().count() > ERROR_BODY_LIMIT {
        text.push('…');
    }
    text
}
