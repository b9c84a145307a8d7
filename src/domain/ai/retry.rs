use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff};

use super::client::CompletionClient;
use crate::utils::{AppError, Result};

/// 지수 백오프 설정 생성
fn create_backoff() -> ExponentialBackoff {
    ExponentialBackoff {
        initial_interval: Duration::from_millis(500),
        max_interval: Duration::from_secs(10),
        max_elapsed_time: Some(Duration::from_secs(30)),
        multiplier: 2.0,
        ..Default::default()
    }
}

/// 재시도 로직을 적용한 비동기 작업 실행
///
/// 일시적 오류(`AppError::is_retryable`)는 지수 백오프로 재시도하고,
/// 영구적 오류는 즉시 실패를 반환합니다.
pub async fn with_retry<F, Fut, T>(operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    retry(create_backoff(), || async {
        match operation().await {
            Ok(result) => Ok(result),
            Err(e) if e.is_retryable() => {
                tracing::warn!(error = %e, "Retryable error, will retry...");
                Err(backoff::Error::transient(e))
            }
            Err(e) => {
                tracing::error!(error = %e, "Permanent error, not retrying");
                Err(backoff::Error::permanent(e))
            }
        }
    })
    .await
}

/// 일시적 오류를 재시도하는 클라이언트 래퍼
pub struct RetryingClient<C> {
    inner: C,
}

impl<C> RetryingClient<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: CompletionClient> CompletionClient for RetryingClient<C> {
    async fn complete(&self, prompt: &str) -> Result<String> {
        with_retry(|| self.inner.complete(prompt)).await
    }
}

/// 설정에 따라 재시도 래퍼를 씌운 클라이언트
pub fn maybe_retrying<C>(client: C, retry: bool) -> Box<dyn CompletionClient>
where
    C: CompletionClient + 'static,
{
    if retry {
        Box::new(RetryingClient::new(client))
    } else {
        Box::new(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ai::client::MockCompletionClient;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn create_backoff_should_have_correct_intervals() {
        let backoff = create_backoff();
        assert_eq!(backoff.initial_interval, Duration::from_millis(500));
        assert_eq!(backoff.max_interval, Duration::from_secs(10));
        assert_eq!(backoff.max_elapsed_time, Some(Duration::from_secs(30)));
        assert!((backoff.multiplier - 2.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn with_retry_should_succeed_on_first_try() {
        let result = with_retry(|| async { Ok::<_, AppError>("success") }).await;

        assert_eq!(result.unwrap(), "success");
    }

    #[tokio::test]
    async fn with_retry_should_retry_on_transient_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = with_retry(|| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                let count = attempts.fetch_add(1, Ordering::SeqCst);
                if count < 2 {
                    Err(AppError::Api {
                        status: 429,
                        message: "rate limit exceeded".to_string(),
                    })
                } else {
                    Ok("success")
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn with_retry_should_not_retry_on_permanent_error() {
        let attempts = Arc::new(AtomicU32::new(0));
        let attempts_clone = Arc::clone(&attempts);

        let result = with_retry(|| {
            let attempts = Arc::clone(&attempts_clone);
            async move {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(AppError::Api {
                    status: 400,
                    message: "bad request".to_string(),
                })
            }
        })
        .await;

        assert!(matches!(result, Err(AppError::Api { status: 400, .. })));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retrying_client_should_retry_server_error_once_then_succeed() {
        // Arrange
        let mut mock = MockCompletionClient::new();
        let mut seq = mockall::Sequence::new();
        mock.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(AppError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            });
        mock.expect_complete()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok("교정 결과".to_string()));
        let client = RetryingClient::new(mock);

        // Act
        let result = client.complete("prompt").await;

        // Assert
        assert_eq!(result.unwrap(), "교정 결과");
    }

    #[tokio::test]
    async fn maybe_retrying_should_pass_through_when_disabled() {
        let mut mock = MockCompletionClient::new();
        mock.expect_complete().times(1).returning(|_| {
            Err(AppError::Api {
                status: 500,
                message: "boom".to_string(),
            })
        });
        let client = maybe_retrying(mock, false);

        let result = client.complete("prompt").await;

        assert!(matches!(result, Err(AppError::Api { status: 500, .. })));
    }
}
