//! 실험 실행 로그
//!
//! 터미널에는 진행 상황을 사람이 읽는 형식으로 찍고, `LOG_DIR` 아래에는
//! 실행별 점수/행 id 필드를 그대로 남기는 JSON 로그를 일 단위로 씁니다.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "info,kor_gec=debug";
const DEFAULT_LOG_DIR: &str = "logs";
const LOG_FILE_PREFIX: &str = "kor-gec.log";

/// 환경 변수에서 읽은 로그 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub filter: String,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// `LOG_DIR`(기본 `logs`), `RUST_LOG`(기본 `info,kor_gec=debug`)
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            dir: PathBuf::from(non_empty("LOG_DIR").unwrap_or_else(|| DEFAULT_LOG_DIR.to_string())),
            filter: non_empty("RUST_LOG").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        }
    }
}

/// 전역 subscriber를 설치하고 파일 writer의 guard를 돌려줍니다.
///
/// guard가 drop되면 남은 파일 로그가 flush되므로 main이 끝날 때까지 들고 있어야 합니다.
/// 이미 subscriber가 설치되어 있으면 기존 것을 그대로 씁니다.
pub fn init_logging() -> WorkerGuard {
    let settings = LogSettings::from_env();

    let appender = tracing_appender::rolling::daily(&settings.dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_new(&settings.filter).unwrap_or_else(|err| {
        eprintln!("Invalid RUST_LOG '{}': {}, using '{}'", settings.filter, err, DEFAULT_FILTER);
        EnvFilter::new(DEFAULT_FILTER)
    });

    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_target(false),
        )
        .with(
            fmt::layer()
                .json()
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_ansi(false)
                .with_writer(file_writer),
        )
        .try_init();

    if let Err(err) = installed {
        tracing::debug!(error = %err, "Logging already initialized");
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_use_defaults_when_unset() {
        let settings = LogSettings::from_lookup(|_| None);

        assert_eq!(settings.dir, PathBuf::from("logs"));
        assert_eq!(settings.filter, "info,kor_gec=debug");
    }

    #[test]
    fn should_read_dir_and_filter() {
        // Arrange
        let lookup = |key: &str| match key {
            "LOG_DIR" => Some("/tmp/gec-logs".to_string()),
            "RUST_LOG" => Some("warn".to_string()),
            _ => None,
        };

        // Act
        let settings = LogSettings::from_lookup(lookup);

        // Assert
        assert_eq!(settings.dir, PathBuf::from("/tmp/gec-logs"));
        assert_eq!(settings.filter, "warn");
    }

    #[test]
    fn should_ignore_blank_values() {
        let settings = LogSettings::from_lookup(|_| Some("  ".to_string()));

        assert_eq!(settings, LogSettings::from_lookup(|_| None));
    }
}
