use std::path::Path;

use tracing::{debug, info};

use super::record::{Prediction, SentenceRecord};
use crate::utils::{AppError, Result};

pub const SUBMISSION_HEADER: [&str; 2] = ["id", "cor_sentence"];
const RECORD_HEADER: [&str; 4] = ["id", "err_sentence", "cor_sentence", "pos_pattern"];

/// CSV 파일에서 문장 쌍을 읽습니다.
///
/// `id`, `err_sentence` 열은 필수이며 `cor_sentence`, `pos_pattern` 열은 없어도 됩니다.
/// 그 밖의 열은 무시합니다.
pub fn read_records(path: &Path) -> Result<Vec<SentenceRecord>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    for required in ["id", "err_sentence"] {
        if !headers.iter().any(|h| h == required) {
            return Err(AppError::invalid_input(format!(
                "{}에 필수 열 '{}'이(가) 없습니다",
                path.display(),
                required
            )));
        }
    }

    let records = reader
        .deserialize::<SentenceRecord>()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    info!(path = %path.display(), rows = records.len(), "Dataset loaded");
    Ok(records)
}

/// 문장 쌍을 `pos_pattern` 열까지 포함해 CSV로 저장합니다.
///
/// 값이 없는 열과 빈 문자열은 모두 빈 칸으로 기록되고 `read_records`는 빈 칸을 `None`으로 읽습니다.
/// 따라서 빈 `pos_pattern`(빈 문장이나 분석 실패)은 보존되지 않고 다음 실행의
/// `ensure_pos_pattern`에서 다시 계산됩니다.
pub fn write_records(path: &Path, records: &[SentenceRecord]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(RECORD_HEADER)?;
    for record in records {
        writer.write_record([
            record.id.as_str(),
            record.err_sentence.as_str(),
            record.cor_sentence.as_deref().unwrap_or(""),
            record.pos_pattern.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = records.len(), "Records written");
    Ok(())
}

/// 제출 파일 작성 (`id`, `cor_sentence` 두 열만, 행이 없어도 헤더는 항상 기록)
pub fn write_submission(path: &Path, predictions: &[Prediction]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    writer.write_record(SUBMISSION_HEADER)?;
    for prediction in predictions {
        writer.write_record([prediction.id.as_str(), prediction.cor_sentence.as_str()])?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = predictions.len(), "Submission written");
    Ok(())
}
