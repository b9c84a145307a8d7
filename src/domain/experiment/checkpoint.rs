//! 2단계 체인의 행별 진행 상태 저장소 (JSON Lines)
//!
//! 상태가 바뀔 때마다 한 줄을 덧붙이고, 다시 열 때는 같은 id의 마지막 줄이 우선합니다.
//! 중단된 실행을 이어서 돌릴 때 이미 끝난 행은 건너뛰고 1단계만 끝난 행은 2단계부터 시작합니다.
//!
//! 각 줄에는 템플릿 이름과 원문을 함께 기록합니다. 템플릿이 다른 줄은 읽지 않고,
//! 같은 id라도 원문이 바뀐 행은 처음부터 다시 처리합니다.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::utils::{AppError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum ChainStage {
    Stage1Pending,
    Stage1Done { correction: String },
    Stage2Done { correction: String, result: String },
}

#[derive(Debug, Serialize, Deserialize)]
struct CheckpointLine {
    id: String,
    template: String,
    err_sentence: String,
    state: ChainStage,
    updated_at: DateTime<Utc>,
}

#[derive(Debug)]
struct Entry {
    err_sentence: String,
    state: ChainStage,
}

pub struct ChainCheckpoint {
    path: PathBuf,
    template: String,
    file: File,
    entries: HashMap<String, Entry>,
}

impl ChainCheckpoint {
    /// 체크포인트 파일을 열고(없으면 생성) `template`으로 기록된 상태만 읽어 들입니다.
    pub fn open(path: impl AsRef<Path>, template: &str) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries = HashMap::new();
        let mut other_template = 0usize;

        if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            for (index, line) in reader.lines().enumerate() {
                let line = line?;
                if line.trim().is_empty() {
                    continue;
                }
                let parsed: CheckpointLine = serde_json::from_str(&line).map_err(|e| {
                    AppError::Checkpoint(format!("{}:{} 파싱 실패: {}", path.display(), index + 1, e))
                })?;
                if parsed.template != template {
                    other_template += 1;
                    continue;
                }
                entries.insert(
                    parsed.id,
                    Entry {
                        err_sentence: parsed.err_sentence,
                        state: parsed.state,
                    },
                );
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let finished = entries
            .values()
            .filter(|e| matches!(e.state, ChainStage::Stage2Done { .. }))
            .count();
        info!(
            path = %path.display(),
            template,
            rows = entries.len(),
            finished,
            ignored_lines = other_template,
            "Checkpoint opened"
        );

        Ok(Self {
            path,
            template: template.to_string(),
            file,
            entries,
        })
    }

    /// 행의 진행 상태. 기록이 없거나 기록된 원문이 `err_sentence`와 다르면 `Stage1Pending`
    pub fn state(&self, id: &str, err_sentence: &str) -> ChainStage {
        match self.entries.get(id) {
            Some(entry) if entry.err_sentence == err_sentence => entry.state.clone(),
            Some(_) => {
                warn!(id, "Source sentence changed since checkpoint, restarting row");
                ChainStage::Stage1Pending
            }
            None => ChainStage::Stage1Pending,
        }
    }

    pub fn record(&mut self, id: &str, err_sentence: &str, state: ChainStage) -> Result<()> {
        let line = CheckpointLine {
            id: id.to_string(),
            template: self.template.clone(),
            err_sentence: err_sentence.to_string(),
            state,
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&line)
            .map_err(|e| AppError::Checkpoint(format!("직렬화 실패: {}", e)))?;
        writeln!(self.file, "{}", json)?;
        self.file.flush()?;

        debug!(path = %self.path.display(), id, "Checkpoint updated");
        self.entries.insert(
            line.id,
            Entry {
                err_sentence: line.err_sentence,
                state: line.state,
            },
        );
        Ok(())
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
