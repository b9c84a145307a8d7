use serde::{Deserialize, Serialize};

/// 오류 문장 / 교정 문장 한 쌍
///
/// `pos_pattern`은 `err_sentence`에서 유도한 값으로, 한 번 계산한 뒤 열로 저장해 재사용합니다.
/// 저장된 값이 현재 분석기 결과와 같은지는 확인하지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    pub id: String,
    pub err_sentence: String,
    #[serde(default)]
    pub cor_sentence: Option<String>,
    #[serde(default)]
    pub pos_pattern: Option<String>,
}

impl SentenceRecord {
    pub fn new(id: impl Into<String>, err_sentence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            err_sentence: err_sentence.into(),
            cor_sentence: None,
            pos_pattern: None,
        }
    }

    pub fn with_correction(mut self, cor_sentence: impl Into<String>) -> Self {
        self.cor_sentence = Some(cor_sentence.into());
        self
    }

    pub fn with_pattern(mut self, pos_pattern: impl Into<String>) -> Self {
        self.pos_pattern = Some(pos_pattern.into());
        self
    }
}

/// 제출 파일의 한 행
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub cor_sentence: String,
}

impl Prediction {
    pub fn new(id: impl Into<String>, cor_sentence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cor_sentence: cor_sentence.into(),
        }
    }
}
