use std::collections::HashMap;

use serde::Serialize;

use super::metrics::EvaluationScore;
use crate::domain::dataset::Prediction;

/// 학습 세트 자기 유사도 실행과 검증 세트 실행의 결과
#[derive(Debug, Clone, Serialize)]
pub struct ExperimentResult {
    pub experiment_name: String,
    pub template_name: String,
    pub train_recall: f64,
    pub valid_recall: f64,
    pub train_score: EvaluationScore,
    pub valid_score: EvaluationScore,
    pub train_results: Vec<Prediction>,
    pub valid_results: Vec<Prediction>,
}

/// 행 id → 교정 문장
pub fn corrections_by_id(predictions: &[Prediction]) -> HashMap<&str, &str> {
    predictions
        .iter()
        .map(|p| (p.id.as_str(), p.cor_sentence.as_str()))
        .collect()
}
