//! 교정 결과 평가
//!
//! 원문과 정답, 원문과 예측을 각각 어절 단위로 정렬해 편집 목록을 만들고
//! 정답 편집 중 예측에서도 똑같이 나타난 비율(recall)을 계산합니다.

use std::collections::HashSet;

use serde::Serialize;

use super::dto::corrections_by_id;
use crate::domain::dataset::{Prediction, SentenceRecord};
use crate::domain::pos::similarity::{OpTag, SequenceMatcher};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct EvaluationScore {
    pub recall: f64,
    pub precision: f64,
    pub rows: usize,
    pub gold_edits: usize,
    pub predicted_edits: usize,
    pub matched_edits: usize,
}

/// 원문 어절 `[start, end)`를 `replacement`로 바꾸는 편집
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Edit {
    start: usize,
    end: usize,
    replacement: Vec<String>,
}

fn extract_edits(source: &str, target: &str) -> HashSet<Edit> {
    let source: Vec<&str> = source.split_whitespace().collect();
    let target: Vec<&str> = target.split_whitespace().collect();

    SequenceMatcher::new(&source, &target)
        .opcodes()
        .into_iter()
        .filter(|op| op.tag != OpTag::Equal)
        .map(|op| Edit {
            start: op.a_start,
            end: op.a_end,
            replacement: target[op.b_start..op.b_end]
                .iter()
                .map(|token| token.to_string())
                .collect(),
        })
        .collect()
}

fn ratio_or_one(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        1.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// 정답 테이블과 예측을 id로 맞춰 평가합니다.
///
/// 정답(`cor_sentence`)이 없는 행은 건너뛰고, 예측이 없는 행은 원문을 그대로 낸 것으로 봅니다.
pub fn evaluate_correction(gold: &[SentenceRecord], predictions: &[Prediction]) -> EvaluationScore {
    let predicted = corrections_by_id(predictions);

    let mut score = EvaluationScore::default();
    for record in gold {
        let Some(reference) = record.cor_sentence.as_deref() else {
            continue;
        };
        let hypothesis = predicted
            .get(record.id.as_str())
            .copied()
            .unwrap_or(record.err_sentence.as_str());

        let gold_edits = extract_edits(&record.err_sentence, reference);
        let predicted_edits = extract_edits(&record.err_sentence, hypothesis);

        score.rows += 1;
        score.gold_edits += gold_edits.len();
        score.predicted_edits += predicted_edits.len();
        score.matched_edits += gold_edits.intersection(&predicted_edits).count();
    }

    score.recall = ratio_or_one(score.matched_edits, score.gold_edits);
    score.precision = ratio_or_one(score.matched_edits, score.predicted_edits);
    score
}
