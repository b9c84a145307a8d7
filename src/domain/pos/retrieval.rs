use super::similarity::similarity;
use super::tagger::PosTagger;
use crate::domain::dataset::SentenceRecord;
use crate::utils::{AppError, Result};

/// 참조 테이블에서 찾은 유사 예시 하나
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult {
    pub score: f64,
    pub err_sentence: String,
    pub cor_sentence: String,
}

/// 입력 문장과 품사 패턴이 가장 비슷한 참조 예시 `k`개
///
/// 입력 문장의 패턴은 한 번만 계산하고, 참조 행은 저장된 `pos_pattern`을 그대로 씁니다.
pub fn top_k<T>(
    tagger: &T,
    input_sentence: &str,
    reference: &[SentenceRecord],
    k: usize,
) -> Result<Vec<SimilarityResult>>
where
    T: PosTagger + ?Sized,
{
    let input_pattern = tagger.pos_pattern(input_sentence);
    top_k_for_pattern(&input_pattern, reference, k)
}

/// 점수 내림차순(동점이면 테이블 순서 유지)으로 최대 `k`개를 돌려줍니다.
pub fn top_k_for_pattern(
    input_pattern: &str,
    reference: &[SentenceRecord],
    k: usize,
) -> Result<Vec<SimilarityResult>> {
    let mut results = Vec::with_capacity(reference.len());
    for row in reference {
        let pattern = row.pos_pattern.as_deref().ok_or_else(|| {
            AppError::invalid_input(format!(
                "참조 행 {}에 pos_pattern이 없습니다. ensure_pos_pattern을 먼저 적용하세요",
                row.id
            ))
        })?;
        let cor_sentence = row.cor_sentence.clone().ok_or_else(|| {
            AppError::invalid_input(format!("참조 행 {}에 cor_sentence가 없습니다", row.id))
        })?;

        results.push(SimilarityResult {
            score: similarity(input_pattern, pattern),
            err_sentence: row.err_sentence.clone(),
            cor_sentence,
        });
    }

    // sort_by는 안정 정렬
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
    results.truncate(k);
    Ok(results)
}
