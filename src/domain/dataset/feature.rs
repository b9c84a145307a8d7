use tracing::info;

use super::record::SentenceRecord;
use crate::domain::pos::PosTagger;

/// `pos_pattern`이 없는 행에만 패턴을 계산해 채운 새 테이블을 돌려줍니다.
///
/// 입력 테이블은 변경하지 않습니다.
pub fn ensure_pos_pattern<T>(tagger: &T, records: &[SentenceRecord]) -> Vec<SentenceRecord>
where
    T: PosTagger + ?Sized,
{
    let missing = records.iter().filter(|r| r.pos_pattern.is_none()).count();
    if missing > 0 {
        info!(missing, total = records.len(), "Computing pos_pattern column");
    }

    records
        .iter()
        .map(|record| match record.pos_pattern {
            Some(_) => record.clone(),
            None => {
                let pattern = tagger.pos_pattern(&record.err_sentence);
                record.clone().with_pattern(pattern)
            }
        })
        .collect()
}
