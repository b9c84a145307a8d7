use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use super::record::SentenceRecord;
use crate::utils::{AppError, Result};

fn shuffled_indices(len: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut indices: Vec<usize> = (0..len).collect();
    indices.shuffle(&mut rng);
    indices
}

/// 비복원 무작위 추출. `n`이 테이블보다 크면 전체를 섞어서 돌려줍니다.
pub fn sample(records: &[SentenceRecord], n: usize, seed: u64) -> Vec<SentenceRecord> {
    shuffled_indices(records.len(), seed)
        .into_iter()
        .take(n)
        .map(|i| records[i].clone())
        .collect()
}

/// 시드 고정 셔플 후 학습/검증 세트로 나눕니다.
///
/// 검증 세트 크기는 `ceil(test_size * n)`이며 어느 한쪽이라도 비게 되면 에러입니다.
pub fn train_test_split(
    records: &[SentenceRecord],
    test_size: f64,
    seed: u64,
) -> Result<(Vec<SentenceRecord>, Vec<SentenceRecord>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(AppError::invalid_input(format!(
            "test_size는 0과 1 사이여야 합니다: {}",
            test_size
        )));
    }

    let n = records.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_test == 0 || n_train == 0 {
        return Err(AppError::invalid_input(format!(
            "{}개 행을 test_size={}로 나누면 빈 세트가 생깁니다",
            n, test_size
        )));
    }

    let indices = shuffled_indices(n, seed);
    let pick = |idx: &[usize]| idx.iter().map(|&i| records[i].clone()).collect::<Vec<_>>();
    let test = pick(&indices[..n_test]);
    let train = pick(&indices[n_test..]);
    Ok((train, test))
}
