//! 학습/테스트 CSV를 읽어 실험과 테스트 세트 예측을 돌리고 제출 파일을 쓰는 파이프라인

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::ExperimentConfig;
use crate::domain::ai::{CompletionClient, TemplateRegistry};
use crate::domain::dataset::{
    ensure_pos_pattern, read_records, sample, train_test_split, write_records, write_submission,
};
use crate::domain::experiment::{ChainCheckpoint, ExperimentResult, ExperimentRunner};
use crate::domain::pos::PosTagger;
use crate::utils::{AppError, Result};

/// `run` 서브커맨드의 파일 경로와 단계 선택
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub train_file: PathBuf,
    pub test_file: PathBuf,
    pub output: PathBuf,
    pub skip_experiment: bool,
    pub checkpoint: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

impl PipelineOptions {
    /// `data_dir` 아래의 기본 파일 이름으로 옵션을 만듭니다.
    pub fn in_dir(data_dir: &Path) -> Self {
        Self {
            train_file: data_dir.join("train.csv"),
            test_file: data_dir.join("test.csv"),
            output: PathBuf::from("submission_baseline.csv"),
            skip_experiment: false,
            checkpoint: None,
            report: None,
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutcome {
    pub experiment: Option<ExperimentResult>,
    pub predicted_rows: usize,
    pub output: PathBuf,
}

/// 전체 파이프라인
///
/// 1. 학습/테스트 CSV 로드
/// 2. 학습 테이블에 품사 패턴 채우기
/// 3. 토이 샘플 → 학습/검증 분할 → 템플릿 실험 (건너뛸 수 있음)
/// 4. 전체 학습 테이블을 참조로 테스트 세트 예측
/// 5. 제출 파일 쓰기
///
/// 어느 단계에서든 실패하면 제출 파일을 쓰지 않고 에러를 돌려줍니다.
pub async fn run_pipeline<C, T>(
    options: &PipelineOptions,
    config: ExperimentConfig,
    client: C,
    tagger: T,
) -> Result<PipelineOutcome>
where
    C: CompletionClient,
    T: PosTagger,
{
    let train = read_records(&options.train_file)?;
    let test = read_records(&options.test_file)?;
    info!(train_rows = train.len(), test_rows = test.len(), "Datasets loaded");

    let train = ensure_pos_pattern(&tagger, &train);

    let registry = TemplateRegistry::builtin()?;
    let runner = ExperimentRunner::new(config, &registry, client, tagger)?;
    let config = runner.config();

    let experiment = if options.skip_experiment {
        info!("Experiment skipped");
        None
    } else {
        let toy = sample(&train, config.toy_size(), config.random_seed());
        let (toy_train, toy_valid) =
            train_test_split(&toy, config.test_size(), config.random_seed())?;
        let result = runner.run_template_experiment(&toy_train, &toy_valid).await?;

        if let Some(report) = &options.report {
            write_report(report, &result)?;
        }
        Some(result)
    };

    info!(rows = test.len(), "Predicting test set");
    let predictions = match &options.checkpoint {
        Some(path) => {
            let mut checkpoint = ChainCheckpoint::open(path, config.template_name())?;
            runner
                .run_with_checkpoint(&train, &test, &mut checkpoint)
                .await?
        }
        None => runner.run(&train, &test).await?,
    };

    write_submission(&options.output, &predictions)?;

    Ok(PipelineOutcome {
        experiment,
        predicted_rows: predictions.len(),
        output: options.output.clone(),
    })
}

/// 입력 테이블에 품사 패턴 열을 채워 `output`에 저장합니다. 저장된 행 수를 돌려줍니다.
pub fn write_features<T>(input: &Path, output: &Path, tagger: &T) -> Result<usize>
where
    T: PosTagger + ?Sized,
{
    let records = read_records(input)?;
    let missing = records.iter().filter(|r| r.pos_pattern.is_none()).count();
    let records = ensure_pos_pattern(tagger, &records);
    write_records(output, &records)?;

    info!(
        input = %input.display(),
        output = %output.display(),
        rows = records.len(),
        tagged = missing,
        "Features written"
    );
    Ok(records.len())
}

fn write_report(path: &Path, result: &ExperimentResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)
        .map_err(|e| AppError::InvalidInput(format!("실험 결과 직렬화 실패: {}", e)))?;
    fs::write(path, json)?;
    info!(path = %path.display(), "Experiment report written");
    Ok(())
}
