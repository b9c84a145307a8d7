use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use kor_gec::config::{AppConfig, ExperimentConfig};
use kor_gec::domain::ai::{maybe_retrying, TemplateRegistry, UpstageClient};
use kor_gec::domain::pos::PosTagger;
use kor_gec::utils::{logging::init_logging, Result};
use kor_gec::{run_pipeline, write_features, PipelineOptions};

#[derive(Parser)]
#[command(name = "kor-gec")]
#[command(about = "품사 패턴 few-shot 검색 + 2단계 프롬프트 체인 한국어 문법 교정 실험")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 토이 실험 후 테스트 세트를 예측해 제출 파일을 씁니다
    Run(RunArgs),
    /// 학습 CSV에 pos_pattern 열을 채워 저장합니다
    Features(FeaturesArgs),
    /// 등록된 프롬프트 템플릿 목록
    Templates,
}

#[derive(Args)]
struct RunArgs {
    /// 데이터 디렉터리 (기본값: GEC_DATA_DIR 또는 data)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    #[arg(long, default_value = "train.csv")]
    train_file: PathBuf,

    #[arg(long, default_value = "test.csv")]
    test_file: PathBuf,

    #[arg(short, long, default_value = "submission_baseline.csv")]
    output: PathBuf,

    #[arg(short, long, default_value = "prompt_chain")]
    template: String,

    #[arg(long, default_value_t = 50)]
    toy_size: usize,

    #[arg(long, default_value_t = 0.2)]
    test_size: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(short = 'k', long, default_value_t = 3)]
    top_k: usize,

    #[arg(long)]
    temperature: Option<f32>,

    #[arg(long, default_value_t = 10)]
    batch_size: usize,

    /// 토이 실험 없이 테스트 세트만 예측
    #[arg(long)]
    skip_experiment: bool,

    /// 일시적인 API 오류(429, 5xx, 타임아웃)를 지수 백오프로 재시도
    #[arg(long)]
    retry: bool,

    /// 체인 진행 상태를 기록하고 이어서 실행할 JSONL 파일
    #[arg(long)]
    checkpoint: Option<PathBuf>,

    /// 실험 결과를 저장할 JSON 파일
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct FeaturesArgs {
    /// 입력 CSV (id, err_sentence, cor_sentence)
    #[arg(short, long)]
    input: PathBuf,

    #[arg(short, long)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. 환경변수 로드
    dotenvy::dotenv().ok();

    // 2. 로깅 초기화
    let _guard = init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run(args) => run(args).await,
        Command::Features(args) => features(args),
        Command::Templates => templates(),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: RunArgs) -> Result<()> {
    // 비밀 키가 없으면 아무것도 처리하기 전에 종료
    let app_config = AppConfig::from_env()?;
    info!(config = ?app_config, "Configuration loaded");

    let config = ExperimentConfig::builder()
        .template_name(args.template.as_str())
        .experiment_name(format!("toy_experiment_{}", args.template))
        .temperature(args.temperature)
        .batch_size(args.batch_size)
        .data_dir(args.data_dir.unwrap_or_else(|| app_config.data_dir.clone()))
        .api_url(app_config.api_url.as_str())
        .model(app_config.model.as_str())
        .toy_size(args.toy_size)
        .test_size(args.test_size)
        .random_seed(args.seed)
        .top_k(args.top_k)
        .retry(args.retry)
        .build()?;

    let options = PipelineOptions {
        train_file: resolve(config.data_dir(), args.train_file),
        test_file: resolve(config.data_dir(), args.test_file),
        output: args.output,
        skip_experiment: args.skip_experiment,
        checkpoint: args.checkpoint,
        report: args.report,
    };

    let client = maybe_retrying(UpstageClient::from_config(&app_config, &config)?, config.retry());
    let tagger = create_tagger()?;

    let outcome = run_pipeline(&options, config, client, tagger).await?;
    if let Some(experiment) = &outcome.experiment {
        info!(
            experiment = %experiment.experiment_name,
            train_recall = experiment.train_recall,
            valid_recall = experiment.valid_recall,
            "Toy experiment"
        );
    }
    info!(
        rows = outcome.predicted_rows,
        output = %outcome.output.display(),
        "Done"
    );
    Ok(())
}

fn features(args: FeaturesArgs) -> Result<()> {
    let tagger = create_tagger()?;
    write_features(&args.input, &args.output, &tagger)?;
    Ok(())
}

fn templates() -> Result<()> {
    let registry = TemplateRegistry::builtin()?;
    for (name, template) in registry.iter() {
        println!("{}\t{} stage(s)", name, template.stages());
    }
    Ok(())
}

fn resolve(data_dir: &Path, file: PathBuf) -> PathBuf {
    if file.is_absolute() {
        file
    } else {
        data_dir.join(file)
    }
}

#[cfg(feature = "kiwi")]
fn create_tagger() -> Result<Box<dyn PosTagger>> {
    Ok(Box::new(kor_gec::domain::pos::KiwiTagger::new()?))
}

#[cfg(not(feature = "kiwi"))]
fn create_tagger() -> Result<Box<dyn PosTagger>> {
    Err(kor_gec::utils::AppError::Tagger(
        "형태소 분석기 없이 빌드되었습니다. `kiwi` feature를 켜세요".to_string(),
    ))
}
