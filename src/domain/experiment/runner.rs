use std::time::Instant;

use tracing::{debug, info};

use super::checkpoint::{ChainCheckpoint, ChainStage};
use super::dto::ExperimentResult;
use super::metrics::evaluate_correction;
use crate::config::ExperimentConfig;
use crate::domain::ai::{CompletionClient, TemplateKind, TemplateRegistry};
use crate::domain::dataset::{Prediction, SentenceRecord};
use crate::domain::pos::{top_k, PosTagger, SimilarityResult};
use crate::utils::{AppError, Result};

/// 유사 예시들과 현재 입력으로 few-shot 블록을 만듭니다.
///
/// 예시는 주어진 순서(유사도 내림차순)대로 `입력: ..\n출력: ..\n\n` 형태로 나열하고,
/// 마지막에 출력이 비어 있는 현재 입력을 붙입니다.
pub fn build_few_shot_block(examples: &[SimilarityResult], origin: &str) -> String {
    let mut block = String::new();
    for example in examples {
        block.push_str(&format!(
            "입력: {}\n출력: {}\n\n",
            example.err_sentence, example.cor_sentence
        ));
    }
    block.push_str(&format!("입력: {}\n출력:", origin));
    block
}

/// 행 단위 검색 + 프롬프트 호출을 순차적으로 실행하는 실험 러너
pub struct ExperimentRunner<C, T> {
    config: ExperimentConfig,
    template: TemplateKind,
    client: C,
    tagger: T,
}

impl<C, T> ExperimentRunner<C, T>
where
    C: CompletionClient,
    T: PosTagger,
{
    pub fn new(
        config: ExperimentConfig,
        registry: &TemplateRegistry,
        client: C,
        tagger: T,
    ) -> Result<Self> {
        let template = registry.get(config.template_name())?.clone();
        Ok(Self {
            config,
            template,
            client,
            tagger,
        })
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// `reference`를 예시 테이블로 삼아 `inputs`의 모든 행을 교정합니다.
    ///
    /// 행은 하나씩 순서대로 처리하며, 어느 행에서든 에러가 나면 나머지를 처리하지 않고 즉시 반환합니다.
    pub async fn run(
        &self,
        reference: &[SentenceRecord],
        inputs: &[SentenceRecord],
    ) -> Result<Vec<Prediction>> {
        self.run_rows(reference, inputs, None).await
    }

    /// `run`과 같지만 각 단계가 끝날 때마다 체크포인트에 기록하고, 기록된 진행 상태부터 이어서 실행합니다.
    pub async fn run_with_checkpoint(
        &self,
        reference: &[SentenceRecord],
        inputs: &[SentenceRecord],
        checkpoint: &mut ChainCheckpoint,
    ) -> Result<Vec<Prediction>> {
        if checkpoint.template() != self.config.template_name() {
            return Err(AppError::Checkpoint(format!(
                "체크포인트 템플릿({})이 실행 템플릿({})과 다릅니다",
                checkpoint.template(),
                self.config.template_name()
            )));
        }
        self.run_rows(reference, inputs, Some(checkpoint)).await
    }

    async fn run_rows(
        &self,
        reference: &[SentenceRecord],
        inputs: &[SentenceRecord],
        mut checkpoint: Option<&mut ChainCheckpoint>,
    ) -> Result<Vec<Prediction>> {
        let total = inputs.len();
        let started = Instant::now();
        info!(
            template = self.config.template_name(),
            reference_rows = reference.len(),
            rows = total,
            "Running correction"
        );

        let mut predictions = Vec::with_capacity(total);
        for (index, row) in inputs.iter().enumerate() {
            let state = checkpoint
                .as_deref()
                .map(|c| c.state(&row.id, &row.err_sentence))
                .unwrap_or(ChainStage::Stage1Pending);

            let corrected = match state {
                ChainStage::Stage2Done { result, .. } => {
                    debug!(id = %row.id, "Row already finished, skipping");
                    result
                }
                state => {
                    self.correct_row(reference, row, state, checkpoint.as_deref_mut())
                        .await?
                }
            };
            predictions.push(Prediction::new(row.id.clone(), corrected));

            let processed = index + 1;
            if processed % self.config.batch_size() == 0 || processed == total {
                info!(
                    processed,
                    total,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Progress"
                );
            }
        }

        Ok(predictions)
    }

    fn few_shot_for(&self, reference: &[SentenceRecord], origin: &str) -> Result<String> {
        let examples = top_k(&self.tagger, origin, reference, self.config.top_k())?;
        if let Some(best) = examples.first() {
            debug!(best_score = best.score, examples = examples.len(), "Similar examples retrieved");
        }
        Ok(build_few_shot_block(&examples, origin))
    }

    async fn correct_row(
        &self,
        reference: &[SentenceRecord],
        row: &SentenceRecord,
        state: ChainStage,
        mut checkpoint: Option<&mut ChainCheckpoint>,
    ) -> Result<String> {
        let origin = row.err_sentence.as_str();

        match &self.template {
            TemplateKind::Single(template) => {
                let few_shot = if template.slots().any(|slot| slot == "few_shot") {
                    self.few_shot_for(reference, origin)?
                } else {
                    String::new()
                };
                let prompt = template.render(&[
                    ("text", origin),
                    ("origin", origin),
                    ("few_shot", few_shot.as_str()),
                ])?;
                let result = self.client.complete(&prompt).await?;
                debug!(id = %row.id, "Single-stage correction done");

                if let Some(checkpoint) = checkpoint {
                    checkpoint.record(
                        &row.id,
                        origin,
                        ChainStage::Stage2Done {
                            correction: result.clone(),
                            result: result.clone(),
                        },
                    )?;
                }
                Ok(result)
            }
            TemplateKind::Chain { prompt_1, prompt_2 } => {
                let correction = match state {
                    ChainStage::Stage1Done { correction } => {
                        debug!(id = %row.id, "Resuming at stage 2");
                        correction
                    }
                    _ => {
                        let few_shot = self.few_shot_for(reference, origin)?;
                        let prompt = prompt_1
                            .render(&[("few_shot", few_shot.as_str()), ("origin", origin)])?;
                        let correction = self.client.complete(&prompt).await?;
                        debug!(id = %row.id, stage = 1, "Stage done");

                        if let Some(checkpoint) = checkpoint.as_deref_mut() {
                            checkpoint.record(
                                &row.id,
                                origin,
                                ChainStage::Stage1Done {
                                    correction: correction.clone(),
                                },
                            )?;
                        }
                        correction
                    }
                };

                let prompt =
                    prompt_2.render(&[("origin", origin), ("correction", correction.as_str())])?;
                let result = self.client.complete(&prompt).await?;
                debug!(id = %row.id, stage = 2, "Stage done");

                if let Some(checkpoint) = checkpoint {
                    checkpoint.record(
                        &row.id,
                        origin,
                        ChainStage::Stage2Done {
                            correction,
                            result: result.clone(),
                        },
                    )?;
                }
                Ok(result)
            }
        }
    }

    /// 학습 세트 자기 유사도 실행과 학습→검증 실행을 차례로 돌리고 각각 평가합니다.
    pub async fn run_template_experiment(
        &self,
        train: &[SentenceRecord],
        valid: &[SentenceRecord],
    ) -> Result<ExperimentResult> {
        info!(
            experiment = self.config.experiment_name(),
            template = self.config.template_name(),
            "=== Template experiment ==="
        );

        info!(rows = train.len(), "[train] self-similarity run");
        let train_results = self.run(train, train).await?;
        let train_score = evaluate_correction(train, &train_results);

        info!(rows = valid.len(), "[valid] held-out run");
        let valid_results = self.run(train, valid).await?;
        let valid_score = evaluate_correction(valid, &valid_results);

        info!(
            train_recall = train_score.recall,
            valid_recall = valid_score.recall,
            "Experiment finished"
        );

        Ok(ExperimentResult {
            experiment_name: self.config.experiment_name().to_string(),
            template_name: self.config.template_name().to_string(),
            train_recall: train_score.recall,
            valid_recall: valid_score.recall,
            train_score,
            valid_score,
            train_results,
            valid_results,
        })
    }
}
