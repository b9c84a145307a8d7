use std::path::{Path, PathBuf};

use validator::Validate;

use super::app_config::{ConfigError, DEFAULT_API_URL, DEFAULT_MODEL};

/// 실험 1회분의 설정
///
/// `ExperimentConfigBuilder`로 한 번 생성한 뒤에는 변경할 수 없습니다.
#[derive(Debug, Clone, Validate)]
pub struct ExperimentConfig {
    #[validate(length(min = 1, message = "템플릿 이름은 필수입니다"))]
    template_name: String,
    #[validate(range(min = 0.0, max = 2.0, message = "temperature는 0 이상 2 이하여야 합니다"))]
    temperature: Option<f32>,
    #[validate(range(min = 1, message = "batch_size는 1 이상이어야 합니다"))]
    batch_size: usize,
    #[validate(length(min = 1, message = "실험 이름은 필수입니다"))]
    experiment_name: String,
    data_dir: PathBuf,
    #[validate(length(min = 1, message = "API URL은 필수입니다"))]
    api_url: String,
    #[validate(length(min = 1, message = "모델 이름은 필수입니다"))]
    model: String,
    #[validate(range(min = 1, message = "toy_size는 1 이상이어야 합니다"))]
    toy_size: usize,
    #[validate(range(
        exclusive_min = 0.0,
        exclusive_max = 1.0,
        message = "test_size는 0과 1 사이여야 합니다"
    ))]
    test_size: f64,
    random_seed: u64,
    #[validate(range(min = 1, message = "top_k는 1 이상이어야 합니다"))]
    top_k: usize,
    retry: bool,
}

impl ExperimentConfig {
    pub fn builder() -> ExperimentConfigBuilder {
        ExperimentConfigBuilder::default()
    }

    pub fn template_name(&self) -> &str {
        &self.template_name
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn experiment_name(&self) -> &str {
        &self.experiment_name
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn toy_size(&self) -> usize {
        self.toy_size
    }

    pub fn test_size(&self) -> f64 {
        self.test_size
    }

    pub fn random_seed(&self) -> u64 {
        self.random_seed
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn retry(&self) -> bool {
        self.retry
    }
}

#[derive(Debug, Clone)]
pub struct ExperimentConfigBuilder {
    inner: ExperimentConfig,
}

impl Default for ExperimentConfigBuilder {
    fn default() -> Self {
        Self {
            inner: ExperimentConfig {
                template_name: "prompt_chain".to_string(),
                temperature: None,
                batch_size: 10,
                experiment_name: "toy_experiment_prompt_chain".to_string(),
                data_dir: PathBuf::from("data"),
                api_url: DEFAULT_API_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                toy_size: 50,
                test_size: 0.2,
                random_seed: 42,
                top_k: 3,
                retry: false,
            },
        }
    }
}

impl ExperimentConfigBuilder {
    pub fn template_name(mut self, name: impl Into<String>) -> Self {
        self.inner.template_name = name.into();
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.inner.temperature = temperature;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.inner.batch_size = batch_size;
        self
    }

    pub fn experiment_name(mut self, name: impl Into<String>) -> Self {
        self.inner.experiment_name = name.into();
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.inner.data_dir = dir.into();
        self
    }

    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.inner.api_url = url.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.inner.model = model.into();
        self
    }

    pub fn toy_size(mut self, toy_size: usize) -> Self {
        self.inner.toy_size = toy_size;
        self
    }

    pub fn test_size(mut self, test_size: f64) -> Self {
        self.inner.test_size = test_size;
        self
    }

    pub fn random_seed(mut self, seed: u64) -> Self {
        self.inner.random_seed = seed;
        self
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.inner.top_k = k;
        self
    }

    pub fn retry(mut self, retry: bool) -> Self {
        self.inner.retry = retry;
        self
    }

    pub fn build(self) -> Result<ExperimentConfig, ConfigError> {
        self.inner
            .validate()
            .map_err(|e| ConfigError::InvalidExperiment(e.to_string()))?;
        Ok(self.inner)
    }
}
