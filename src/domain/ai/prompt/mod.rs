mod korean;
pub mod template;

use std::collections::BTreeMap;

pub use template::{PromptTemplate, TemplateError};

use crate::config::ConfigError;

/// 실험에 쓰는 템플릿 종류
#[derive(Debug, Clone)]
pub enum TemplateKind {
    /// 한 번의 호출로 교정 (`text`, `few_shot`, `origin` 슬롯 사용 가능)
    Single(PromptTemplate),
    /// 2단계 체인: `prompt_1(few_shot, origin)` → `prompt_2(origin, correction)`
    Chain {
        prompt_1: PromptTemplate,
        prompt_2: PromptTemplate,
    },
}

impl TemplateKind {
    pub fn stages(&self) -> usize {
        match self {
            TemplateKind::Single(_) => 1,
            TemplateKind::Chain { .. } => 2,
        }
    }
}

/// 이름으로 찾는 템플릿 모음
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, TemplateKind>,
}

impl TemplateRegistry {
    /// 기본 제공 템플릿: `basic`, `few_shot`, `prompt_chain`
    pub fn builtin() -> Result<Self, TemplateError> {
        let mut registry = Self::default();
        registry.register("basic", TemplateKind::Single(PromptTemplate::new(korean::BASIC)?));
        registry.register(
            "few_shot",
            TemplateKind::Single(PromptTemplate::new(korean::FEW_SHOT)?),
        );
        registry.register(
            "prompt_chain",
            TemplateKind::Chain {
                prompt_1: PromptTemplate::new(korean::CHAIN_STAGE_1)?,
                prompt_2: PromptTemplate::new(korean::CHAIN_STAGE_2)?,
            },
        );
        Ok(registry)
    }

    pub fn register(&mut self, name: impl Into<String>, template: TemplateKind) {
        self.templates.insert(name.into(), template);
    }

    pub fn get(&self, name: &str) -> Result<&TemplateKind, ConfigError> {
        self.templates
            .get(name)
            .ok_or_else(|| ConfigError::UnknownTemplate(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TemplateKind)> {
        self.templates.iter().map(|(name, kind)| (name.as_str(), kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (PromptTemplate, PromptTemplate) {
        let registry = TemplateRegistry::builtin().unwrap();
        match registry.get("prompt_chain").unwrap() {
            TemplateKind::Chain { prompt_1, prompt_2 } => (prompt_1.clone(), prompt_2.clone()),
            TemplateKind::Single(_) => panic!("prompt_chain should have two stages"),
        }
    }

    #[test]
    fn should_register_builtin_templates() {
        let registry = TemplateRegistry::builtin().unwrap();

        let names: Vec<_> = registry.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["basic", "few_shot", "prompt_chain"]);
        assert_eq!(registry.get("prompt_chain").unwrap().stages(), 2);
        assert_eq!(registry.get("basic").unwrap().stages(), 1);
    }

    #[test]
    fn should_reject_unknown_template() {
        let registry = TemplateRegistry::builtin().unwrap();
        assert!(matches!(
            registry.get("nope"),
            Err(ConfigError::UnknownTemplate(name)) if name == "nope"
        ));
    }

    #[test]
    fn should_render_first_stage_with_few_shot_and_origin() {
        // Arrange
        let (prompt_1, _) = chain();

        // Act
        let prompt = prompt_1.render(&[("few_shot", "X"), ("origin", "Y")]).unwrap();

        // Assert
        assert!(prompt.contains("교정 대상 문장: Y"));
        assert!(prompt.ends_with("X"));
    }

    #[test]
    fn should_fail_first_stage_without_origin() {
        let (prompt_1, _) = chain();

        let result = prompt_1.render(&[("few_shot", "X")]);

        assert_eq!(result, Err(TemplateError::MissingParameter("origin".to_string())));
    }

    #[test]
    fn should_render_second_stage_with_correction() {
        let (_, prompt_2) = chain();

        let prompt = prompt_2
            .render(&[("origin", "나는 밥을 먹다"), ("correction", "나는 밥을 먹었다")])
            .unwrap();

        assert!(prompt.contains("원문: 나는 밥을 먹다"));
        assert!(prompt.contains("1차 교정: 나는 밥을 먹었다"));
    }

    #[test]
    fn should_fail_second_stage_without_correction() {
        let (_, prompt_2) = chain();
        assert!(prompt_2.render(&[("origin", "a")]).is_err());
    }
}
