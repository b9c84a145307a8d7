use std::sync::LazyLock;

use regex::Regex;

/// `{{`, `}}`, `{name}`, 그리고 짝이 맞지 않는 중괄호
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}|\{|\}").expect("valid placeholder regex")
});

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("필수 파라미터 '{0}'이(가) 없습니다")]
    MissingParameter(String),
    #[error("{position}번째 바이트의 중괄호 짝이 맞지 않습니다")]
    UnbalancedBrace { position: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Slot(String),
}

/// `{name}` 형태의 이름 있는 슬롯을 가진 문자열 템플릿
///
/// 리터럴 중괄호는 `{{`, `}}`로 씁니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    segments: Vec<Segment>,
}

impl PromptTemplate {
    pub fn new(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut last = 0;

        for caps in TOKEN.captures_iter(source) {
            let Some(token) = caps.get(0) else { continue };
            literal.push_str(&source[last..token.start()]);
            last = token.end();

            match (token.as_str(), caps.get(1)) {
                ("{{", _) => literal.push('{'),
                ("}}", _) => literal.push('}'),
                (_, Some(name)) => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Slot(name.as_str().to_string()));
                }
                _ => {
                    return Err(TemplateError::UnbalancedBrace {
                        position: token.start(),
                    })
                }
            }
        }
        literal.push_str(&source[last..]);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    /// 템플릿에 등장하는 슬롯 이름 (등장 순서, 중복 포함)
    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Slot(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// 슬롯을 채운 문자열. 값이 없는 슬롯이 하나라도 있으면 에러이고, 남는 파라미터는 무시합니다.
    pub fn render(&self, params: &[(&str, &str)]) -> Result<String, TemplateError> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Slot(name) => {
                    let value = params
                        .iter()
                        .find(|(key, _)| *key == name.as_str())
                        .map(|(_, value)| *value)
                        .ok_or_else(|| TemplateError::MissingParameter(name.clone()))?;
                    out.push_str(value);
                }
            }
        }
        Ok(out)
    }
}
