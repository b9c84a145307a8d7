use std::sync::Arc;

use tracing::warn;

use crate::utils::Result;

/// 문장을 형태소 단위로 나누어 품사 태그 목록을 돌려주는 분석기
pub trait PosTagger {
    fn tags(&self, sentence: &str) -> Result<Vec<String>>;

    /// 품사 태그를 공백 하나로 이어 붙인 패턴
    ///
    /// 빈 문장이거나 분석에 실패하면 빈 문자열을 돌려줍니다.
    fn pos_pattern(&self, sentence: &str) -> String {
        if sentence.trim().is_empty() {
            return String::new();
        }
        match self.tags(sentence) {
            Ok(tags) => tags.join(" "),
            Err(e) => {
                warn!(error = %e, sentence, "Morphological analysis failed, using empty pattern");
                String::new()
            }
        }
    }
}

impl<T: PosTagger + ?Sized> PosTagger for &T {
    fn tags(&self, sentence: &str) -> Result<Vec<String>> {
        (**self).tags(sentence)
    }
}

impl<T: PosTagger + ?Sized> PosTagger for Box<T> {
    fn tags(&self, sentence: &str) -> Result<Vec<String>> {
        (**self).tags(sentence)
    }
}

impl<T: PosTagger + ?Sized> PosTagger for Arc<T> {
    fn tags(&self, sentence: &str) -> Result<Vec<String>> {
        (**self).tags(sentence)
    }
}

#[cfg(feature = "kiwi")]
pub use kiwi::KiwiTagger;

#[cfg(feature = "kiwi")]
mod kiwi {
    use kiwi_rs::Kiwi;
    use tracing::info;

    use super::PosTagger;
    use crate::utils::{AppError, Result};

    /// Kiwi 형태소 분석기 어댑터
    pub struct KiwiTagger {
        kiwi: Kiwi,
    }

    impl KiwiTagger {
        pub fn new() -> Result<Self> {
            let kiwi = Kiwi::init().map_err(|e| AppError::Tagger(e.to_string()))?;
            info!("Kiwi analyzer initialized");
            Ok(Self { kiwi })
        }
    }

    impl PosTagger for KiwiTagger {
        fn tags(&self, sentence: &str) -> Result<Vec<String>> {
            let tokens = self
                .kiwi
                .tokenize(sentence)
                .map_err(|e| AppError::Tagger(e.to_string()))?;
            Ok(tokens.iter().map(|token| token.tag.to_string()).collect())
        }
    }
}
