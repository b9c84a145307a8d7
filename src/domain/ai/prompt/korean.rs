//! 기본 제공 한국어 교정 프롬프트

/// 단일 단계, 예시 없이 교정
pub const BASIC: &str = r#"다음 문장의 맞춤법, 띄어쓰기, 문법 오류를 교정하세요.
원문의 의미와 어투는 유지하고, 교정된 문장 한 줄만 출력하세요. 설명은 덧붙이지 마세요.

입력: {text}
출력:"#;

/// 단일 단계, 유사 예시를 앞에 붙여 교정
pub const FEW_SHOT: &str = r#"당신은 한국어 문법 교정 전문가입니다.
아래 예시처럼 입력 문장의 맞춤법, 띄어쓰기, 문법 오류를 교정하세요.
교정된 문장 한 줄만 출력하고, 설명은 덧붙이지 마세요.

{few_shot}"#;

/// 2단계 체인의 1단계: 예시 기반 1차 교정
pub const CHAIN_STAGE_1: &str = r#"당신은 한국어 문법 교정 전문가입니다.
교정 대상 문장: {origin}

아래는 교정 대상 문장과 구조가 비슷한 예시입니다. 예시의 교정 방식을 참고해
마지막 입력 문장의 맞춤법, 띄어쓰기, 문법 오류를 교정하세요.
교정된 문장 한 줄만 출력하고, 설명은 덧붙이지 마세요.

{few_shot}"#;

/// 2단계 체인의 2단계: 1차 교정 결과 재검토
pub const CHAIN_STAGE_2: &str = r#"다음은 원문과 1차 교정 결과입니다.
1차 교정 결과에 남아 있는 맞춤법, 띄어쓰기, 문법 오류를 다시 점검하세요.
원문의 의미를 바꾸지 말고, 이미 올바른 부분은 그대로 두세요.
최종 교정 문장 한 줄만 출력하세요.

원문: {origin}
1차 교정: {correction}
최종 교정:"#;
