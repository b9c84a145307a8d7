use serde::{Deserialize, Serialize};

/// Chat completion 요청 본문
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl<'a> ChatCompletionRequest<'a> {
    /// user 메시지 하나만 담은 요청
    pub fn user(model: &'a str, prompt: &'a str, temperature: Option<f32>) -> Self {
        Self {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: String,
}

/// OpenAI 호환 에러 응답 (`{"error": {"message": ...}}`)
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn should_serialize_single_user_message() {
        // Arrange
        let request = ChatCompletionRequest::user("solar-pro", "안녕하세요", None);

        // Act
        let value = serde_json::to_value(&request).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({
                "model": "solar-pro",
                "messages": [{"role": "user", "content": "안녕하세요"}]
            })
        );
    }

    #[test]
    fn should_include_temperature_when_set() {
        let request = ChatCompletionRequest::user("solar-pro", "hi", Some(0.0));

        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["temperature"], json!(0.0));
    }

    #[test]
    fn should_deserialize_first_choice_content() {
        let body = r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"foo"}}]}"#;

        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();

        assert_eq!(response.choices[0].message.content, "foo");
    }
}
