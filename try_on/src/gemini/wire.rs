use base64::Engine as _;

use crate::{DataUri, GenerationError, GenerationRequest, ImageFile, ImageMime};

pub const TRY_ON_PROMPT: &str = "The first image shows a person and the second image shows a \
garment. Create a new photorealistic image of the same person wearing that garment. Keep the \
person's face, hair, body shape, pose and the background of the first image unchanged, and fit \
the garment naturally with realistic folds, lighting and shadows. Return only the edited image.";

/// Finish reasons that mean the output was withheld by a content filter.
const SAFETY_FINISH_REASONS: [&str; 5] = [
    "SAFETY",
    "IMAGE_SAFETY",
    "PROHIBITED_CONTENT",
    "BLOCKLIST",
    "SPII",
];

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", alias = "inline_data")]
    pub inline_data: Option<InlineData>,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    #[serde(default, alias = "mime_type")]
    pub mime_type: String,
    pub data: String,
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(serde::Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default)]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(serde::Deserialize, Debug)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(serde::Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

impl Part {
    fn image(file: &ImageFile) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: file.mime().as_str().to_string(),
                data: base64::engine::general_purpose::STANDARD.encode(file.bytes()),
            }),
        }
    }

    fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            inline_data: None,
        }
    }
}

/// Person image, garment image, then the instruction, in one user turn.
pub fn build_request(request: &GenerationRequest) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![
                Part::image(&request.model),
                Part::image(&request.garment),
                Part::text(TRY_ON_PROMPT),
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["IMAGE".to_string(), "TEXT".to_string()],
        },
    }
}

pub fn parse_response(status: u16, body: &str) -> Result<DataUri, GenerationError> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorResponse>(body)
            .map(|x| x.error.message)
            .ok()
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        return Err(GenerationError::Service { status, message });
    }

    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Malformed(e.to_string()))?;

    let parts = response
        .candidates
        .iter()
        .filter_map(|candidate| candidate.content.as_ref())
        .flat_map(|content| content.parts.iter());

    let mut texts = Vec::new();
    for part in parts {
        if let Some(InlineData { mime_type, data }) = &part.inline_data {
            let mime = match mime_type.trim() {
                "" => sniff_mime(data),
                mime => mime,
            };
            return Ok(DataUri::from_base64(mime, data.as_str()));
        }
        if let Some(text) = part.text.as_deref().map(str::trim).filter(|x| !x.is_empty()) {
            texts.push(text.to_string());
        }
    }

    if let Some(reason) = response.prompt_feedback.and_then(|x| x.block_reason) {
        return Err(GenerationError::Blocked(reason));
    }
    if texts.is_empty() {
        if let Some(reason) = response
            .candidates
            .iter()
            .find_map(|candidate| candidate.finish_reason.as_deref())
            .filter(|reason| *reason != "STOP")
        {
            return Err(match SAFETY_FINISH_REASONS.contains(&reason) {
                true => GenerationError::Blocked(reason.to_string()),
                false => GenerationError::Malformed(format!("generation stopped with {reason}")),
            });
        }
        Err(GenerationError::NoImage(None))
    } else {
        Err(GenerationError::NoImage(Some(texts.join(" "))))
    }
}

/// Image type of an `inlineData` part that came without a `mimeType`.
fn sniff_mime(data: &str) -> &'static str {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .ok()
        .and_then(|bytes| ImageMime::sniff(&bytes))
        .unwrap_or(ImageMime::Png)
        .as_str()
}

#[cfg(test)]
mod tests {
    use base64::Engine as _;

    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            model: ImageFile::new("model.jpg", b"person".to_vec()).unwrap(),
            garment: ImageFile::new("dress.webp", b"dress".to_vec()).unwrap(),
        }
    }

    #[test]
    fn request_body_layout() {
        let body = serde_json::to_value(build_request(&request())).unwrap();
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(parts[0]["inlineData"]["data"], "cGVyc29u");
        assert_eq!(parts[1]["inlineData"]["mimeType"], "image/webp");
        assert_eq!(parts[1]["inlineData"]["data"], "ZHJlc3M=");
        assert_eq!(parts[2]["text"], TRY_ON_PROMPT);
        assert!(parts[2].get("inlineData").is_none());
        assert_eq!(
            body["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );
    }

    #[test]
    fn first_inline_image_wins() {
        let body = r#"{"candidates":[{"content":{"role":"model","parts":[
            {"text":"Here you go"},
            {"inlineData":{"mimeType":"image/png","data":"AAAA"}},
            {"inlineData":{"mimeType":"image/png","data":"BBBB"}}
        ]},"finishReason":"STOP"}]}"#;
        let uri = parse_response(200, body).unwrap();
        assert_eq!(uri.to_string(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn text_only_answer() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"I cannot edit this photo."}]}}]}"#;
        assert_eq!(
            parse_response(200, body),
            Err(GenerationError::NoImage(Some(
                "I cannot edit this photo.".into()
            )))
        );
    }

    #[test]
    fn blocked_prompt() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert_eq!(
            parse_response(200, body),
            Err(GenerationError::Blocked("SAFETY".into()))
        );
        let body = r#"{"candidates":[{"finishReason":"IMAGE_SAFETY"}]}"#;
        assert_eq!(
            parse_response(200, body),
            Err(GenerationError::Blocked("IMAGE_SAFETY".into()))
        );
    }

    #[test]
    fn other_finish_reasons_are_not_blocks() {
        let body = r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#;
        assert_eq!(
            parse_response(200, body),
            Err(GenerationError::Malformed(
                "generation stopped with MAX_TOKENS".into()
            ))
        );
        let body = r#"{"candidates":[{"finishReason":"PROHIBITED_CONTENT"}]}"#;
        assert_eq!(
            parse_response(200, body),
            Err(GenerationError::Blocked("PROHIBITED_CONTENT".into()))
        );
    }

    #[test]
    fn missing_mime_type_is_sniffed() {
        let jpeg = base64::engine::general_purpose::STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]);
        let body = format!(
            r#"{{"candidates":[{{"content":{{"parts":[{{"inlineData":{{"mimeType":"","data":"{jpeg}"}}}}]}}}}]}}"#
        );
        let uri = parse_response(200, &body).unwrap();
        assert_eq!(uri.mime(), "image/jpeg");
        assert_eq!(DataUri::parse(&uri.to_string()), Ok(uri));

        let body = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"AAAA"}}]}}]}"#;
        let uri = parse_response(200, body).unwrap();
        assert_eq!(uri.to_string(), "data:image/png;base64,AAAA");
    }

    #[test]
    fn empty_answer() {
        assert_eq!(
            parse_response(200, "{}"),
            Err(GenerationError::NoImage(None))
        );
    }

    #[test]
    fn service_errors() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(
            parse_response(400, body),
            Err(GenerationError::Service {
                status: 400,
                message: "API key not valid. Please pass a valid API key.".into()
            })
        );
        assert_eq!(
            parse_response(503, "<html>unavailable</html>"),
            Err(GenerationError::Service {
                status: 503,
                message: "Request failed with status 503".into()
            })
        );
    }

    #[test]
    fn malformed_body() {
        assert!(matches!(
            parse_response(200, "not json"),
            Err(GenerationError::Malformed(_))
        ));
    }
}
