//! Fight Analysis Client
//!
//! Orchestrates one analysis round trip:
//! 1. ENCODE: both videos, concurrently
//! 2. PROMPT: names + weight class instruction, plus the response schema
//! 3. SEND: one multimodal request through the provider
//! 4. PARSE: the response text into an `AnalysisResult`, all or nothing

use super::error::{AnalysisError, AnalysisFormatError};
use super::media::encode_video;
use super::provider::{AnalysisProvider, GenerateRequest};
use super::schema::analysis_result_schema;
use super::types::{AnalysisRequest, AnalysisResult};
use super::utils::{strip_code_fence, truncate_for_log, MAX_LOGGED_CHARS};
use crate::ai::prompts::build_analysis_prompt;
use std::time::Instant;
use tracing::{debug, error, info, Instrument};

/// Client for head-to-head fight analysis
///
/// Holds no per-analysis state, so one instance can serve any number of
/// sequential or concurrent calls.
pub struct FightAnalysisClient<P> {
    provider: P,
}

impl<P: AnalysisProvider> FightAnalysisClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Analyze two fighters from their footage
    ///
    /// Encoding failures and provider failures are returned unchanged. A
    /// response that cannot be read as a complete `AnalysisResult` yields
    /// `AnalysisError::Format`.
    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let span = tracing::info_span!("analysis", id = %uuid::Uuid::new_v4());
        self.analyze_inner(request).instrument(span).await
    }

    async fn analyze_inner(&self, request: AnalysisRequest) -> Result<AnalysisResult, AnalysisError> {
        let started = Instant::now();
        info!(
            weight_class = %request.weight_class,
            fighter_video = %request.fighter_video.path.display(),
            opponent_video = %request.opponent_video.path.display(),
            "Starting fight analysis"
        );

        let (fighter_media, opponent_media) = tokio::try_join!(
            encode_video(&request.fighter_video),
            encode_video(&request.opponent_video),
        )?;

        let generate = GenerateRequest {
            prompt: build_analysis_prompt(
                &request.fighter_name,
                &request.opponent_name,
                &request.weight_class,
            ),
            media: vec![fighter_media, opponent_media],
            response_schema: analysis_result_schema().to_provider_json(),
        };

        let text = self.provider.generate(&generate).await?;
        let result = parse_analysis_response(&text)?;

        info!(
            confidence = result.head_to_head.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fight analysis complete"
        );

        Ok(result)
    }
}

/// Parse provider text into an `AnalysisResult`
///
/// The text is trimmed (and unwrapped from a code fence, if any), checked
/// against the response schema, then deserialized. Any failure is logged with
/// the raw text (a truncated copy at `error`, all of it at `debug`) and
/// reported as the generic `AnalysisFormatError`.
pub fn parse_analysis_response(text: &str) -> Result<AnalysisResult, AnalysisFormatError> {
    let body = strip_code_fence(text);

    let fail = |reason: String| {
        error!(
            error = %reason,
            raw_response = %truncate_for_log(text, MAX_LOGGED_CHARS),
            "Analysis response was not in the expected format"
        );
        debug!(raw_response = %text, "Full analysis response");
        AnalysisFormatError
    };

    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| fail(format!("invalid JSON: {}", e)))?;

    analysis_result_schema()
        .check(&value)
        .map_err(|violation| fail(format!("schema violation at {}", violation)))?;

    let result: AnalysisResult =
        serde_json::from_value(value).map_err(|e| fail(format!("invalid analysis: {}", e)))?;

    let confidence = result.head_to_head.confidence;
    if !confidence.is_finite() || !(0.0..=100.0).contains(&confidence) {
        return Err(fail(format!("confidence {} outside 0-100", confidence)));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::config::AnalysisConfig;
    use crate::ai::gemini::error::{EncodingError, ProviderError, FORMAT_ERROR_MESSAGE};
    use crate::ai::gemini::provider::GeminiProvider;
    use crate::ai::gemini::test_server::serve_once;
    use crate::ai::gemini::types::VideoUpload;
    use async_trait::async_trait;
    use base64::Engine;
    use serde_json::{json, Value};
    use std::io::Write;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    /// Provider that records the request and replays a scripted answer
    struct StubProvider {
        reply: Mutex<Option<Result<String, ProviderError>>>,
        seen: Mutex<Vec<GenerateRequest>>,
    }

    impl StubProvider {
        fn replying(reply: Result<String, ProviderError>) -> Self {
            Self {
                reply: Mutex::new(Some(reply)),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn last_request(&self) -> GenerateRequest {
            self.seen.lock().unwrap().last().cloned().expect("no request recorded")
        }
    }

    #[async_trait]
    impl AnalysisProvider for StubProvider {
        async fn generate(&self, request: &GenerateRequest) -> Result<String, ProviderError> {
            self.seen.lock().unwrap().push(request.clone());
            self.reply
                .lock()
                .unwrap()
                .take()
                .expect("stub provider called more than once")
        }
    }

    fn profile(style: &str) -> Value {
        json!({
            "fightingStyle": style,
            "strengths": ["Heavy right hand", "Takedown defense"],
            "weaknesses": ["Slow starter"],
            "fightingHabits": ["Drops left hand after the jab"],
            "fightingPattern": ["Pressures to the fence in round two"]
        })
    }

    fn conforming_result() -> Value {
        json!({
            "fighterAnalysis": profile("Pressure wrestler"),
            "opponentAnalysis": profile("Counter striker"),
            "headToHead": { "prediction": "Jones by decision", "confidence": 68 },
            "gamePlan": {
                "strategy": "Close distance behind the jab and wrestle",
                "keyTactics": ["Level change off the jab", "Cage control"],
                "drills": ["Chain wrestling", "Fence work"]
            }
        })
    }

    fn video_file(bytes: &[u8]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".mp4").tempfile().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    fn request_for(
        fighter: &str,
        opponent: &str,
        weight_class: &str,
        fighter_video: &NamedTempFile,
        opponent_video: &NamedTempFile,
    ) -> AnalysisRequest {
        AnalysisRequest {
            fighter_name: fighter.to_string(),
            opponent_name: opponent.to_string(),
            weight_class: weight_class.to_string(),
            fighter_video: VideoUpload::new(fighter_video.path(), "video/mp4"),
            opponent_video: VideoUpload::new(opponent_video.path(), "video/webm"),
        }
    }

    fn gemini_client_at(base_url: String) -> FightAnalysisClient<GeminiProvider> {
        let http = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap();
        FightAnalysisClient::new(GeminiProvider::with_client(
            http,
            AnalysisConfig {
                api_key: "test-key".to_string(),
                base_url,
                model: "gemini-test".to_string(),
                request_timeout: Duration::from_secs(10),
            },
        ))
    }

    #[tokio::test]
    async fn test_end_to_end_with_stub_provider() {
        let fighter_video = video_file(b"fighter footage");
        let opponent_video = video_file(b"opponent footage");
        let client = FightAnalysisClient::new(StubProvider::replying(Ok(format!(
            "\n  {}  \n",
            conforming_result()
        ))));

        let result = client
            .analyze(request_for(
                "Jones",
                "Smith",
                "Heavyweight (265 lbs)",
                &fighter_video,
                &opponent_video,
            ))
            .await
            .unwrap();

        assert_eq!(result.fighter_analysis.fighting_style, "Pressure wrestler");
        assert_eq!(result.opponent_analysis.fighting_style, "Counter striker");
        assert_eq!(result.head_to_head.prediction, "Jones by decision");
        assert!((0.0..=100.0).contains(&result.head_to_head.confidence));
        assert_eq!(result.game_plan.key_tactics.len(), 2);
        assert_eq!(client.provider().calls(), 1);
    }

    #[tokio::test]
    async fn test_request_carries_prompt_media_and_schema() {
        let fighter_video = video_file(b"fighter footage");
        let opponent_video = video_file(b"opponent footage");
        let client =
            FightAnalysisClient::new(StubProvider::replying(Ok(conforming_result().to_string())));

        client
            .analyze(request_for(
                "Jones",
                "Smith",
                "Heavyweight (265 lbs)",
                &fighter_video,
                &opponent_video,
            ))
            .await
            .unwrap();

        let sent = client.provider().last_request();
        assert!(sent.prompt.contains("Jones"));
        assert!(sent.prompt.contains("Smith"));
        assert!(sent.prompt.contains("Heavyweight (265 lbs)"));

        assert_eq!(sent.media.len(), 2);
        assert_eq!(sent.media[0].mime_type, "video/mp4");
        assert_eq!(sent.media[1].mime_type, "video/webm");
        let engine = base64::engine::general_purpose::STANDARD;
        assert_eq!(engine.decode(&sent.media[0].data).unwrap(), b"fighter footage");
        assert_eq!(engine.decode(&sent.media[1].data).unwrap(), b"opponent footage");

        assert_eq!(sent.response_schema, analysis_result_schema().to_provider_json());
    }

    #[tokio::test]
    async fn test_empty_names_are_forwarded() {
        let fighter_video = video_file(b"a");
        let opponent_video = video_file(b"b");
        let client =
            FightAnalysisClient::new(StubProvider::replying(Ok(conforming_result().to_string())));

        client
            .analyze(request_for("", "", "Lightweight (155 lbs)", &fighter_video, &opponent_video))
            .await
            .unwrap();

        let sent = client.provider().last_request();
        assert!(sent.prompt.contains("FIGHTER (first video): \n"));
        assert!(sent.prompt.contains("Lightweight (155 lbs)"));
    }

    #[tokio::test]
    async fn test_missing_field_is_format_error() {
        let fighter_video = video_file(b"a");
        let opponent_video = video_file(b"b");
        let mut body = conforming_result();
        body["headToHead"].as_object_mut().unwrap().remove("confidence");
        let client = FightAnalysisClient::new(StubProvider::replying(Ok(body.to_string())));

        let err = client
            .analyze(request_for("Jones", "Smith", "Heavyweight (265 lbs)", &fighter_video, &opponent_video))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Format(_)));
    }

    #[tokio::test]
    async fn test_truncated_json_is_format_error_with_fixed_message() {
        let fighter_video = video_file(b"a");
        let opponent_video = video_file(b"b");
        let full = conforming_result().to_string();
        let truncated = full[..full.len() / 2].to_string();
        let client = FightAnalysisClient::new(StubProvider::replying(Ok(truncated)));

        let err = client
            .analyze(request_for("Jones", "Smith", "Heavyweight (265 lbs)", &fighter_video, &opponent_video))
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Format(_)));
        assert_eq!(err.to_string(), FORMAT_ERROR_MESSAGE);
        assert!(!err.to_string().contains("EOF"));
    }

    #[tokio::test]
    async fn test_provider_error_is_returned_unaltered() {
        let fighter_video = video_file(b"a");
        let opponent_video = video_file(b"b");
        let client = FightAnalysisClient::new(StubProvider::replying(Err(ProviderError::Api {
            status: 503,
            message: "The model is overloaded".to_string(),
        })));

        let err = client
            .analyze(request_for("Jones", "Smith", "Heavyweight (265 lbs)", &fighter_video, &opponent_video))
            .await
            .unwrap_err();

        match err {
            AnalysisError::Provider(ProviderError::Api { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "The model is overloaded");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
        assert_eq!(client.provider().calls(), 1);
    }

    #[tokio::test]
    async fn test_encoding_failure_skips_provider() {
        let fighter_video = video_file(b"a");
        let dir = tempfile::tempdir().unwrap();
        let client =
            FightAnalysisClient::new(StubProvider::replying(Ok(conforming_result().to_string())));

        let request = AnalysisRequest {
            fighter_name: "Jones".to_string(),
            opponent_name: "Smith".to_string(),
            weight_class: "Heavyweight (265 lbs)".to_string(),
            fighter_video: VideoUpload::new(fighter_video.path(), "video/mp4"),
            opponent_video: VideoUpload::new(dir.path().join("gone.mp4"), "video/mp4"),
        };
        let err = client.analyze(request).await.unwrap_err();

        assert!(matches!(err, AnalysisError::Encoding(EncodingError::Read { .. })));
        assert_eq!(client.provider().calls(), 0);
    }

    #[test]
    fn test_parse_accepts_fenced_json() {
        let text = format!("```json\n{}\n```", conforming_result());
        let result = parse_analysis_response(&text).unwrap();
        assert_eq!(result.head_to_head.confidence, 68.0);
    }

    #[test]
    fn test_parse_rejects_out_of_range_confidence() {
        let mut body = conforming_result();
        body["headToHead"]["confidence"] = json!(140);
        assert_eq!(
            parse_analysis_response(&body.to_string()),
            Err(AnalysisFormatError)
        );
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let mut body = conforming_result();
        body["gamePlan"]["drills"] = json!("Shadowboxing");
        assert!(parse_analysis_response(&body.to_string()).is_err());

        let mut body = conforming_result();
        body["headToHead"]["confidence"] = json!("high");
        assert!(parse_analysis_response(&body.to_string()).is_err());
    }

    #[test]
    fn test_parse_rejects_prose() {
        assert!(parse_analysis_response("I could not watch the videos.").is_err());
        assert!(parse_analysis_response("").is_err());
    }

    #[test]
    fn test_parse_accepts_boundary_confidence() {
        for confidence in [0, 100] {
            let mut body = conforming_result();
            body["headToHead"]["confidence"] = json!(confidence);
            assert!(parse_analysis_response(&body.to_string()).is_ok());
        }
    }

    #[tokio::test]
    async fn test_gemini_end_to_end_over_http() {
        let fighter_video = video_file(b"fighter footage");
        let opponent_video = video_file(b"opponent footage");
        let reply = json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": conforming_result().to_string()}]},
                "finishReason": "STOP"
            }]
        });
        let (base_url, server) = serve_once(200, reply.to_string()).await;

        let result = gemini_client_at(base_url)
            .analyze(request_for("Jones", "Smith", "Heavyweight (265 lbs)", &fighter_video, &opponent_video))
            .await
            .unwrap();

        assert_eq!(result.head_to_head.prediction, "Jones by decision");
        let seen = server.await.unwrap();
        assert!(seen.starts_with("POST /v1beta/models/gemini-test:generateContent "));
        assert!(seen.to_ascii_lowercase().contains("x-goog-api-key: test-key"));
    }

    #[tokio::test]
    async fn test_gemini_quota_error_reaches_caller_unaltered() {
        let fighter_video = video_file(b"a");
        let opponent_video = video_file(b"b");
        let body = json!({"error": {"code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED"}});
        let (base_url, server) = serve_once(429, body.to_string()).await;

        let err = gemini_client_at(base_url)
            .analyze(request_for("Jones", "Smith", "Heavyweight (265 lbs)", &fighter_video, &opponent_video))
            .await
            .unwrap_err();
        server.await.unwrap();

        match err {
            AnalysisError::Provider(ProviderError::Api { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "Resource has been exhausted");
            }
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_gemini_success_without_text_is_format_error() {
        let bodies = [
            json!({"candidates": [{"finishReason": "SAFETY"}]}).to_string(),
            json!({"promptFeedback": {"blockReason": "SAFETY"}}).to_string(),
            json!({"unexpected": "shape"}).to_string(),
        ];
        for body in bodies {
            let fighter_video = video_file(b"a");
            let opponent_video = video_file(b"b");
            let (base_url, server) = serve_once(200, body).await;

            let err = gemini_client_at(base_url)
                .analyze(request_for("Jones", "Smith", "Heavyweight (265 lbs)", &fighter_video, &opponent_video))
                .await
                .unwrap_err();
            server.await.unwrap();

            assert!(matches!(err, AnalysisError::Format(_)));
            assert_eq!(err.to_string(), FORMAT_ERROR_MESSAGE);
        }
    }
}
