use actix_web::{get, post, web, HttpResponse};
use log::info;
use serde_json::Value;
use smarttask_shared::protocol::{parse_subtasks, subtask_prompt, SuggestResponse};

use crate::error::ProxyError;
use crate::gemini::GeminiClient;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(suggest_subtasks).service(health);
}

#[post("/api/gemini")]
async fn suggest_subtasks(
    gemini: web::Data<GeminiClient>,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    let prompt = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("prompt").and_then(Value::as_str).map(str::to_owned))
        .filter(|p| !p.trim().is_empty())
        .ok_or(ProxyError::MissingPrompt)?;

    let text = gemini.generate_text(&subtask_prompt(prompt.trim())).await?;
    let subtasks = parse_subtasks(&text);
    info!("Suggested {} subtasks", subtasks.len());

    Ok(HttpResponse::Ok().json(SuggestResponse { subtasks }))
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeminiConfig, DEFAULT_MODEL};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::json;
    use smarttask_shared::protocol::ErrorResponse;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    fn gemini(api_base: &str, api_key: Option<&str>) -> web::Data<GeminiClient> {
        let client = GeminiClient::new(GeminiConfig {
            api_key: api_key.map(String::from),
            model: DEFAULT_MODEL.to_string(),
            api_base: api_base.to_string(),
        })
        .unwrap();
        web::Data::new(client)
    }

    async fn post_prompt(
        gemini: web::Data<GeminiClient>,
        body: Value,
    ) -> actix_web::dev::ServiceResponse {
        let app = test::init_service(App::new().app_data(gemini).configure(configure)).await;
        let req = test::TestRequest::post()
            .uri("/api/gemini")
            .set_json(body)
            .to_request();
        test::call_service(&app, req).await
    }

    #[actix_web::test]
    async fn returns_parsed_subtasks() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_string_contains("Plan trip"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "parts": [{ "text": "Book flight, Book hotel,, Pack bags\n" }] }
                }]
            })))
            .expect(1)
            .mount(&upstream)
            .await;

        let resp = post_prompt(
            gemini(&upstream.uri(), Some("test-key")),
            json!({ "prompt": "Plan trip" }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: SuggestResponse = test::read_body_json(resp).await;
        assert_eq!(body.subtasks, vec!["Book flight", "Book hotel", "Pack bags"]);
    }

    #[actix_web::test]
    async fn missing_prompt_is_a_bad_request() {
        let gemini = gemini("http://127.0.0.1:9", Some("test-key"));
        for body in [json!({}), json!({ "prompt": "  " }), json!({ "prompt": 7 })] {
            let resp = post_prompt(gemini.clone(), body).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
            let body: ErrorResponse = test::read_body_json(resp).await;
            assert_eq!(body.error, "Prompt is required");
        }
    }

    #[actix_web::test]
    async fn missing_key_is_a_server_error() {
        let resp = post_prompt(
            gemini("http://127.0.0.1:9", None),
            json!({ "prompt": "Plan trip" }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Google Gemini API key not configured.");
    }

    #[actix_web::test]
    async fn blank_reply_is_an_empty_list() {
        for text in ["   \n", " , ", ""] {
            let upstream = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path(GENERATE_PATH))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "candidates": [{ "content": { "parts": [{ "text": text }] } }]
                })))
                .mount(&upstream)
                .await;

            let resp = post_prompt(
                gemini(&upstream.uri(), Some("test-key")),
                json!({ "prompt": "Plan trip" }),
            )
            .await;

            assert_eq!(resp.status(), StatusCode::OK);
            let body: SuggestResponse = test::read_body_json(resp).await;
            assert!(body.subtasks.is_empty());
        }
    }

    #[actix_web::test]
    async fn blocked_prompt_is_a_server_error() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&upstream)
            .await;

        let resp = post_prompt(
            gemini(&upstream.uri(), Some("test-key")),
            json!({ "prompt": "Plan trip" }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn upstream_failure_is_masked() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&upstream)
            .await;

        let resp = post_prompt(
            gemini(&upstream.uri(), Some("test-key")),
            json!({ "prompt": "Plan trip" }),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "Failed to generate subtasks from AI.");
    }

    #[actix_web::test]
    async fn health_reports_ok() {
        let app = test::init_service(
            App::new()
                .app_data(gemini("http://127.0.0.1:9", None))
                .configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
