pub mod health;

use std::path::Path;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    let body_limit = state.config.max_upload_bytes;

    let router = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state);

    // Web client (trunk dist) shares the origin so it can post to a relative URL.
    if Path::new(&static_dir).is_dir() {
        info!("Serving web client from {static_dir}");
        let index = Path::new(&static_dir).join("index.html");
        router.fallback_service(ServeDir::new(&static_dir).not_found_service(ServeFile::new(index)))
    } else {
        router
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::analysis::service::test_support::StubGenerator;
    use crate::config::Config;
    use crate::llm_client::Generator;

    const BOUNDARY: &str = "----estimate-test-boundary";

    enum FormPart<'a> {
        File {
            name: &'a str,
            file_name: &'a str,
            mime_type: &'a str,
            bytes: &'a [u8],
        },
        Text {
            name: &'a str,
            value: &'a str,
        },
    }

    fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                FormPart::File {
                    name,
                    file_name,
                    mime_type,
                    bytes,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                             Content-Type: {mime_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
                FormPart::Text { name, value } => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}")
                            .as_bytes(),
                    );
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn analyze_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn app_with(generator: Arc<StubGenerator>, config: Config) -> Router {
        let generator: Arc<dyn Generator> = generator;
        build_router(AppState { generator, config })
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const ESTIMATE: FormPart<'static> = FormPart::File {
        name: "estimateFile",
        file_name: "mitsumori.jpg",
        mime_type: "image/jpeg",
        bytes: b"\xff\xd8\xff\xe0fake-jpeg",
    };

    const DRAWING: FormPart<'static> = FormPart::File {
        name: "drawingFile",
        file_name: "zumen.png",
        mime_type: "image/png",
        bytes: b"\x89PNGfake-png",
    };

    #[tokio::test]
    async fn test_health() {
        let app = app_with(Arc::new(StubGenerator::replying("{}")), Config::for_tests());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_estimate_only_fenced_reply_succeeds() {
        let generator = Arc::new(StubGenerator::replying(
            "```json\n{\"items\":[{\"name\":\"鍵交換代\",\"current\":20000,\"target\":10000,\"reason\":\"...\"}]}\n```",
        ));
        let app = app_with(generator.clone(), Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[ESTIMATE])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "success": true,
                "data": {"items": [{"name": "鍵交換代", "current": 20000, "target": 10000, "reason": "..."}]}
            })
        );

        let calls = generator.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 3);
    }

    #[tokio::test]
    async fn test_drawing_adds_two_parts() {
        let generator = Arc::new(StubGenerator::replying("{\"items\":[]}"));
        let app = app_with(generator.clone(), Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[ESTIMATE, DRAWING])))
            .await
            .unwrap();

        assert_eq!(json_body(response).await, json!({"success": true, "data": {"items": []}}));
        assert_eq!(generator.calls.lock().unwrap()[0].len(), 5);
    }

    #[tokio::test]
    async fn test_no_files_returns_no_file_without_model_call() {
        let generator = Arc::new(StubGenerator::replying("{}"));
        let app = app_with(generator.clone(), Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[FormPart::Text {
                name: "note",
                value: "hello",
            }])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"success": false, "msg": "No file"}));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_drawing_without_estimate_returns_no_file() {
        let generator = Arc::new(StubGenerator::replying("{}"));
        let app = app_with(generator.clone(), Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[DRAWING])))
            .await
            .unwrap();

        assert_eq!(json_body(response).await, json!({"success": false, "msg": "No file"}));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_estimate_field_counts_as_missing() {
        let generator = Arc::new(StubGenerator::replying("{}"));
        let app = app_with(generator.clone(), Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[FormPart::File {
                name: "estimateFile",
                file_name: "",
                mime_type: "application/octet-stream",
                bytes: b"",
            }])))
            .await
            .unwrap();

        assert_eq!(json_body(response).await, json!({"success": false, "msg": "No file"}));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_text_value_in_estimate_field_returns_generic_error() {
        let generator = Arc::new(StubGenerator::replying("{}"));
        let app = app_with(generator.clone(), Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[FormPart::Text {
                name: "estimateFile",
                value: "mitsumori.jpg",
            }])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"success": false, "msg": "Error"}));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_text_in_estimate_field_counts_as_missing() {
        let generator = Arc::new(StubGenerator::replying("{}"));
        let app = app_with(generator.clone(), Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[FormPart::Text {
                name: "estimateFile",
                value: "",
            }])))
            .await
            .unwrap();

        assert_eq!(json_body(response).await, json!({"success": false, "msg": "No file"}));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_prose_reply_returns_generic_error() {
        let generator = Arc::new(StubGenerator::replying(
            "この見積もりには特に問題はありません。",
        ));
        let app = app_with(generator, Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[ESTIMATE])))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"success": false, "msg": "Error"}));
    }

    #[tokio::test]
    async fn test_upstream_failure_returns_generic_error() {
        let app = app_with(Arc::new(StubGenerator::failing("quota")), Config::for_tests());

        let response = app
            .oneshot(analyze_request(multipart_body(&[ESTIMATE])))
            .await
            .unwrap();

        assert_eq!(json_body(response).await, json!({"success": false, "msg": "Error"}));
    }

    #[tokio::test]
    async fn test_non_multipart_body_returns_generic_error() {
        let generator = Arc::new(StubGenerator::replying("{}"));
        let app = app_with(generator.clone(), Config::for_tests());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/analyze")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"success": false, "msg": "Error"}));
        assert_eq!(generator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_upload_returns_generic_error() {
        let generator = Arc::new(StubGenerator::replying("{}"));
        let config = Config {
            max_upload_bytes: 64,
            ..Config::for_tests()
        };
        let app = app_with(generator.clone(), config);

        let big = vec![0u8; 4096];
        let response = app
            .oneshot(analyze_request(multipart_body(&[FormPart::File {
                name: "estimateFile",
                file_name: "huge.jpg",
                mime_type: "image/jpeg",
                bytes: &big,
            }])))
            .await
            .unwrap();

        assert_eq!(json_body(response).await, json!({"success": false, "msg": "Error"}));
        assert_eq!(generator.call_count(), 0);
    }
}
