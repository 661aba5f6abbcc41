use axum::{
    routing::get,
    Router,
    extract::{Json, Path, State},
    http::StatusCode,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::Result;
use crate::api::models::{QaPair, RootResponse};
use crate::api::response;
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/generate_qa/*url", get(generate_qa_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse { hello: "World" })
}

async fn generate_qa_handler(
    State(state): State<AppState>,
    Path(url): Path<String>,
) -> Result<(StatusCode, Json<Vec<QaPair>>)> {
    let url = url.strip_prefix('/').unwrap_or(&url);
    info!("Received request to generate Q&A for URL: {}", url);

    match state.service.generate(url).await {
        Ok(pairs) => Ok(response::success(pairs)),
        Err(err) => {
            error!("Error occurred: {}", err);
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::{Value, json};

    use super::*;
    use crate::api::models::ErrorDetail;
    use crate::parser::{JsonPairsParser, ReplyParser};
    use crate::service::QaService;
    use crate::testing::{self, StubModel, StubScraper};

    async fn spawn_app(scraper: StubScraper, model: Arc<StubModel>) -> String {
        let parser: Arc<dyn ReplyParser> = Arc::new(JsonPairsParser::default());
        let service = QaService::new(Arc::new(scraper), model, parser);
        testing::serve(create_router(AppState::new(service))).await
    }

    #[tokio::test]
    async fn root_is_static() {
        let base = spawn_app(StubScraper::empty(), Arc::new(StubModel::replying("[]"))).await;

        let res = testing::http_client().get(format!("{}/", base)).send().await.unwrap();

        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(res.json::<Value>().await.unwrap(), json!({"Hello": "World"}));
    }

    #[tokio::test]
    async fn generates_pairs_for_a_url_with_slashes() {
        let model = Arc::new(StubModel::replying(
            r#"{"qa_pairs":[{"question":"What is the capital of France?","answer":"Paris."}]}"#,
        ));
        let base = spawn_app(StubScraper::markdown("Paris is the capital of France."), model.clone()).await;

        let res = testing::http_client()
            .get(format!("{}/generate_qa/https://example.com/wiki/France", base))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 200);
        assert_eq!(
            res.json::<Value>().await.unwrap(),
            json!([{"question": "What is the capital of France?", "answer": "Paris."}])
        );
        assert!(model.last_call().unwrap().user_prompt.contains("Paris is the capital of France."));
    }

    #[tokio::test]
    async fn scraper_failure_is_a_500_with_detail() {
        let base = spawn_app(
            StubScraper::failing("Connection error: connection refused"),
            Arc::new(StubModel::replying("{}")),
        )
        .await;

        let res = testing::http_client()
            .get(format!("{}/generate_qa/https://unreachable.invalid", base))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 500);
        let body: ErrorDetail = res.json().await.unwrap();
        assert!(body.detail.contains("connection refused"));
    }

    #[tokio::test]
    async fn model_failure_is_a_500() {
        let base = spawn_app(StubScraper::markdown("text"), Arc::new(StubModel::failing("quota exceeded"))).await;

        let res = testing::http_client()
            .get(format!("{}/generate_qa/https://example.com", base))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 500);
        assert_eq!(res.json::<Value>().await.unwrap(), json!({"detail": "quota exceeded"}));
    }

    #[tokio::test]
    async fn empty_object_reply_is_a_500() {
        let base = spawn_app(StubScraper::markdown("text"), Arc::new(StubModel::replying("{}"))).await;

        let res = testing::http_client()
            .get(format!("{}/generate_qa/https://example.com", base))
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 500);
        let body: ErrorDetail = res.json().await.unwrap();
        assert!(!body.detail.is_empty());
    }
}
